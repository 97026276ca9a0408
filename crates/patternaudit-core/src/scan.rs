//! 扫描主流程与并行调度
use chrono::Local;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::detectors::detect_fancy;
use crate::error::{AuditError, Result};
use crate::extract::extract_declarations;
use crate::findings::{AuditResult, Finding};
use crate::options::{ReportFormat, ScanOptions, ScanStats};
use crate::report::{render_json, render_markdown, write_report};

/// 单个文件的分析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    /// 识别出的宏声明数量（含未命中的）
    pub declarations: usize,
    /// 命中高风险特性的声明
    pub findings: Vec<Finding>,
}

/// 对一段源码执行“提取 → 检测”，只保留命中的声明
pub fn analyze_source(content: &str) -> FileReport {
    let decls = extract_declarations(content);
    let findings = decls
        .iter()
        .filter_map(|d| detect_fancy(d.raw).map(|hit| Finding::new(d, &hit)))
        .collect();
    FileReport { declarations: decls.len(), findings }
}

/// 读取并分析单个文件；读取失败（权限、编码、I/O）以错误返回，由调用方决定如何处理
pub fn scan_file(path: &Path) -> Result<FileReport> {
    let content = std::fs::read_to_string(path).map_err(|source| AuditError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(analyze_source(&content))
}

fn is_excluded_dir(entry: &DirEntry, opts: &ScanOptions) -> bool {
    // 根目录本身不参与排除
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| opts.excluded_dirs.iter().any(|d| d == name))
}

/// 递归收集后缀匹配的文件，返回 (文件列表, 因大小被跳过的数量)
fn collect_files(root: &Path, opts: &ScanOptions) -> (Vec<PathBuf>, usize) {
    let mut files = Vec::new();
    let mut skipped = 0;

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, opts))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "failed to walk directory entry");
                continue;
            }
        };
        // 指向文件的符号链接按普通文件处理
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }
        let matches_ext = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(opts.extension.as_str()));
        if !matches_ext {
            continue;
        }
        if let Some(max) = opts.max_file_size {
            if let Ok(md) = std::fs::metadata(entry.path()) {
                if md.len() > max {
                    debug!(path = %entry.path().display(), size = md.len(), "skipping oversized file");
                    skipped += 1;
                    continue;
                }
            }
        }
        files.push(entry.into_path());
    }

    (files, skipped)
}

/// 扫描目录树，按文件聚合命中
///
/// 单个文件读取失败只记录日志，该文件视为无命中；
/// 结果按路径排序，与遍历顺序和并行完成顺序无关。
pub fn scan_tree(root: &Path, opts: &ScanOptions) -> Result<(AuditResult, ScanStats)> {
    if !root.is_dir() {
        warn!(root = %root.display(), "scan root is not a directory; report will be empty");
    }

    let (files, skipped) = collect_files(root, opts);
    let threads = opts.effective_threads();
    debug!(files = files.len(), threads, "collected files");

    let outcomes: Vec<(PathBuf, Result<FileReport>)> = if threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        pool.install(|| {
            files
                .into_par_iter()
                .map(|path| {
                    let res = scan_file(&path);
                    (path, res)
                })
                .collect()
        })
    } else {
        files
            .into_iter()
            .map(|path| {
                let res = scan_file(&path);
                (path, res)
            })
            .collect()
    };

    let mut result = AuditResult::new();
    let mut stats = ScanStats { files_skipped: skipped, ..ScanStats::default() };

    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                stats.files_scanned += 1;
                stats.declarations_total += report.declarations;
                stats.findings_total += report.findings.len();
                result.record(path.display().to_string(), report.findings);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "error reading file; treating as no findings");
                stats.files_failed += 1;
            }
        }
    }
    stats.files_with_findings = result.file_count();

    Ok((result, stats))
}

/// 扫描目录并将报告写入 `output`（覆盖原有内容）
pub fn scan_and_write(
    root: &Path,
    output: &Path,
    opts: &ScanOptions,
    format: ReportFormat,
) -> Result<ScanStats> {
    let (result, stats) = scan_tree(root, opts)?;

    let generated = Local::now();
    let text = match format {
        ReportFormat::Markdown => render_markdown(&result, &generated),
        ReportFormat::Json => render_json(&result, &generated)?,
    };
    write_report(output, &text)?;

    info!(
        files_scanned = stats.files_scanned,
        files_failed = stats.files_failed,
        findings = stats.findings_total,
        output = %output.display(),
        "report written"
    );
    Ok(stats)
}
