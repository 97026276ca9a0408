//! 报告生成（Markdown 表格 / JSON）
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;

use crate::error::{AuditError, Result};
use crate::findings::AuditResult;

pub const REPORT_TITLE: &str = "# Pattern Audit Report";

/// 预览最大长度（字符数），超出时截断为 57 + "..."
pub const PREVIEW_MAX: usize = 60;
const ELLIPSIS: &str = "...";

fn timestamp(generated: &DateTime<Local>) -> String {
    generated.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// 表格中的正则预览：转义 `|`，过长则截断
pub fn regex_preview(raw: &str) -> String {
    let escaped = raw.replace('|', "\\|");
    if escaped.chars().count() <= PREVIEW_MAX {
        return escaped;
    }
    let keep = PREVIEW_MAX - ELLIPSIS.len();
    let mut out: String = escaped.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// 渲染 Markdown 报告；除时间戳行外，相同输入产生相同输出
pub fn render_markdown(result: &AuditResult, generated: &DateTime<Local>) -> String {
    let mut out = format!("{REPORT_TITLE}\nGenerated: {}\n\n", timestamp(generated));

    for (path, findings) in result.iter() {
        out.push_str(&format!("## `{path}`\n\n"));
        out.push_str("| Kind | Name | Reason | Regex Preview |\n");
        out.push_str("|------|------|--------|---------------|\n");
        for f in findings {
            out.push_str(&format!(
                "| {} | `{}` | {} | `{}` |\n",
                f.kind,
                f.display_name(),
                f.reason,
                regex_preview(&f.raw)
            ));
        }
        out.push('\n');
    }

    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: String,
    files: &'a AuditResult,
}

/// 渲染 JSON 报告（文件按路径排序）
pub fn render_json(result: &AuditResult, generated: &DateTime<Local>) -> Result<String> {
    let doc = JsonReport { generated: timestamp(generated), files: result };
    let mut text = serde_json::to_string_pretty(&doc)?;
    text.push('\n');
    Ok(text)
}

/// 写出报告，必要时创建父目录；失败即整体失败
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    let wrap = |source: std::io::Error| AuditError::WriteReport { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    std::fs::write(path, contents).map_err(wrap)
}
