use anyhow::{Context, Result};
use clap::Parser;
use patternaudit_core::{scan_and_write, ReportFormat, ScanOptions, DEFAULT_EXTENSION};
use std::path::PathBuf;
use tracing::info;

/// 命令行入口（基于 clap）；不带参数运行即使用默认路径
#[derive(Parser, Debug)]
#[command(name = "patternaudit", version, about = "Audit safe/destructive pattern macros for lookaround and backreferences")]
struct Cli {
    /// 扫描根目录
    #[arg(long, default_value = "src/packs")]
    root: PathBuf,

    /// 报告输出路径（每次运行覆盖）
    #[arg(long, default_value = "docs/pattern_audit.md")]
    output: PathBuf,

    /// 参与扫描的文件后缀
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    ext: String,

    /// 报告格式：markdown 或 json
    #[arg(long, default_value = "markdown", value_parser = ["markdown", "json"])]
    format: String,

    /// 线程数（"auto"=CPU 核心数；默认串行）
    #[arg(long, default_value = "1")]
    threads: String,

    /// 最大扫描文件大小（字节）
    #[arg(long)]
    max_file_size: Option<u64>,

    /// 跳过的目录名（可重复；默认不跳过任何目录）
    #[arg(long)]
    exclude: Vec<String>,
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    info!(root = ?cli.root, output = ?cli.output, "starting pattern audit");

    let format = match cli.format.as_str() {
        "json" => ReportFormat::Json,
        _ => ReportFormat::Markdown,
    };

    let mut opts = ScanOptions {
        extension: cli.ext,
        max_file_size: cli.max_file_size,
        threads: parse_threads(&cli.threads),
        ..ScanOptions::default()
    };
    opts.excluded_dirs.extend(cli.exclude);

    let stats = scan_and_write(&cli.root, &cli.output, &opts, format)
        .with_context(|| format!("pattern audit failed writing {}", cli.output.display()))?;

    info!(
        files_scanned = stats.files_scanned,
        files_failed = stats.files_failed,
        files_skipped = stats.files_skipped,
        declarations = stats.declarations_total,
        findings = stats.findings_total,
        files_with_findings = stats.files_with_findings,
        "audit finished"
    );

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 解析线程参数："auto" 返回 None；非法值回退到串行
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") {
        return None;
    }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => Some(1),
    }
}
