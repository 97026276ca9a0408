//! 模式宏审计核心库
//!
//! 设计要点：
//! - 在源码文本中定位 `safe_pattern!` / `destructive_pattern!` 调用，不做完整语法解析。
//! - 原始字符串按开头 `#` 数量配对结束定界符，正文原样保留（不处理转义）。
//! - 对提取出的正则做纯文本检测：前瞻、后顾、`\1`..`\9` 反向引用。
//! - 单文件读取失败只记录日志；报告按文件路径排序，与遍历/并行完成顺序无关。

mod detectors;
mod error;
mod extract;
mod findings;
mod options;
mod report;
mod scan;
mod types;

pub use detectors::{detect_fancy, FancyFeature, FancyMatch};
pub use error::{AuditError, Result};
pub use extract::extract_declarations;
pub use findings::{AuditResult, Finding};
pub use options::{ReportFormat, ScanOptions, ScanStats, DEFAULT_EXTENSION};
pub use report::{regex_preview, render_json, render_markdown, write_report, PREVIEW_MAX, REPORT_TITLE};
pub use scan::{analyze_source, scan_and_write, scan_file, scan_tree, FileReport};
pub use types::{PatternDeclaration, PatternKind, UNNAMED};
