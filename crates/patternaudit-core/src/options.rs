//! 扫描选项与统计信息（模块）

/// 默认参与扫描的文件后缀
pub const DEFAULT_EXTENSION: &str = ".rs";

/// 报告格式
/// - Markdown：按文件分节的表格（默认）
/// - Json：同内容的结构化输出，便于其他工具消费
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

/// 扫描选项
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 文件名后缀过滤（例如 ".rs"）
    pub extension: String,
    /// 需要整棵跳过的目录名；默认为空，即遍历全部子目录
    pub excluded_dirs: Vec<String>,
    /// 最大文件大小（字节）；超过则跳过
    pub max_file_size: Option<u64>,
    /// 线程数：None 表示自动（等于 CPU 核数）；Some(1) 走串行
    pub threads: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            excluded_dirs: Vec::new(),
            max_file_size: None,
            threads: Some(1),
        }
    }
}

impl ScanOptions {
    /// 实际使用的线程数
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_failed: usize,
    pub files_skipped: usize,
    pub declarations_total: usize,
    pub findings_total: usize,
    pub files_with_findings: usize,
}
