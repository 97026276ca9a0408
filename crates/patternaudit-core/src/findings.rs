//! 命中项与按路径聚合的审计结果
use serde::Serialize;
use std::collections::BTreeMap;

use crate::detectors::{FancyFeature, FancyMatch};
use crate::types::{PatternDeclaration, PatternKind, UNNAMED};

/// 被标记的模式声明
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: PatternKind,
    pub name: Option<String>,
    pub line: usize,
    pub feature: FancyFeature,
    pub reason: String,
    #[serde(rename = "regex")]
    pub raw: String,
}

impl Finding {
    pub fn new(decl: &PatternDeclaration<'_>, hit: &FancyMatch<'_>) -> Self {
        Self {
            kind: decl.kind,
            name: decl.name.map(str::to_string),
            line: decl.line,
            feature: hit.feature,
            reason: hit.reason(),
            raw: decl.raw.to_string(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED)
    }
}

/// 文件路径 → 命中列表
///
/// 以路径字符串为键的有序映射，渲染时天然按字典序输出；
/// 只保存至少有一条命中的文件。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuditResult {
    files: BTreeMap<String, Vec<Finding>>,
}

impl AuditResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个文件的命中；空列表被忽略，同一路径重复记录时追加
    pub fn record(&mut self, path: impl Into<String>, findings: Vec<Finding>) {
        if findings.is_empty() {
            return;
        }
        self.files.entry(path.into()).or_default().extend(findings);
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// 含命中的文件数
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn finding_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// 按路径字典序迭代
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Finding])> {
        self.files.iter().map(|(p, f)| (p.as_str(), f.as_slice()))
    }

    pub fn get(&self, path: &str) -> Option<&[Finding]> {
        self.files.get(path).map(Vec::as_slice)
    }
}
