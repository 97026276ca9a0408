//! 公共类型（对外暴露）
use serde::Serialize;
use std::fmt;

/// 未声明名称时的占位名
pub const UNNAMED: &str = "UNNAMED";

/// 宏种类：`safe_pattern!` 或 `destructive_pattern!`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Safe,
    Destructive,
}

impl PatternKind {
    /// 宏名前缀关键字
    pub fn keyword(self) -> &'static str {
        match self {
            PatternKind::Safe => "safe",
            PatternKind::Destructive => "destructive",
        }
    }

    pub(crate) fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "safe" => Some(PatternKind::Safe),
            "destructive" => Some(PatternKind::Destructive),
            _ => None,
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// 单次提取得到的模式声明（借用源文本，仅在一次提取过程中存在）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternDeclaration<'a> {
    pub kind: PatternKind,
    /// 声明的名称（不含引号）；缺省时为 None，渲染为 `UNNAMED`
    pub name: Option<&'a str>,
    /// 原始字符串定界符之间的正则源码，不做任何转义处理
    pub raw: &'a str,
    /// 宏调用所在行（从 1 开始）
    pub line: usize,
}

impl PatternDeclaration<'_> {
    pub fn display_name(&self) -> &str {
        self.name.unwrap_or(UNNAMED)
    }
}
