//! 高风险正则特性检测（纯文本匹配，不解析正则语法）
//!
//! 检测前瞻/后顾断言与 `\1`..`\9` 反向引用。字符类、注释中形似的片段同样会命中，
//! 这是纯文本检测的已知局限。
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// 高风险特性种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FancyFeature {
    PositiveLookahead,
    NegativeLookahead,
    PositiveLookbehind,
    NegativeLookbehind,
    Backreference,
}

impl FancyFeature {
    pub fn describe(self) -> &'static str {
        match self {
            FancyFeature::PositiveLookahead => "positive lookahead",
            FancyFeature::NegativeLookahead => "negative lookahead",
            FancyFeature::PositiveLookbehind => "positive lookbehind",
            FancyFeature::NegativeLookbehind => "negative lookbehind",
            FancyFeature::Backreference => "backreference",
        }
    }

    /// 前一个字符为反斜杠时是否视为转义（不计入命中）
    fn honours_escape(self) -> bool {
        matches!(self, FancyFeature::NegativeLookahead | FancyFeature::Backreference)
    }

    fn classify(token: &str) -> Option<Self> {
        match token {
            "(?=" => Some(FancyFeature::PositiveLookahead),
            "(?!" => Some(FancyFeature::NegativeLookahead),
            "(?<=" => Some(FancyFeature::PositiveLookbehind),
            "(?<!" => Some(FancyFeature::NegativeLookbehind),
            t if t.starts_with('\\') => Some(FancyFeature::Backreference),
            _ => None,
        }
    }
}

impl fmt::Display for FancyFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// 单次检测命中：特性种类 + 命中的原文片段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FancyMatch<'a> {
    pub feature: FancyFeature,
    pub matched: &'a str,
    /// 命中片段在正则源码中的字节偏移
    pub offset: usize,
}

impl FancyMatch<'_> {
    /// 报告中使用的原因文本
    pub fn reason(&self) -> String {
        format!("Found '{}'", self.matched)
    }
}

fn feature_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\(\?<=|\(\?<!|\(\?=|\(\?!|\\[1-9]").expect("feature regex is valid")
    })
}

/// 返回最左侧的高风险特性；未发现则返回 None
///
/// 仅以“前一个字符是反斜杠”判断转义（`\(?!`、`\\1` 不计入），
/// 不区分偶数个反斜杠的情况。
pub fn detect_fancy(regex_src: &str) -> Option<FancyMatch<'_>> {
    feature_regex().find_iter(regex_src).find_map(|m| {
        let feature = FancyFeature::classify(m.as_str())?;
        if feature.honours_escape() && regex_src[..m.start()].ends_with('\\') {
            return None;
        }
        Some(FancyMatch { feature, matched: m.as_str(), offset: m.start() })
    })
}
