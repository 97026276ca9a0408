//! 宏调用提取（轻量文本匹配，不解析宿主语言语法）
//!
//! 识别形如 `safe_pattern!("name", r#"..."#)` / `destructive_pattern!(r"...")` 的调用：
//! - 开头部分（关键字、可选名称、`r` 与若干 `#`）由正则一次匹配；
//! - 正文的结束位置按“引号 + 与开头相同数量的 `#`”手动查找，
//!   因此正文中出现的数量不一致的 `"#` 序列会原样保留。
use regex::Regex;
use std::sync::OnceLock;

use crate::types::{PatternDeclaration, PatternKind};

/// 原始字符串定界符中重复的字符
const FENCE_CHAR: char = '#';

/// 宏调用开头：关键字、可选名称参数、原始字符串起始定界符（可跨行）
fn opening_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\b(safe|destructive)_pattern!\s*\(\s*(?:"([^"]+)"\s*,\s*)?r(#*)""#)
            .expect("opening macro regex is valid")
    })
}

/// 提取文本中的全部模式声明，按出现顺序返回
///
/// 无法识别的调用（语法残缺、定界符数量不匹配、首参数不是字符串等）直接跳过。
pub fn extract_declarations(content: &str) -> Vec<PatternDeclaration<'_>> {
    let re = opening_regex();
    let mut out = Vec::new();
    let mut pos = 0;
    // 行号增量计算：记录已统计到的偏移
    let mut line = 1;
    let mut line_pos = 0;

    while let Some(caps) = re.captures_at(content, pos) {
        let Some(whole) = caps.get(0) else { break };
        let Some(kind) = caps.get(1).and_then(|m| PatternKind::from_keyword(m.as_str())) else {
            pos = whole.end();
            continue;
        };
        let fence = caps.get(3).map_or(0, |m| m.len());
        let body_start = whole.end();

        let Some((body_end, next)) = find_closing(content, body_start, fence) else {
            // 没有同数量的结束定界符：视为无效调用，从开头之后继续搜索
            pos = body_start;
            continue;
        };

        line += content[line_pos..whole.start()].matches('\n').count();
        line_pos = whole.start();

        out.push(PatternDeclaration {
            kind,
            name: caps.get(2).map(|m| m.as_str()),
            raw: &content[body_start..body_end],
            line,
        });
        pos = next;
    }

    out
}

/// 从 `from` 开始查找 `"` 后紧跟 `fence` 个 `#` 的结束定界符
/// 返回 (正文结束偏移, 定界符之后的偏移)
fn find_closing(content: &str, from: usize, fence: usize) -> Option<(usize, usize)> {
    let mut closing = String::with_capacity(fence + 1);
    closing.push('"');
    closing.extend(std::iter::repeat(FENCE_CHAR).take(fence));

    content[from..]
        .find(&closing)
        .map(|rel| (from + rel, from + rel + closing.len()))
}
