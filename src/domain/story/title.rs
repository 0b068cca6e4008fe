//! 标题推导
//!
//! 两种策略:
//! - 首行截断：取正文第一行非空文本，按词数和字符数截断
//! - AI 摘要：由 LLM 生成标题，结果用同样的规则清洗和截断

use serde::Deserialize;

/// 标题推导策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TitlePolicy {
    /// 只用正文首行
    #[default]
    FirstLine,
    /// 只用 AI 摘要，失败即创建失败
    Ai,
    /// 优先 AI 摘要，失败时退回首行
    AiOrFirstLine,
}

impl TitlePolicy {
    pub fn uses_ai(&self) -> bool {
        matches!(self, TitlePolicy::Ai | TitlePolicy::AiOrFirstLine)
    }

    pub fn allows_first_line(&self) -> bool {
        matches!(self, TitlePolicy::FirstLine | TitlePolicy::AiOrFirstLine)
    }
}

/// 标题长度限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleLimits {
    pub max_words: usize,
    pub max_chars: usize,
}

impl Default for TitleLimits {
    fn default() -> Self {
        Self {
            max_words: 8,
            max_chars: 80,
        }
    }
}

/// 取正文首行作为标题
pub fn title_from_first_line(content: &str, limits: TitleLimits) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| clean_title(line, limits))
}

/// 清洗标题文本：去掉 markdown 标记、"Title:" 前缀和包裹的引号，再截断
pub fn clean_title(raw: &str, limits: TitleLimits) -> Option<String> {
    let mut text = raw.trim().trim_start_matches('#').trim();

    if let Some(prefix) = text.get(..6) {
        if prefix.eq_ignore_ascii_case("title:") {
            text = text[6..].trim();
        }
    }

    let text = text.trim_matches(|c: char| matches!(c, '"' | '\'' | '*' | '“' | '”' | '_'));

    let words: Vec<&str> = text.split_whitespace().take(limits.max_words).collect();
    let mut title = words.join(" ");

    if title.chars().count() > limits.max_chars {
        title = title.chars().take(limits.max_chars).collect();
    }

    let title = title
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-'))
        .to_string();

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_skips_blank_lines() {
        let content = "\n\n  The Lost Kingdom  \nOnce upon a time...";
        assert_eq!(
            title_from_first_line(content, TitleLimits::default()).as_deref(),
            Some("The Lost Kingdom")
        );
    }

    #[test]
    fn test_first_line_truncates_words() {
        let content = "one two three four five six seven eight nine ten";
        let limits = TitleLimits {
            max_words: 4,
            max_chars: 80,
        };
        assert_eq!(
            title_from_first_line(content, limits).as_deref(),
            Some("one two three four")
        );
    }

    #[test]
    fn test_truncates_chars_on_char_boundary() {
        let limits = TitleLimits {
            max_words: 10,
            max_chars: 5,
        };
        assert_eq!(clean_title("失落的王国传说", limits).as_deref(), Some("失落的王国"));
    }

    #[test]
    fn test_clean_title_strips_markup() {
        let limits = TitleLimits::default();
        assert_eq!(clean_title("# Title: \"The Ember Crown\"", limits).as_deref(), Some("The Ember Crown"));
        assert_eq!(clean_title("**Starfall**", limits).as_deref(), Some("Starfall"));
        assert_eq!(clean_title("  \"\"  ", limits), None);
    }

    #[test]
    fn test_empty_content_has_no_title() {
        assert_eq!(title_from_first_line("   \n  ", TitleLimits::default()), None);
    }

    #[test]
    fn test_policy_flags() {
        assert!(!TitlePolicy::FirstLine.uses_ai());
        assert!(TitlePolicy::Ai.uses_ai());
        assert!(!TitlePolicy::Ai.allows_first_line());
        assert!(TitlePolicy::AiOrFirstLine.allows_first_line());
    }
}
