//! LLM 提示词

use super::LengthCategory;

/// 默认系统角色指令
pub const STORYTELLER_SYSTEM_PROMPT: &str = "You are a creative storyteller.";

/// 一次对话请求（system + user）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryPrompt {
    pub system: String,
    pub user: String,
}

impl StoryPrompt {
    /// 故事正文提示词
    pub fn story(
        system: &str,
        genre: &str,
        theme: &str,
        length: LengthCategory,
        language: &str,
    ) -> Self {
        Self {
            system: system.to_string(),
            user: format!(
                "Write a {} {} story about {} in {}. Make it engaging and creative.",
                length.as_str(),
                genre.trim(),
                theme.trim(),
                language.trim()
            ),
        }
    }

    /// 标题摘要提示词
    pub fn title(system: &str, content: &str, max_words: usize) -> Self {
        Self {
            system: system.to_string(),
            user: format!(
                "Give a short, catchy title of at most {} words for the following story. \
                 Respond with the title only.\n\n{}",
                max_words, content
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_prompt() {
        let prompt = StoryPrompt::story(
            STORYTELLER_SYSTEM_PROMPT,
            "Fantasy",
            " A lost kingdom ",
            LengthCategory::Short,
            "english",
        );
        assert_eq!(prompt.system, "You are a creative storyteller.");
        assert_eq!(
            prompt.user,
            "Write a short Fantasy story about A lost kingdom in english. Make it engaging and creative."
        );
    }

    #[test]
    fn test_title_prompt_embeds_content() {
        let prompt = StoryPrompt::title(STORYTELLER_SYSTEM_PROMPT, "Once upon a time", 6);
        assert!(prompt.user.contains("at most 6 words"));
        assert!(prompt.user.ends_with("Once upon a time"));
    }
}
