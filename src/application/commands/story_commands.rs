//! Story Commands
//!
//! 字段保持调用方传入的原始字符串，枚举解析在 handler 中完成。

/// AI 生成故事
#[derive(Debug, Clone)]
pub struct CreateAiStory {
    pub genre: String,
    pub theme: String,
    pub length: String,
    pub language: Option<String>,
    pub owner_id: Option<String>,
    pub owner_name: Option<String>,
    /// draft / published，缺省为 draft
    pub status: Option<String>,
}

/// 手动录入故事
#[derive(Debug, Clone)]
pub struct CreateManualStory {
    pub genre: String,
    pub theme: String,
    pub length: String,
    pub language: Option<String>,
    pub title: String,
    pub content: String,
    pub owner_id: Option<String>,
    pub owner_name: Option<String>,
    pub status: Option<String>,
}

/// 修改标题 / 正文 / 状态
#[derive(Debug, Clone)]
pub struct UpdateStory {
    pub story_id: String,
    pub title: String,
    pub content: String,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct DeleteStory {
    pub story_id: String,
}
