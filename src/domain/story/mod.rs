//! Story Context - 故事限界上下文
//!
//! 职责:
//! - Story 聚合（字段不变量、书签集合）
//! - 标题推导策略
//! - 提示词与媒体兜底引用

mod aggregate;
mod errors;
mod media;
mod prompt;
mod title;
mod value_objects;

pub use aggregate::{ensure_publishable, ContentUpdate, Story, StoryDraft, StoryMedia};
pub use errors::StoryError;
pub use media::{
    audio_playback_url, audio_unavailable_url, fallback_image_url, image_keywords,
    image_search_query, DEFAULT_FALLBACK_IMAGE_TEMPLATE, KEYWORDS_PLACEHOLDER,
};
pub use prompt::{StoryPrompt, STORYTELLER_SYSTEM_PROMPT};
pub use title::{clean_title, title_from_first_line, TitleLimits, TitlePolicy};
pub use value_objects::{
    LengthCategory, OwnerId, StoryId, StorySource, StoryStatus, ANONYMOUS_OWNER,
};
