//! Story Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoryError {
    #[error("无效的故事 ID: {0}")]
    InvalidId(String),

    #[error("无效的篇幅: {0} (可选 short/medium/long)")]
    InvalidLength(String),

    #[error("无效的状态: {0} (可选 draft/published)")]
    InvalidStatus(String),

    #[error("无效的来源: {0}")]
    InvalidSource(String),

    #[error("已发布的故事必须包含标题和正文")]
    PublishedWithoutContent,
}
