//! 应用层错误定义
//!
//! 统一的命令/查询错误类型。音频和配图失败不在这里：它们在
//! [`crate::application::enrichment`] 中被降级为兜底值。

use thiserror::Error;

use std::str::FromStr;

use crate::application::ports::{CacheError, RepositoryError};
use crate::domain::story::{StoryError, StoryId};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 策略前置条件不满足（如匿名用户发布）
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 必要的生成步骤失败（正文或严格策略下的标题）
    #[error("Story generation failed: {0}")]
    GenerationFailed(String),

    /// 存储不可用
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// 输入校验错误
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建 Forbidden 错误
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// 创建生成失败错误
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::GenerationFailed(message.into())
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::NotFound {
                resource_type: "Story",
                id,
            },
            RepositoryError::Duplicate(msg) => Self::StorageUnavailable(format!("duplicate entity: {}", msg)),
            other => Self::StorageUnavailable(other.to_string()),
        }
    }
}

impl From<StoryError> for ApplicationError {
    fn from(err: StoryError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CacheError> for ApplicationError {
    fn from(err: CacheError) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

/// 解析故事 ID；格式不合法的 ID 不可能存在，按未找到处理
pub(crate) fn parse_story_id(id: &str) -> Result<StoryId, ApplicationError> {
    StoryId::from_str(id.trim()).map_err(|_| ApplicationError::not_found("Story", id))
}
