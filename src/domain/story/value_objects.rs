//! Story Context - Value Objects

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::StoryError;

/// 故事唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryId(Uuid);

impl StoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StoryId {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| StoryError::InvalidId(s.to_string()))
    }
}

/// 篇幅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthCategory {
    Short,
    Medium,
    Long,
}

impl LengthCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthCategory::Short => "short",
            LengthCategory::Medium => "medium",
            LengthCategory::Long => "long",
        }
    }
}

impl FromStr for LengthCategory {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(LengthCategory::Short),
            "medium" => Ok(LengthCategory::Medium),
            "long" => Ok(LengthCategory::Long),
            _ => Err(StoryError::InvalidLength(s.to_string())),
        }
    }
}

impl std::fmt::Display for LengthCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 发布状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoryStatus {
    /// 草稿
    #[default]
    Draft,
    /// 已发布
    Published,
}

impl StoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryStatus::Draft => "draft",
            StoryStatus::Published => "published",
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, StoryStatus::Published)
    }
}

impl FromStr for StoryStatus {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(StoryStatus::Draft),
            "published" => Ok(StoryStatus::Published),
            _ => Err(StoryError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 故事来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorySource {
    /// AI 生成
    Ai,
    /// 用户手写
    Manual,
}

impl StorySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorySource::Ai => "ai",
            StorySource::Manual => "manual",
        }
    }
}

impl FromStr for StorySource {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ai" => Ok(StorySource::Ai),
            "manual" => Ok(StorySource::Manual),
            _ => Err(StoryError::InvalidSource(s.to_string())),
        }
    }
}

/// 匿名用户标识
pub const ANONYMOUS_OWNER: &str = "guest";

/// 作者 / 用户标识
///
/// 空字符串归一化为匿名用户
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            Self::anonymous()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS_OWNER.to_string())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_OWNER
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Option<String>> for OwnerId {
    fn from(id: Option<String>) -> Self {
        id.map(OwnerId::new).unwrap_or_else(OwnerId::anonymous)
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
