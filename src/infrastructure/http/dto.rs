//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::{BookmarkAdded, BookmarkRemoved};
use crate::domain::story::Story;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Story DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateStoryRequest {
    pub genre: String,
    pub theme: String,
    pub length: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ManualStoryRequest {
    pub genre: String,
    pub theme: String,
    pub length: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StoryIdRequest {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListStoriesRequest {
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerStoriesRequest {
    pub owner_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerRequest {
    pub owner_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchStoriesRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStoryRequest {
    pub id: String,
    pub title: String,
    pub content: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct BookmarkRequest {
    pub story_id: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct StoryResponse {
    pub id: String,
    pub genre: String,
    pub theme: String,
    pub length: String,
    pub language: String,
    pub title: String,
    pub content: String,
    pub audio_url: String,
    pub image_url: String,
    pub source: String,
    pub status: String,
    pub owner_id: String,
    pub owner_name: String,
    pub bookmarks: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Story> for StoryResponse {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id().to_string(),
            genre: story.genre().to_string(),
            theme: story.theme().to_string(),
            length: story.length().as_str().to_string(),
            language: story.language().to_string(),
            title: story.title().to_string(),
            content: story.content().to_string(),
            audio_url: story.audio_url().to_string(),
            image_url: story.image_url().to_string(),
            source: story.source().as_str().to_string(),
            status: story.status().as_str().to_string(),
            owner_id: story.owner_id().to_string(),
            owner_name: story.owner_name().to_string(),
            bookmarks: story.bookmarks().iter().map(|u| u.to_string()).collect(),
            created_at: story.created_at().to_rfc3339(),
            updated_at: story.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StoryListResponse {
    pub total: usize,
    pub stories: Vec<StoryResponse>,
}

impl From<Vec<Story>> for StoryListResponse {
    fn from(stories: Vec<Story>) -> Self {
        Self {
            total: stories.len(),
            stories: stories.iter().map(StoryResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub owner_id: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct DeleteStoryResponse {
    pub id: String,
    pub status: String, // "deleted"
}

#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    pub story_id: String,
    pub user_id: String,
    pub bookmarked: bool,
    /// false 表示幂等的无操作（已收藏 / 未收藏）
    pub changed: bool,
}

impl BookmarkResponse {
    pub fn added(story_id: String, user_id: String, outcome: BookmarkAdded) -> Self {
        Self {
            story_id,
            user_id,
            bookmarked: true,
            changed: outcome == BookmarkAdded::Added,
        }
    }

    pub fn removed(story_id: String, user_id: String, outcome: BookmarkRemoved) -> Self {
        Self {
            story_id,
            user_id,
            bookmarked: false,
            changed: outcome == BookmarkRemoved::Removed,
        }
    }
}
