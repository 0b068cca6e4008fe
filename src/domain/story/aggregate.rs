//! Story Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{LengthCategory, OwnerId, StoryError, StoryId, StorySource, StoryStatus};

/// 创建故事所需的字段（不含媒体引用）
#[derive(Debug, Clone)]
pub struct StoryDraft {
    pub id: StoryId,
    pub genre: String,
    pub theme: String,
    pub length: LengthCategory,
    pub language: String,
    pub title: String,
    pub content: String,
    pub source: StorySource,
    pub status: StoryStatus,
    pub owner_id: OwnerId,
    pub owner_name: String,
}

/// 音频 / 配图引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryMedia {
    pub audio_url: String,
    pub image_url: String,
}

/// 可变字段（创建后只能修改这三项）
#[derive(Debug, Clone)]
pub struct ContentUpdate {
    pub title: String,
    pub content: String,
    pub status: StoryStatus,
}

/// Story 聚合根
///
/// 不变量:
/// - id 创建后不可变
/// - status 为 published 时 title 和 content 不为空
/// - bookmarks 不含重复用户
/// - 创建后只有 title / content / status 可修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    id: StoryId,
    genre: String,
    theme: String,
    length: LengthCategory,
    language: String,
    title: String,
    content: String,
    audio_url: String,
    image_url: String,
    source: StorySource,
    status: StoryStatus,
    owner_id: OwnerId,
    owner_name: String,
    bookmarks: BTreeSet<OwnerId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Story {
    /// 由草稿和媒体引用组装新故事
    pub fn new(draft: StoryDraft, media: StoryMedia) -> Result<Self, StoryError> {
        ensure_publishable(draft.status, &draft.title, &draft.content)?;

        let now = Utc::now();
        Ok(Self {
            id: draft.id,
            genre: draft.genre,
            theme: draft.theme,
            length: draft.length,
            language: draft.language,
            title: draft.title,
            content: draft.content,
            audio_url: media.audio_url,
            image_url: media.image_url,
            source: draft.source,
            status: draft.status,
            owner_id: draft.owner_id,
            owner_name: draft.owner_name,
            bookmarks: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// 从持久化数据恢复
    pub fn from_parts(
        draft: StoryDraft,
        media: StoryMedia,
        bookmarks: BTreeSet<OwnerId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: draft.id,
            genre: draft.genre,
            theme: draft.theme,
            length: draft.length,
            language: draft.language,
            title: draft.title,
            content: draft.content,
            audio_url: media.audio_url,
            image_url: media.image_url,
            source: draft.source,
            status: draft.status,
            owner_id: draft.owner_id,
            owner_name: draft.owner_name,
            bookmarks,
            created_at,
            updated_at,
        }
    }

    /// 修改标题 / 正文 / 状态
    pub fn apply_update(&mut self, update: ContentUpdate) -> Result<(), StoryError> {
        ensure_publishable(update.status, &update.title, &update.content)?;
        self.title = update.title;
        self.content = update.content;
        self.status = update.status;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 添加书签，已存在时返回 false
    pub fn add_bookmark(&mut self, user: OwnerId) -> bool {
        self.bookmarks.insert(user)
    }

    /// 移除书签，不存在时返回 false
    pub fn remove_bookmark(&mut self, user: &OwnerId) -> bool {
        self.bookmarks.remove(user)
    }

    pub fn is_bookmarked_by(&self, user: &OwnerId) -> bool {
        self.bookmarks.contains(user)
    }

    /// 标题或主题包含 `query`，按 Unicode 小写比较
    pub fn matches_text(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.theme.to_lowercase().contains(&needle)
    }

    // Getters
    pub fn id(&self) -> &StoryId {
        &self.id
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn length(&self) -> LengthCategory {
        self.length
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn audio_url(&self) -> &str {
        &self.audio_url
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn source(&self) -> StorySource {
        self.source
    }

    pub fn status(&self) -> StoryStatus {
        self.status
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn bookmarks(&self) -> &BTreeSet<OwnerId> {
        &self.bookmarks
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// published 状态要求标题和正文非空
pub fn ensure_publishable(status: StoryStatus, title: &str, content: &str) -> Result<(), StoryError> {
    if status.is_published() && (title.trim().is_empty() || content.trim().is_empty()) {
        return Err(StoryError::PublishedWithoutContent);
    }
    Ok(())
}
