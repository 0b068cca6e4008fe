//! Repository Ports - 出站端口
//!
//! 定义故事持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite / 内存）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::story::{ContentUpdate, OwnerId, Story, StoryId, StoryStatus};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// 添加书签的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkAdded {
    Added,
    AlreadyBookmarked,
}

/// 移除书签的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkRemoved {
    Removed,
    WasNotBookmarked,
}

/// 列表查询选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// 按创建顺序倒序（默认 true）
    pub newest_first: bool,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            newest_first: true,
            skip: 0,
            limit: None,
        }
    }
}

impl ListOptions {
    pub fn page(skip: usize, limit: Option<usize>) -> Self {
        Self {
            skip,
            limit,
            ..Default::default()
        }
    }
}

/// Story Repository Port
///
/// 所有列表查询默认按插入顺序倒序（最新在前）。
/// 修改类操作在 id 不存在时返回 `RepositoryError::NotFound`。
#[async_trait]
pub trait StoryRepositoryPort: Send + Sync {
    /// 插入故事，返回存储确认的 id
    async fn insert(&self, story: &Story) -> Result<StoryId, RepositoryError>;

    /// 根据 ID 查找故事
    async fn find_by_id(&self, id: &StoryId) -> Result<Option<Story>, RepositoryError>;

    /// 获取全部故事
    async fn list_all(&self, options: ListOptions) -> Result<Vec<Story>, RepositoryError>;

    /// 获取某用户的故事
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Story>, RepositoryError>;

    /// 获取某用户指定状态的故事
    async fn list_by_owner_and_status(
        &self,
        owner: &OwnerId,
        status: StoryStatus,
    ) -> Result<Vec<Story>, RepositoryError>;

    /// 标题或主题包含 query（大小写不敏感）
    async fn search(&self, query: &str) -> Result<Vec<Story>, RepositoryError>;

    /// 统计某用户的故事数量
    async fn count_by_owner(&self, owner: &OwnerId) -> Result<u64, RepositoryError>;

    /// 修改标题 / 正文 / 状态，返回修改后的故事
    async fn update_content(
        &self,
        id: &StoryId,
        update: &ContentUpdate,
    ) -> Result<Story, RepositoryError>;

    /// 删除故事
    async fn delete(&self, id: &StoryId) -> Result<(), RepositoryError>;

    /// 添加书签（幂等）
    async fn add_bookmark(
        &self,
        id: &StoryId,
        user: &OwnerId,
    ) -> Result<BookmarkAdded, RepositoryError>;

    /// 移除书签（幂等）
    async fn remove_bookmark(
        &self,
        id: &StoryId,
        user: &OwnerId,
    ) -> Result<BookmarkRemoved, RepositoryError>;

    /// 获取某用户收藏的故事
    async fn list_bookmarked_by(&self, user: &OwnerId) -> Result<Vec<Story>, RepositoryError>;
}
