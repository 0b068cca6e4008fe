//! Story Queries

/// 获取故事详情
#[derive(Debug, Clone)]
pub struct GetStory {
    pub story_id: String,
}

/// 列出全部故事（最新在前）
#[derive(Debug, Clone, Default)]
pub struct ListStories {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

/// 列出某用户的故事，可按状态过滤
#[derive(Debug, Clone)]
pub struct ListStoriesByOwner {
    pub owner_id: String,
    pub status: Option<String>,
}

/// 按标题或主题搜索
#[derive(Debug, Clone)]
pub struct SearchStories {
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct CountStoriesByOwner {
    pub owner_id: String,
}

/// 列出某用户收藏的故事
#[derive(Debug, Clone)]
pub struct ListBookmarkedStories {
    pub user_id: String,
}
