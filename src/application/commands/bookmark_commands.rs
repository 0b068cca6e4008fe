//! Bookmark Commands

/// 收藏故事
#[derive(Debug, Clone)]
pub struct AddBookmark {
    pub story_id: String,
    pub user_id: String,
}

/// 取消收藏
#[derive(Debug, Clone)]
pub struct RemoveBookmark {
    pub story_id: String,
    pub user_id: String,
}
