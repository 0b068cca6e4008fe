//! Bookmark Command Handlers

use std::sync::Arc;

use crate::application::commands::{AddBookmark, RemoveBookmark};
use crate::application::error::{parse_story_id, ApplicationError};
use crate::application::ports::{BookmarkAdded, BookmarkRemoved, StoryRepositoryPort};
use crate::domain::story::OwnerId;

/// 匿名用户没有可持久化的书签
fn bookmark_user(user_id: &str) -> Result<OwnerId, ApplicationError> {
    let user = OwnerId::new(user_id);
    if user.is_anonymous() {
        return Err(ApplicationError::forbidden("anonymous users cannot bookmark stories"));
    }
    Ok(user)
}

/// AddBookmark Handler
pub struct AddBookmarkHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl AddBookmarkHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: AddBookmark) -> Result<BookmarkAdded, ApplicationError> {
        let story_id = parse_story_id(&command.story_id)?;
        let user = bookmark_user(&command.user_id)?;

        let outcome = self.story_repo.add_bookmark(&story_id, &user).await?;

        tracing::debug!(story_id = %story_id, user = %user, outcome = ?outcome, "Bookmark add");

        Ok(outcome)
    }
}

/// RemoveBookmark Handler
pub struct RemoveBookmarkHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl RemoveBookmarkHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: RemoveBookmark) -> Result<BookmarkRemoved, ApplicationError> {
        let story_id = parse_story_id(&command.story_id)?;
        let user = bookmark_user(&command.user_id)?;

        let outcome = self.story_repo.remove_bookmark(&story_id, &user).await?;

        tracing::debug!(story_id = %story_id, user = %user, outcome = ?outcome, "Bookmark remove");

        Ok(outcome)
    }
}
