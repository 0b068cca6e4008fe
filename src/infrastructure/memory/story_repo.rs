//! In-Memory Story Repository
//!
//! DashMap + 插入序号，与 SQLite 实现遵守同一契约（最新在前、书签幂等）。

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::ports::{
    BookmarkAdded, BookmarkRemoved, ListOptions, RepositoryError, StoryRepositoryPort,
};
use crate::domain::story::{ContentUpdate, OwnerId, Story, StoryId, StoryStatus};

struct StoredStory {
    seq: u64,
    story: Story,
}

pub struct InMemoryStoryRepository {
    stories: DashMap<StoryId, StoredStory>,
    next_seq: AtomicU64,
}

impl InMemoryStoryRepository {
    pub fn new() -> Self {
        Self {
            stories: DashMap::new(),
            next_seq: AtomicU64::new(1),
        }
    }

    /// 过滤后按插入序号排序
    fn collect<F>(&self, options: ListOptions, filter: F) -> Vec<Story>
    where
        F: Fn(&Story) -> bool,
    {
        let mut matched: Vec<(u64, Story)> = self
            .stories
            .iter()
            .filter(|item| filter(&item.value().story))
            .map(|item| (item.value().seq, item.value().story.clone()))
            .collect();

        if options.newest_first {
            matched.sort_by(|a, b| b.0.cmp(&a.0));
        } else {
            matched.sort_by(|a, b| a.0.cmp(&b.0));
        }

        matched
            .into_iter()
            .skip(options.skip)
            .take(options.limit.unwrap_or(usize::MAX))
            .map(|(_, story)| story)
            .collect()
    }
}

impl Default for InMemoryStoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: &StoryId) -> RepositoryError {
    RepositoryError::NotFound(id.to_string())
}

#[async_trait]
impl StoryRepositoryPort for InMemoryStoryRepository {
    async fn insert(&self, story: &Story) -> Result<StoryId, RepositoryError> {
        match self.stories.entry(*story.id()) {
            Entry::Occupied(_) => Err(RepositoryError::Duplicate(story.id().to_string())),
            Entry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                slot.insert(StoredStory {
                    seq,
                    story: story.clone(),
                });
                Ok(*story.id())
            }
        }
    }

    async fn find_by_id(&self, id: &StoryId) -> Result<Option<Story>, RepositoryError> {
        Ok(self.stories.get(id).map(|item| item.story.clone()))
    }

    async fn list_all(&self, options: ListOptions) -> Result<Vec<Story>, RepositoryError> {
        Ok(self.collect(options, |_| true))
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Story>, RepositoryError> {
        Ok(self.collect(ListOptions::default(), |story| story.owner_id() == owner))
    }

    async fn list_by_owner_and_status(
        &self,
        owner: &OwnerId,
        status: StoryStatus,
    ) -> Result<Vec<Story>, RepositoryError> {
        Ok(self.collect(ListOptions::default(), |story| {
            story.owner_id() == owner && story.status() == status
        }))
    }

    async fn search(&self, query: &str) -> Result<Vec<Story>, RepositoryError> {
        Ok(self.collect(ListOptions::default(), |story| story.matches_text(query)))
    }

    async fn count_by_owner(&self, owner: &OwnerId) -> Result<u64, RepositoryError> {
        Ok(self
            .stories
            .iter()
            .filter(|item| item.story.owner_id() == owner)
            .count() as u64)
    }

    async fn update_content(
        &self,
        id: &StoryId,
        update: &ContentUpdate,
    ) -> Result<Story, RepositoryError> {
        let mut item = self.stories.get_mut(id).ok_or_else(|| not_found(id))?;
        item.story
            .apply_update(update.clone())
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        Ok(item.story.clone())
    }

    async fn delete(&self, id: &StoryId) -> Result<(), RepositoryError> {
        self.stories
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    async fn add_bookmark(
        &self,
        id: &StoryId,
        user: &OwnerId,
    ) -> Result<BookmarkAdded, RepositoryError> {
        let mut item = self.stories.get_mut(id).ok_or_else(|| not_found(id))?;
        if item.story.add_bookmark(user.clone()) {
            Ok(BookmarkAdded::Added)
        } else {
            Ok(BookmarkAdded::AlreadyBookmarked)
        }
    }

    async fn remove_bookmark(
        &self,
        id: &StoryId,
        user: &OwnerId,
    ) -> Result<BookmarkRemoved, RepositoryError> {
        let mut item = self.stories.get_mut(id).ok_or_else(|| not_found(id))?;
        if item.story.remove_bookmark(user) {
            Ok(BookmarkRemoved::Removed)
        } else {
            Ok(BookmarkRemoved::WasNotBookmarked)
        }
    }

    async fn list_bookmarked_by(&self, user: &OwnerId) -> Result<Vec<Story>, RepositoryError> {
        Ok(self.collect(ListOptions::default(), |story| story.is_bookmarked_by(user)))
    }
}
