//! Story Query Handlers

use std::str::FromStr;
use std::sync::Arc;

use crate::application::error::{parse_story_id, ApplicationError};
use crate::application::ports::{ListOptions, StoryRepositoryPort};
use crate::application::queries::{
    CountStoriesByOwner, GetStory, ListBookmarkedStories, ListStories, ListStoriesByOwner,
    SearchStories,
};
use crate::domain::story::{OwnerId, Story, StoryStatus};

/// GetStory Handler
pub struct GetStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl GetStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: GetStory) -> Result<Story, ApplicationError> {
        let story_id = parse_story_id(&query.story_id)?;

        self.story_repo
            .find_by_id(&story_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Story", story_id))
    }
}

/// ListStories Handler
pub struct ListStoriesHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ListStoriesHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: ListStories) -> Result<Vec<Story>, ApplicationError> {
        let options = ListOptions::page(query.skip.unwrap_or(0), query.limit);
        Ok(self.story_repo.list_all(options).await?)
    }
}

/// ListStoriesByOwner Handler - 指定 status 时按状态过滤
pub struct ListStoriesByOwnerHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ListStoriesByOwnerHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: ListStoriesByOwner) -> Result<Vec<Story>, ApplicationError> {
        let owner = OwnerId::new(query.owner_id);

        let stories = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(status) => {
                let status = StoryStatus::from_str(status)?;
                self.story_repo.list_by_owner_and_status(&owner, status).await?
            }
            None => self.story_repo.list_by_owner(&owner).await?,
        };

        Ok(stories)
    }
}

/// SearchStories Handler
pub struct SearchStoriesHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl SearchStoriesHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: SearchStories) -> Result<Vec<Story>, ApplicationError> {
        let text = query.query.trim();
        if text.is_empty() {
            return Err(ApplicationError::validation("search query must not be empty"));
        }

        Ok(self.story_repo.search(text).await?)
    }
}

/// CountStoriesByOwner Handler
pub struct CountStoriesByOwnerHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl CountStoriesByOwnerHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: CountStoriesByOwner) -> Result<u64, ApplicationError> {
        let owner = OwnerId::new(query.owner_id);
        Ok(self.story_repo.count_by_owner(&owner).await?)
    }
}

/// ListBookmarkedStories Handler
pub struct ListBookmarkedStoriesHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ListBookmarkedStoriesHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: ListBookmarkedStories) -> Result<Vec<Story>, ApplicationError> {
        let user = OwnerId::new(query.user_id);
        Ok(self.story_repo.list_bookmarked_by(&user).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::{AddBookmarkHandler, CreateAiStoryHandler, StorySettings};
    use crate::application::commands::{AddBookmark, CreateAiStory};
    use crate::application::enrichment::StoryEnricher;
    use crate::application::test_support::{
        media_settings, sample_story, CountingRepository, StubImages, StubSpeech, StubTextGenerator,
    };
    use crate::domain::story::{StoryId, TitleLimits, TitlePolicy};
    use crate::infrastructure::memory::InMemoryAudioCache;

    #[tokio::test]
    async fn test_get_story_not_found() {
        let repo = Arc::new(CountingRepository::new());

        let result = GetStoryHandler::new(repo)
            .handle(GetStory {
                story_id: StoryId::new().to_string(),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_newest_first_with_paging() {
        let repo = Arc::new(CountingRepository::new());
        for theme in ["A", "B", "C"] {
            repo.insert(&sample_story("u1", theme)).await.unwrap();
        }
        let handler = ListStoriesHandler::new(repo);

        let all = handler.handle(ListStories::default()).await.unwrap();
        let themes: Vec<&str> = all.iter().map(|s| s.theme()).collect();
        assert_eq!(themes, vec!["C", "B", "A"]);

        let page = handler
            .handle(ListStories {
                skip: Some(1),
                limit: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].theme(), "B");
    }

    #[tokio::test]
    async fn test_list_by_owner_with_status_filter() {
        let repo = Arc::new(CountingRepository::new());
        repo.insert(&sample_story("u1", "A")).await.unwrap();
        repo.insert(&sample_story("u2", "B")).await.unwrap();
        let handler = ListStoriesByOwnerHandler::new(repo.clone());

        let mine = handler
            .handle(ListStoriesByOwner {
                owner_id: "u1".to_string(),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);

        let published = handler
            .handle(ListStoriesByOwner {
                owner_id: "u1".to_string(),
                status: Some("published".to_string()),
            })
            .await
            .unwrap();
        assert!(published.is_empty());

        let invalid = handler
            .handle(ListStoriesByOwner {
                owner_id: "u1".to_string(),
                status: Some("archived".to_string()),
            })
            .await;
        assert!(matches!(invalid, Err(ApplicationError::Validation(_))));

        let count = CountStoriesByOwnerHandler::new(repo)
            .handle(CountStoriesByOwner {
                owner_id: "u2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let repo = Arc::new(CountingRepository::new());
        repo.insert(&sample_story("u1", "Dragons of the North")).await.unwrap();
        let handler = SearchStoriesHandler::new(repo);

        let hits = handler
            .handle(SearchStories {
                query: "dragons".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let blank = handler
            .handle(SearchStories {
                query: "  ".to_string(),
            })
            .await;
        assert!(matches!(blank, Err(ApplicationError::Validation(_))));
    }

    #[tokio::test]
    async fn test_bookmarked_by_after_two_ai_stories() {
        let repo = Arc::new(CountingRepository::new());
        let enricher = Arc::new(StoryEnricher::new(
            Arc::new(StubSpeech::ok(vec![1, 2])),
            Arc::new(StubImages::ok("https://images.test/a.jpg")),
            Arc::new(InMemoryAudioCache::new(1024)),
            media_settings(),
        ));
        let create = CreateAiStoryHandler::new(
            Arc::new(StubTextGenerator::ok("A title\nSome story.")),
            enricher,
            repo.clone(),
            StorySettings {
                title_policy: TitlePolicy::FirstLine,
                title_limits: TitleLimits::default(),
                default_language: "english".to_string(),
                system_prompt: "You are a creative storyteller.".to_string(),
            },
        );
        let bookmark = AddBookmarkHandler::new(repo.clone());

        let mut created = Vec::new();
        for theme in ["First", "Second"] {
            let story = create
                .handle(CreateAiStory {
                    genre: "Fantasy".to_string(),
                    theme: theme.to_string(),
                    length: "short".to_string(),
                    language: None,
                    owner_id: Some("u1".to_string()),
                    owner_name: None,
                    status: None,
                })
                .await
                .unwrap();
            bookmark
                .handle(AddBookmark {
                    story_id: story.id().to_string(),
                    user_id: "u2".to_string(),
                })
                .await
                .unwrap();
            created.push(*story.id());
        }
        repo.insert(&sample_story("u3", "Unrelated")).await.unwrap();

        let bookmarked = ListBookmarkedStoriesHandler::new(repo)
            .handle(ListBookmarkedStories {
                user_id: "u2".to_string(),
            })
            .await
            .unwrap();

        let ids: Vec<StoryId> = bookmarked.iter().map(|s| *s.id()).collect();
        assert_eq!(ids, vec![created[1], created[0]]);
    }
}
