//! 测试用桩适配器与计数仓储

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::application::enrichment::MediaSettings;
use crate::application::ports::{
    BookmarkAdded, BookmarkRemoved, ExternalServiceError, ImageSearchPort, ListOptions,
    RepositoryError, SpeechSynthesisPort, StoryRepositoryPort, SynthesisRequest,
    TextGenerationPort,
};
use crate::domain::story::{
    ContentUpdate, LengthCategory, OwnerId, Story, StoryDraft, StoryId, StoryMedia, StoryPrompt,
    StorySource, StoryStatus, DEFAULT_FALLBACK_IMAGE_TEMPLATE,
};
use crate::infrastructure::memory::InMemoryStoryRepository;

pub fn media_settings() -> MediaSettings {
    MediaSettings {
        public_base_url: "http://localhost:8000".to_string(),
        fallback_image_template: DEFAULT_FALLBACK_IMAGE_TEMPLATE.to_string(),
        default_locale: "en".to_string(),
        parallel: false,
    }
}

pub fn sample_story(owner: &str, theme: &str) -> Story {
    let draft = StoryDraft {
        id: StoryId::new(),
        genre: "Fantasy".to_string(),
        theme: theme.to_string(),
        length: LengthCategory::Short,
        language: "english".to_string(),
        title: format!("{} tale", theme),
        content: "Once upon a time.".to_string(),
        source: StorySource::Manual,
        status: StoryStatus::Draft,
        owner_id: OwnerId::new(owner),
        owner_name: owner.to_string(),
    };
    let media = StoryMedia {
        audio_url: "http://localhost:8000/api/story/audio/unavailable".to_string(),
        image_url: "https://images.test/sample.jpg".to_string(),
    };
    Story::new(draft, media).unwrap()
}

// ============================================================================
// 外部服务桩
// ============================================================================

pub struct StubTextGenerator {
    story: Result<String, String>,
    title: Result<String, String>,
    calls: AtomicUsize,
}

impl StubTextGenerator {
    pub fn ok(story: &str) -> Self {
        Self {
            story: Ok(story.to_string()),
            title: Ok("Generated Title".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            story: Err("upstream returned 500".to_string()),
            title: Err("upstream returned 500".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Ok(title.to_string());
        self
    }

    pub fn with_failing_title(mut self) -> Self {
        self.title = Err("timed out".to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerationPort for StubTextGenerator {
    async fn generate(&self, prompt: &StoryPrompt) -> Result<String, ExternalServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = if prompt.user.starts_with("Give a short") {
            &self.title
        } else {
            &self.story
        };
        reply
            .clone()
            .map_err(|message| ExternalServiceError::new("llm", message))
    }
}

pub struct StubSpeech {
    audio: Option<Vec<u8>>,
    calls: AtomicUsize,
}

impl StubSpeech {
    pub fn ok(audio: Vec<u8>) -> Self {
        Self {
            audio: Some(audio),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            audio: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesisPort for StubSpeech {
    async fn synthesize(&self, _request: SynthesisRequest) -> Result<Vec<u8>, ExternalServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.audio
            .clone()
            .ok_or_else(|| ExternalServiceError::new("tts", "connection refused"))
    }
}

pub struct StubImages {
    url: Option<String>,
}

impl StubImages {
    pub fn ok(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { url: None }
    }
}

#[async_trait]
impl ImageSearchPort for StubImages {
    async fn search(&self, _query: &str) -> Result<String, ExternalServiceError> {
        self.url
            .clone()
            .ok_or_else(|| ExternalServiceError::new("image", "no access key configured"))
    }
}

// ============================================================================
// 计数仓储
// ============================================================================

/// 包装内存仓储，记录 insert 调用次数
pub struct CountingRepository {
    inner: InMemoryStoryRepository,
    inserts: AtomicUsize,
    fail_inserts: AtomicBool,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStoryRepository::new(),
            inserts: AtomicUsize::new(0),
            fail_inserts: AtomicBool::new(false),
        }
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoryRepositoryPort for CountingRepository {
    async fn insert(&self, story: &Story) -> Result<StoryId, RepositoryError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(RepositoryError::DatabaseError("connection lost".to_string()));
        }
        self.inner.insert(story).await
    }

    async fn find_by_id(&self, id: &StoryId) -> Result<Option<Story>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn list_all(&self, options: ListOptions) -> Result<Vec<Story>, RepositoryError> {
        self.inner.list_all(options).await
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Story>, RepositoryError> {
        self.inner.list_by_owner(owner).await
    }

    async fn list_by_owner_and_status(
        &self,
        owner: &OwnerId,
        status: StoryStatus,
    ) -> Result<Vec<Story>, RepositoryError> {
        self.inner.list_by_owner_and_status(owner, status).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Story>, RepositoryError> {
        self.inner.search(query).await
    }

    async fn count_by_owner(&self, owner: &OwnerId) -> Result<u64, RepositoryError> {
        self.inner.count_by_owner(owner).await
    }

    async fn update_content(
        &self,
        id: &StoryId,
        update: &ContentUpdate,
    ) -> Result<Story, RepositoryError> {
        self.inner.update_content(id, update).await
    }

    async fn delete(&self, id: &StoryId) -> Result<(), RepositoryError> {
        self.inner.delete(id).await
    }

    async fn add_bookmark(
        &self,
        id: &StoryId,
        user: &OwnerId,
    ) -> Result<BookmarkAdded, RepositoryError> {
        self.inner.add_bookmark(id, user).await
    }

    async fn remove_bookmark(
        &self,
        id: &StoryId,
        user: &OwnerId,
    ) -> Result<BookmarkRemoved, RepositoryError> {
        self.inner.remove_bookmark(id, user).await
    }

    async fn list_bookmarked_by(&self, user: &OwnerId) -> Result<Vec<Story>, RepositoryError> {
        self.inner.list_bookmarked_by(user).await
    }
}
