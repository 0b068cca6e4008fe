//! Story Command Handlers - 故事创建编排
//!
//! 创建流程:
//! 1. 生成正文（AI 路径，失败即终止）
//! 2. 推导标题（AI 路径，按 [`TitlePolicy`]）
//! 3. 合成音频并写缓存（尽力而为）
//! 4. 搜索配图（尽力而为）
//! 5. 组装并插入
//!
//! 发布权限在第 1 步之前检查，不满足时不会发起任何外部调用。

use std::str::FromStr;
use std::sync::Arc;

use crate::application::commands::{CreateAiStory, CreateManualStory, DeleteStory, UpdateStory};
use crate::application::enrichment::StoryEnricher;
use crate::application::error::{parse_story_id, ApplicationError};
use crate::application::ports::{AudioCachePort, StoryRepositoryPort, TextGenerationPort};
use crate::domain::story::{
    clean_title, ensure_publishable, title_from_first_line, ContentUpdate, LengthCategory,
    OwnerId, Story, StoryDraft, StoryId, StoryPrompt, StorySource, StoryStatus, TitleLimits,
    TitlePolicy,
};

/// 故事生成配置
#[derive(Debug, Clone)]
pub struct StorySettings {
    pub title_policy: TitlePolicy,
    pub title_limits: TitleLimits,
    /// 未指定语言时使用
    pub default_language: String,
    pub system_prompt: String,
}

// ============================================================================
// 公共步骤
// ============================================================================

fn parse_status(status: Option<&str>) -> Result<StoryStatus, ApplicationError> {
    match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Ok(StoryStatus::from_str(s)?),
        None => Ok(StoryStatus::default()),
    }
}

/// 匿名用户不能发布
fn ensure_may_publish(status: StoryStatus, owner: &OwnerId) -> Result<(), ApplicationError> {
    if status.is_published() && owner.is_anonymous() {
        return Err(ApplicationError::forbidden(
            "anonymous users cannot publish stories",
        ));
    }
    Ok(())
}

fn resolve_language(language: Option<String>, default_language: &str) -> String {
    language
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| default_language.to_string())
}

fn resolve_owner_name(owner_name: Option<String>, owner: &OwnerId) -> String {
    owner_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| owner.as_str().to_string())
}

/// 第 3-5 步：富化、组装、插入
///
/// 插入失败时清理已写入缓存的音频，不留下孤立条目。
async fn enrich_and_insert(
    enricher: &StoryEnricher,
    story_repo: &dyn StoryRepositoryPort,
    draft: StoryDraft,
) -> Result<Story, ApplicationError> {
    let story_id = draft.id;
    let media = enricher.enrich(&draft).await;

    let story = match Story::new(draft, media) {
        Ok(story) => story,
        Err(e) => {
            enricher.discard_audio(story_id).await;
            return Err(e.into());
        }
    };

    if let Err(e) = story_repo.insert(&story).await {
        tracing::error!(story_id = %story_id, step = "insert", error = %e, "Failed to persist story");
        enricher.discard_audio(story_id).await;
        return Err(e.into());
    }

    Ok(story)
}

// ============================================================================
// CreateAiStory
// ============================================================================

/// CreateAiStory Handler
pub struct CreateAiStoryHandler {
    text_generator: Arc<dyn TextGenerationPort>,
    enricher: Arc<StoryEnricher>,
    story_repo: Arc<dyn StoryRepositoryPort>,
    settings: StorySettings,
}

impl CreateAiStoryHandler {
    pub fn new(
        text_generator: Arc<dyn TextGenerationPort>,
        enricher: Arc<StoryEnricher>,
        story_repo: Arc<dyn StoryRepositoryPort>,
        settings: StorySettings,
    ) -> Self {
        Self {
            text_generator,
            enricher,
            story_repo,
            settings,
        }
    }

    pub async fn handle(&self, command: CreateAiStory) -> Result<Story, ApplicationError> {
        let length = LengthCategory::from_str(&command.length)?;
        let status = parse_status(command.status.as_deref())?;
        let owner_id = OwnerId::from(command.owner_id);
        ensure_may_publish(status, &owner_id)?;

        let language = resolve_language(command.language, &self.settings.default_language);
        let story_id = StoryId::new();

        tracing::info!(
            story_id = %story_id,
            owner = %owner_id,
            genre = %command.genre,
            length = %length,
            "Generating story"
        );

        let prompt = StoryPrompt::story(
            &self.settings.system_prompt,
            &command.genre,
            &command.theme,
            length,
            &language,
        );
        let content = self.generate_content(story_id, &prompt).await?;
        let title = self.derive_title(story_id, &content).await?;

        let draft = StoryDraft {
            id: story_id,
            genre: command.genre.trim().to_string(),
            theme: command.theme.trim().to_string(),
            length,
            language,
            title,
            content,
            source: StorySource::Ai,
            status,
            owner_name: resolve_owner_name(command.owner_name, &owner_id),
            owner_id,
        };

        let story = enrich_and_insert(&self.enricher, self.story_repo.as_ref(), draft).await?;

        tracing::info!(
            story_id = %story.id(),
            title = %story.title(),
            status = %story.status(),
            "AI story created"
        );

        Ok(story)
    }

    /// 第 1 步
    async fn generate_content(
        &self,
        story_id: StoryId,
        prompt: &StoryPrompt,
    ) -> Result<String, ApplicationError> {
        let content = self.text_generator.generate(prompt).await.map_err(|e| {
            tracing::error!(story_id = %story_id, step = "content", error = %e, "Story generation failed");
            ApplicationError::generation_failed(e.to_string())
        })?;

        let content = content.trim().to_string();
        if content.is_empty() {
            tracing::error!(story_id = %story_id, step = "content", "Text generation returned empty content");
            return Err(ApplicationError::generation_failed(
                "text generation returned empty content",
            ));
        }

        Ok(content)
    }

    /// 第 2 步
    async fn derive_title(&self, story_id: StoryId, content: &str) -> Result<String, ApplicationError> {
        let policy = self.settings.title_policy;
        let limits = self.settings.title_limits;

        if policy.uses_ai() {
            let prompt = StoryPrompt::title(&self.settings.system_prompt, content, limits.max_words);
            let reason = match self.text_generator.generate(&prompt).await {
                Ok(raw) => match clean_title(&raw, limits) {
                    Some(title) => return Ok(title),
                    None => "summarization returned an empty title".to_string(),
                },
                Err(e) => e.to_string(),
            };

            if !policy.allows_first_line() {
                tracing::error!(story_id = %story_id, step = "title", error = %reason, "Title generation failed");
                return Err(ApplicationError::generation_failed(reason));
            }
            tracing::warn!(story_id = %story_id, step = "title", error = %reason, "Title generation failed, using first line");
        }

        title_from_first_line(content, limits)
            .ok_or_else(|| ApplicationError::generation_failed("unable to derive a title from content"))
    }
}

// ============================================================================
// CreateManualStory
// ============================================================================

/// CreateManualStory Handler - 跳过第 1、2 步
pub struct CreateManualStoryHandler {
    enricher: Arc<StoryEnricher>,
    story_repo: Arc<dyn StoryRepositoryPort>,
    default_language: String,
}

impl CreateManualStoryHandler {
    pub fn new(
        enricher: Arc<StoryEnricher>,
        story_repo: Arc<dyn StoryRepositoryPort>,
        default_language: impl Into<String>,
    ) -> Self {
        Self {
            enricher,
            story_repo,
            default_language: default_language.into(),
        }
    }

    pub async fn handle(&self, command: CreateManualStory) -> Result<Story, ApplicationError> {
        let length = LengthCategory::from_str(&command.length)?;
        let status = parse_status(command.status.as_deref())?;
        let owner_id = OwnerId::from(command.owner_id);
        ensure_may_publish(status, &owner_id)?;

        let title = command.title.trim().to_string();
        let content = command.content.trim().to_string();
        ensure_publishable(status, &title, &content)?;

        let draft = StoryDraft {
            id: StoryId::new(),
            genre: command.genre.trim().to_string(),
            theme: command.theme.trim().to_string(),
            length,
            language: resolve_language(command.language, &self.default_language),
            title,
            content,
            source: StorySource::Manual,
            status,
            owner_name: resolve_owner_name(command.owner_name, &owner_id),
            owner_id,
        };

        let story = enrich_and_insert(&self.enricher, self.story_repo.as_ref(), draft).await?;

        tracing::info!(
            story_id = %story.id(),
            owner = %story.owner_id(),
            status = %story.status(),
            "Manual story created"
        );

        Ok(story)
    }
}

// ============================================================================
// UpdateStory
// ============================================================================

/// UpdateStory Handler
pub struct UpdateStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl UpdateStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: UpdateStory) -> Result<Story, ApplicationError> {
        let story_id = parse_story_id(&command.story_id)?;
        let status = StoryStatus::from_str(&command.status)?;

        let story = self
            .story_repo
            .find_by_id(&story_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Story", story_id))?;
        ensure_may_publish(status, story.owner_id())?;

        let update = ContentUpdate {
            title: command.title.trim().to_string(),
            content: command.content.trim().to_string(),
            status,
        };
        ensure_publishable(update.status, &update.title, &update.content)?;

        let updated = self.story_repo.update_content(&story_id, &update).await?;

        tracing::info!(story_id = %story_id, status = %updated.status(), "Story updated");

        Ok(updated)
    }
}

// ============================================================================
// DeleteStory
// ============================================================================

/// DeleteStory Handler - 同时清理音频缓存
pub struct DeleteStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    audio_cache: Arc<dyn AudioCachePort>,
}

impl DeleteStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>, audio_cache: Arc<dyn AudioCachePort>) -> Self {
        Self {
            story_repo,
            audio_cache,
        }
    }

    pub async fn handle(&self, command: DeleteStory) -> Result<(), ApplicationError> {
        let story_id = parse_story_id(&command.story_id)?;

        self.story_repo.delete(&story_id).await?;

        if let Err(e) = self.audio_cache.remove(story_id).await {
            tracing::warn!(story_id = %story_id, error = %e, "Failed to evict cached audio");
        }

        tracing::info!(story_id = %story_id, "Story deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AudioCacheExt, ListOptions};
    use crate::application::test_support::{
        media_settings, CountingRepository, StubImages, StubSpeech, StubTextGenerator,
    };
    use crate::infrastructure::memory::InMemoryAudioCache;

    struct Fixture {
        repo: Arc<CountingRepository>,
        cache: Arc<InMemoryAudioCache>,
        text: Arc<StubTextGenerator>,
        speech: Arc<StubSpeech>,
        images: Arc<StubImages>,
    }

    impl Fixture {
        fn new(text: StubTextGenerator, speech: StubSpeech, images: StubImages) -> Self {
            Self {
                repo: Arc::new(CountingRepository::new()),
                cache: Arc::new(InMemoryAudioCache::new(1024 * 1024)),
                text: Arc::new(text),
                speech: Arc::new(speech),
                images: Arc::new(images),
            }
        }

        fn healthy() -> Self {
            Self::new(
                StubTextGenerator::ok("The Lost Kingdom\nLong ago a kingdom vanished beneath the sea."),
                StubSpeech::ok(vec![7; 16]),
                StubImages::ok("https://images.test/kingdom.jpg"),
            )
        }

        fn enricher(&self) -> Arc<StoryEnricher> {
            Arc::new(StoryEnricher::new(
                self.speech.clone(),
                self.images.clone(),
                self.cache.clone(),
                media_settings(),
            ))
        }

        fn ai_handler(&self, policy: TitlePolicy) -> CreateAiStoryHandler {
            CreateAiStoryHandler::new(
                self.text.clone(),
                self.enricher(),
                self.repo.clone(),
                StorySettings {
                    title_policy: policy,
                    title_limits: TitleLimits::default(),
                    default_language: "english".to_string(),
                    system_prompt: "You are a creative storyteller.".to_string(),
                },
            )
        }

        fn manual_handler(&self) -> CreateManualStoryHandler {
            CreateManualStoryHandler::new(self.enricher(), self.repo.clone(), "english")
        }
    }

    fn ai_command(owner: Option<&str>, status: Option<&str>) -> CreateAiStory {
        CreateAiStory {
            genre: "Fantasy".to_string(),
            theme: "A lost kingdom".to_string(),
            length: "short".to_string(),
            language: None,
            owner_id: owner.map(str::to_string),
            owner_name: None,
            status: status.map(str::to_string),
        }
    }

    fn manual_command(owner: &str, status: &str) -> CreateManualStory {
        CreateManualStory {
            genre: "Fantasy".to_string(),
            theme: "A lost kingdom".to_string(),
            length: "medium".to_string(),
            language: Some("english".to_string()),
            title: "The Lost Kingdom".to_string(),
            content: "Long ago a kingdom vanished beneath the sea.".to_string(),
            owner_id: Some(owner.to_string()),
            owner_name: Some("Guest".to_string()),
            status: Some(status.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_ai_story_success() {
        let fx = Fixture::healthy();
        let handler = fx.ai_handler(TitlePolicy::FirstLine);

        let story = handler.handle(ai_command(Some("u1"), Some("published"))).await.unwrap();

        assert_eq!(story.title(), "The Lost Kingdom");
        assert_eq!(story.source(), StorySource::Ai);
        assert_eq!(story.status(), StoryStatus::Published);
        assert_eq!(story.language(), "english");
        assert_eq!(story.owner_name(), "u1");
        assert_eq!(story.image_url(), "https://images.test/kingdom.jpg");
        assert_eq!(
            story.audio_url(),
            format!("http://localhost:8000/api/story/audio/{}", story.id())
        );
        assert!(story.bookmarks().is_empty());
        assert_eq!(fx.repo.insert_calls(), 1);

        // 音频已按 story id 写入缓存
        assert_eq!(fx.cache.get(*story.id()).await.unwrap(), Some(vec![7; 16]));
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let fx = Fixture::healthy();
        let handler = fx.ai_handler(TitlePolicy::FirstLine);

        let a = handler.handle(ai_command(Some("u1"), None)).await.unwrap();
        let b = handler.handle(ai_command(Some("u1"), None)).await.unwrap();

        assert_ne!(a.id(), b.id());
        assert!(!a.id().to_string().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_publish_is_forbidden_before_any_call() {
        let fx = Fixture::healthy();
        let handler = fx.ai_handler(TitlePolicy::FirstLine);

        let result = handler.handle(ai_command(None, Some("published"))).await;

        assert!(matches!(result, Err(ApplicationError::Forbidden(_))));
        assert_eq!(fx.repo.insert_calls(), 0);
        assert_eq!(fx.text.calls(), 0);
        assert_eq!(fx.speech.calls(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_persists_nothing() {
        let fx = Fixture::new(
            StubTextGenerator::failing(),
            StubSpeech::ok(vec![1]),
            StubImages::ok("https://images.test/x.jpg"),
        );
        let handler = fx.ai_handler(TitlePolicy::FirstLine);

        let result = handler.handle(ai_command(Some("u1"), None)).await;

        assert!(matches!(result, Err(ApplicationError::GenerationFailed(_))));
        assert_eq!(fx.repo.insert_calls(), 0);
        assert_eq!(fx.speech.calls(), 0);
    }

    #[tokio::test]
    async fn test_audio_failure_degrades_to_fallback_reference() {
        let fx = Fixture::new(
            StubTextGenerator::ok("A tale\nOnce upon a time."),
            StubSpeech::failing(),
            StubImages::failing(),
        );
        let handler = fx.ai_handler(TitlePolicy::FirstLine);

        let story = handler.handle(ai_command(Some("u1"), None)).await.unwrap();

        assert_eq!(story.audio_url(), "http://localhost:8000/api/story/audio/unavailable");
        assert_eq!(story.image_url(), "https://source.unsplash.com/800x600/?A+tale+A+lost+kingdom+Fantasy");
        assert_eq!(fx.repo.insert_calls(), 1);
        assert_eq!(fx.cache.stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_ai_title_policy() {
        let fx = Fixture::new(
            StubTextGenerator::ok("Once upon a time.").with_title("Title: \"The Sunken Crown\""),
            StubSpeech::ok(vec![1]),
            StubImages::ok("https://images.test/x.jpg"),
        );

        let story = fx
            .ai_handler(TitlePolicy::Ai)
            .handle(ai_command(Some("u1"), None))
            .await
            .unwrap();

        assert_eq!(story.title(), "The Sunken Crown");
        assert_eq!(fx.text.calls(), 2);
    }

    #[tokio::test]
    async fn test_strict_ai_title_failure_is_fatal() {
        let fx = Fixture::new(
            StubTextGenerator::ok("Once upon a time.").with_failing_title(),
            StubSpeech::ok(vec![1]),
            StubImages::ok("https://images.test/x.jpg"),
        );

        let result = fx.ai_handler(TitlePolicy::Ai).handle(ai_command(Some("u1"), None)).await;

        assert!(matches!(result, Err(ApplicationError::GenerationFailed(_))));
        assert_eq!(fx.repo.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_ai_title_falls_back_to_first_line() {
        let fx = Fixture::new(
            StubTextGenerator::ok("Once upon a time there was a very small dragon.").with_failing_title(),
            StubSpeech::ok(vec![1]),
            StubImages::ok("https://images.test/x.jpg"),
        );

        let story = fx
            .ai_handler(TitlePolicy::AiOrFirstLine)
            .handle(ai_command(Some("u1"), None))
            .await
            .unwrap();

        assert_eq!(story.title(), "Once upon a time there was a very");
    }

    #[tokio::test]
    async fn test_invalid_length_is_validation_error() {
        let fx = Fixture::healthy();
        let mut command = ai_command(Some("u1"), None);
        command.length = "epic".to_string();

        let result = fx.ai_handler(TitlePolicy::FirstLine).handle(command).await;

        assert!(matches!(result, Err(ApplicationError::Validation(_))));
        assert_eq!(fx.text.calls(), 0);
    }

    #[tokio::test]
    async fn test_manual_draft_by_guest_round_trip() {
        let fx = Fixture::healthy();

        let story = fx
            .manual_handler()
            .handle(manual_command("guest", "draft"))
            .await
            .unwrap();

        let loaded = fx.repo.find_by_id(story.id()).await.unwrap().unwrap();
        assert_eq!(loaded.genre(), "Fantasy");
        assert_eq!(loaded.theme(), "A lost kingdom");
        assert_eq!(loaded.status(), StoryStatus::Draft);
        assert_eq!(loaded.source(), StorySource::Manual);
        assert!(loaded.owner_id().is_anonymous());
        assert!(loaded.bookmarks().is_empty());
        assert_eq!(fx.text.calls(), 0);
    }

    #[tokio::test]
    async fn test_manual_publish_requires_content() {
        let fx = Fixture::healthy();
        let mut command = manual_command("u1", "published");
        command.content = "   ".to_string();

        let result = fx.manual_handler().handle(command).await;

        assert!(matches!(result, Err(ApplicationError::Validation(_))));
        assert_eq!(fx.speech.calls(), 0);
        assert_eq!(fx.repo.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_manual_anonymous_publish_forbidden() {
        let fx = Fixture::healthy();

        let result = fx.manual_handler().handle(manual_command("", "published")).await;

        assert!(matches!(result, Err(ApplicationError::Forbidden(_))));
        assert_eq!(fx.repo.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_insert_failure_discards_cached_audio() {
        let fx = Fixture::healthy();
        fx.repo.fail_inserts();

        let result = fx.manual_handler().handle(manual_command("u1", "draft")).await;

        assert!(matches!(result, Err(ApplicationError::StorageUnavailable(_))));
        assert_eq!(fx.cache.stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_update_story_keeps_immutable_fields() {
        let fx = Fixture::healthy();
        let story = fx.manual_handler().handle(manual_command("u1", "draft")).await.unwrap();

        let updated = UpdateStoryHandler::new(fx.repo.clone())
            .handle(UpdateStory {
                story_id: story.id().to_string(),
                title: "New Title".to_string(),
                content: "New content.".to_string(),
                status: "published".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(updated.title(), "New Title");
        assert_eq!(updated.content(), "New content.");
        assert_eq!(updated.status(), StoryStatus::Published);
        assert_eq!(updated.genre(), story.genre());
        assert_eq!(updated.theme(), story.theme());
        assert_eq!(updated.source(), story.source());
        assert_eq!(updated.created_at(), story.created_at());
    }

    #[tokio::test]
    async fn test_update_publish_by_guest_forbidden() {
        let fx = Fixture::healthy();
        let story = fx.manual_handler().handle(manual_command("guest", "draft")).await.unwrap();

        let result = UpdateStoryHandler::new(fx.repo.clone())
            .handle(UpdateStory {
                story_id: story.id().to_string(),
                title: "T".to_string(),
                content: "C".to_string(),
                status: "published".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_missing_story_not_found() {
        let fx = Fixture::healthy();

        let result = UpdateStoryHandler::new(fx.repo.clone())
            .handle(UpdateStory {
                story_id: StoryId::new().to_string(),
                title: "T".to_string(),
                content: "C".to_string(),
                status: "draft".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_story_evicts_audio() {
        let fx = Fixture::healthy();
        let story = fx.manual_handler().handle(manual_command("u1", "draft")).await.unwrap();
        assert_eq!(fx.cache.stats().await.total_entries, 1);

        DeleteStoryHandler::new(fx.repo.clone(), fx.cache.clone())
            .handle(DeleteStory {
                story_id: story.id().to_string(),
            })
            .await
            .unwrap();

        assert_eq!(fx.cache.stats().await.total_entries, 0);
        assert!(fx.repo.list_all(ListOptions::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_story_not_found() {
        let fx = Fixture::healthy();
        let handler = DeleteStoryHandler::new(fx.repo.clone(), fx.cache.clone());

        let missing = handler
            .handle(DeleteStory {
                story_id: StoryId::new().to_string(),
            })
            .await;
        let malformed = handler
            .handle(DeleteStory {
                story_id: "not-an-id".to_string(),
            })
            .await;

        assert!(matches!(missing, Err(ApplicationError::NotFound { .. })));
        assert!(matches!(malformed, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_read_through_after_creation() {
        let fx = Fixture::healthy();
        let story = fx.manual_handler().handle(manual_command("u1", "draft")).await.unwrap();

        let audio: Result<Vec<u8>, ApplicationError> = fx
            .cache
            .get_or_compute(*story.id(), || async { Ok(vec![0]) })
            .await;

        assert_eq!(audio.unwrap(), vec![7; 16]);
    }
}
