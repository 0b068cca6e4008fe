//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    AddBookmarkHandler, CreateAiStoryHandler, CreateManualStoryHandler, DeleteStoryHandler,
    RemoveBookmarkHandler, UpdateStoryHandler,
    // Query handlers
    CountStoriesByOwnerHandler, GetStoryAudioHandler, GetStoryHandler,
    ListBookmarkedStoriesHandler, ListStoriesByOwnerHandler, ListStoriesHandler,
    SearchStoriesHandler,
    // Ports & settings
    AudioCachePort, ImageSearchPort, MediaSettings, SpeechSynthesisPort, StoryEnricher,
    StoryRepositoryPort, StorySettings, TextGenerationPort,
};

/// 构建应用状态所需的端口与配置
pub struct AppDependencies {
    pub text_generator: Arc<dyn TextGenerationPort>,
    pub speech: Arc<dyn SpeechSynthesisPort>,
    pub images: Arc<dyn ImageSearchPort>,
    pub audio_cache: Arc<dyn AudioCachePort>,
    pub story_repo: Arc<dyn StoryRepositoryPort>,
    pub story_settings: StorySettings,
    pub media_settings: MediaSettings,
    /// "audio unavailable" 兜底音频
    pub fallback_audio: Vec<u8>,
}

/// 应用状态
pub struct AppState {
    // ========== Command Handlers ==========
    pub create_ai_story_handler: CreateAiStoryHandler,
    pub create_manual_story_handler: CreateManualStoryHandler,
    pub update_story_handler: UpdateStoryHandler,
    pub delete_story_handler: DeleteStoryHandler,
    pub add_bookmark_handler: AddBookmarkHandler,
    pub remove_bookmark_handler: RemoveBookmarkHandler,

    // ========== Query Handlers ==========
    pub get_story_handler: GetStoryHandler,
    pub list_stories_handler: ListStoriesHandler,
    pub list_stories_by_owner_handler: ListStoriesByOwnerHandler,
    pub search_stories_handler: SearchStoriesHandler,
    pub count_stories_handler: CountStoriesByOwnerHandler,
    pub list_bookmarked_handler: ListBookmarkedStoriesHandler,
    pub get_story_audio_handler: GetStoryAudioHandler,
}

impl AppState {
    pub fn new(deps: AppDependencies) -> Self {
        let AppDependencies {
            text_generator,
            speech,
            images,
            audio_cache,
            story_repo,
            story_settings,
            media_settings,
            fallback_audio,
        } = deps;

        let default_language = story_settings.default_language.clone();
        let enricher = Arc::new(StoryEnricher::new(
            speech,
            images,
            audio_cache.clone(),
            media_settings,
        ));

        Self {
            // Command handlers
            create_ai_story_handler: CreateAiStoryHandler::new(
                text_generator,
                enricher.clone(),
                story_repo.clone(),
                story_settings,
            ),
            create_manual_story_handler: CreateManualStoryHandler::new(
                enricher.clone(),
                story_repo.clone(),
                default_language,
            ),
            update_story_handler: UpdateStoryHandler::new(story_repo.clone()),
            delete_story_handler: DeleteStoryHandler::new(story_repo.clone(), audio_cache.clone()),
            add_bookmark_handler: AddBookmarkHandler::new(story_repo.clone()),
            remove_bookmark_handler: RemoveBookmarkHandler::new(story_repo.clone()),

            // Query handlers
            get_story_handler: GetStoryHandler::new(story_repo.clone()),
            list_stories_handler: ListStoriesHandler::new(story_repo.clone()),
            list_stories_by_owner_handler: ListStoriesByOwnerHandler::new(story_repo.clone()),
            search_stories_handler: SearchStoriesHandler::new(story_repo.clone()),
            count_stories_handler: CountStoriesByOwnerHandler::new(story_repo.clone()),
            list_bookmarked_handler: ListBookmarkedStoriesHandler::new(story_repo.clone()),
            get_story_audio_handler: GetStoryAudioHandler::new(
                audio_cache,
                story_repo,
                enricher,
                fallback_audio,
            ),
        }
    }
}
