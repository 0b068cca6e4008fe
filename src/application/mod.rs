//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（文本生成、语音合成、配图、音频缓存、仓储）
//! - commands: CQRS 命令及处理器（创建编排、修改、删除、书签）
//! - queries: CQRS 查询及处理器
//! - enrichment: 尽力而为的音频 / 配图步骤
//! - error: 应用层错误定义

pub mod commands;
pub mod enrichment;
pub mod error;
pub mod ports;
pub mod queries;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use commands::{
    // Story commands
    CreateAiStory,
    CreateManualStory,
    DeleteStory,
    UpdateStory,
    // Bookmark commands
    AddBookmark,
    RemoveBookmark,
    // Handlers
    handlers::{
        AddBookmarkHandler, CreateAiStoryHandler, CreateManualStoryHandler, DeleteStoryHandler,
        RemoveBookmarkHandler, StorySettings, UpdateStoryHandler,
    },
};

pub use enrichment::{Enrichment, MediaSettings, StoryEnricher};
pub use error::ApplicationError;

pub use ports::{
    // Audio cache
    AudioCacheExt,
    AudioCachePort,
    CacheError,
    CacheStats,
    // External services
    ExternalServiceError,
    ImageSearchPort,
    SpeechSynthesisPort,
    SynthesisRequest,
    TextGenerationPort,
    // Repositories
    BookmarkAdded,
    BookmarkRemoved,
    ListOptions,
    RepositoryError,
    StoryRepositoryPort,
};

pub use queries::{
    // Story queries
    CountStoriesByOwner,
    GetStory,
    ListBookmarkedStories,
    ListStories,
    ListStoriesByOwner,
    SearchStories,
    // Audio queries
    AudioSource,
    GetStoryAudio,
    GetStoryAudioResponse,
    // Handlers
    handlers::{
        CountStoriesByOwnerHandler, GetStoryAudioHandler, GetStoryHandler,
        ListBookmarkedStoriesHandler, ListStoriesByOwnerHandler, ListStoriesHandler,
        SearchStoriesHandler,
    },
};
