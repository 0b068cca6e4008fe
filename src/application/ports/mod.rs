//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_cache;
mod external;
mod image_search;
mod repositories;
mod speech_synthesis;
mod text_generation;

pub use audio_cache::{AudioCacheExt, AudioCachePort, CacheError, CacheStats};
pub use external::ExternalServiceError;
pub use image_search::ImageSearchPort;
pub use repositories::{
    BookmarkAdded, BookmarkRemoved, ListOptions, RepositoryError, StoryRepositoryPort,
};
pub use speech_synthesis::{SpeechSynthesisPort, SynthesisRequest};
pub use text_generation::TextGenerationPort;
