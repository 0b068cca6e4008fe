//! Memory Layer - 内存实现
//!
//! 有界 LRU 音频缓存和内存故事仓储（测试与 `database.backend = memory`）

mod audio_cache;
mod story_repo;

pub use audio_cache::InMemoryAudioCache;
pub use story_repo::InMemoryStoryRepository;
