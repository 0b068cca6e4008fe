//! Persistence Layer - 数据持久化
//!
//! SQLite 故事仓储和 Sled 音频缓存

pub mod sled;
pub mod sqlite;

pub use self::sled::{SledAudioCache, SledCacheConfig};
pub use self::sqlite::SqliteStoryRepository;
