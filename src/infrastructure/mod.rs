//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod http;
pub mod memory;
pub mod persistence;

pub use adapters::{FakeTtsClient, HttpTtsClient, OpenRouterClient, UnsplashClient};
pub use memory::{InMemoryAudioCache, InMemoryStoryRepository};
pub use persistence::{SledAudioCache, SqliteStoryRepository};
