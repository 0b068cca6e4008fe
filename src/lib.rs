//! StoryForge - AI 故事生成与有声播放服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Story Context: 故事聚合、标题推导、提示词、兜底媒体引用
//! - language / audio: locale 映射、音频格式识别
//!
//! 应用层 (application/):
//! - Ports: TextGeneration, SpeechSynthesis, ImageSearch, AudioCache, StoryRepository
//! - Commands: 创建编排（AI / 手动）、修改、删除、书签
//! - Queries: 故事查询、音频播放
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: OpenRouter、HTTP TTS、Unsplash
//! - Persistence: SQLite 故事仓储 + Sled 音频缓存
//! - Memory: 内存仓储和内存 LRU 缓存
//! - HTTP: JSON API

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
