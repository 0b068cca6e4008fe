//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：故事读取、列表、搜索、统计以及音频播放

mod audio_queries;
mod story_queries;

pub mod handlers;

pub use audio_queries::*;
pub use story_queries::*;
