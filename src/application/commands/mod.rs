//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：创建、修改、删除故事以及书签增删

mod bookmark_commands;
mod story_commands;

pub mod handlers;

pub use bookmark_commands::*;
pub use story_commands::*;
