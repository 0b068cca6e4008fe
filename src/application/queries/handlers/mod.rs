//! Query Handlers 实现

mod audio_handlers;
mod story_handlers;

pub use audio_handlers::*;
pub use story_handlers::*;
