//! Command Handlers

mod bookmark_handlers;
mod story_handlers;

pub use bookmark_handlers::{AddBookmarkHandler, RemoveBookmarkHandler};
pub use story_handlers::{
    CreateAiStoryHandler, CreateManualStoryHandler, DeleteStoryHandler, StorySettings,
    UpdateStoryHandler,
};
