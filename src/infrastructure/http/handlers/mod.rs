//! HTTP Handlers

mod audio;
mod bookmark;
mod ping;
mod story;

pub use audio::*;
pub use bookmark::*;
pub use ping::*;
pub use story::*;
