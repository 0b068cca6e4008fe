//! Infrastructure Adapters
//!
//! 六边形架构的出站适配器实现：LLM、TTS、配图

pub mod image;
pub mod llm;
pub mod tts;

pub use image::*;
pub use llm::*;
pub use tts::*;
