//! Domain Layer - 领域层
//!
//! - Story Context: 故事聚合、标题推导、提示词与兜底媒体引用
//! - language: 语言名称到 TTS locale 的映射
//! - audio: 音频格式识别与静音兜底音频

pub mod audio;
pub mod language;
pub mod story;

pub use audio::{silent_wav, AudioFormat};
pub use language::locale_for;
