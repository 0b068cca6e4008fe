//! Audio Queries - 音频查询

/// 获取故事音频
#[derive(Debug, Clone)]
pub struct GetStoryAudio {
    pub story_id: String,
}

/// 音频来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSource {
    /// 缓存命中
    Cached,
    /// 未命中，重新合成
    Synthesized,
    /// 合成失败，返回兜底音频
    Fallback,
}

impl AudioSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioSource::Cached => "cached",
            AudioSource::Synthesized => "synthesized",
            AudioSource::Fallback => "fallback",
        }
    }
}

/// 获取音频响应
#[derive(Debug, Clone)]
pub struct GetStoryAudioResponse {
    pub audio_data: Vec<u8>,
    pub content_type: String,
    pub source: AudioSource,
}
