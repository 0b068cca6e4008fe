//! Speech Synthesis Port - TTS 引擎抽象
//!
//! 定义语音合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;

use super::ExternalServiceError;

/// 语音合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本
    pub text: String,
    /// TTS locale（如 "en"、"hi"）
    pub locale: String,
}

/// Speech Synthesis Port
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// 合成音频，返回原始音频字节
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, ExternalServiceError>;
}
