//! Fake TTS Client - 离线开发与测试用
//!
//! 不调用任何外部服务，始终返回固定的音频数据

use async_trait::async_trait;
use std::path::Path;

use crate::application::ports::{ExternalServiceError, SpeechSynthesisPort, SynthesisRequest};
use crate::domain::silent_wav;

/// Fake TTS Client
pub struct FakeTtsClient {
    audio_data: Vec<u8>,
}

impl FakeTtsClient {
    pub fn new(audio_data: Vec<u8>) -> Self {
        Self { audio_data }
    }

    /// 一秒静音 WAV
    pub fn silent() -> Self {
        Self::new(silent_wav(1000, 16_000))
    }

    /// 从文件加载固定音频
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let audio_data = std::fs::read(path.as_ref())?;
        tracing::info!(
            path = %path.as_ref().display(),
            size = audio_data.len(),
            "FakeTtsClient initialized"
        );
        Ok(Self::new(audio_data))
    }
}

#[async_trait]
impl SpeechSynthesisPort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, ExternalServiceError> {
        tracing::debug!(
            text_len = request.text.len(),
            locale = %request.locale,
            "FakeTtsClient: returning fixed audio"
        );

        Ok(self.audio_data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AudioFormat;

    #[tokio::test]
    async fn test_silent_is_wav() {
        let client = FakeTtsClient::silent();
        let audio = client
            .synthesize(SynthesisRequest {
                text: "hi".to_string(),
                locale: "en".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(AudioFormat::sniff(&audio), AudioFormat::Wav);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notice.mp3");
        std::fs::write(&path, b"ID3data").unwrap();

        let client = FakeTtsClient::from_file(&path).unwrap();
        assert_eq!(client.audio_data, b"ID3data".to_vec());
        assert!(FakeTtsClient::from_file(dir.path().join("missing.wav")).is_err());
    }
}
