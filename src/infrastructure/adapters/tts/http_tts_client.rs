//! HTTP TTS Client - 调用外部 TTS HTTP 服务
//!
//! 外部 TTS API:
//! POST {url}
//! Request: {"text": "...", "lang": "en"}  (JSON)
//! Response: 音频二进制（mp3 / wav / ogg）

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{ExternalServiceError, SpeechSynthesisPort, SynthesisRequest};

const SERVICE: &str = "tts";

/// TTS 请求体 (JSON)
#[derive(Debug, Serialize)]
struct TtsHttpRequest<'a> {
    text: &'a str,
    lang: &'a str,
}

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// 合成接口地址
    pub url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5002/api/tts".to_string(),
            timeout_secs: 15,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, ExternalServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExternalServiceError::from_reqwest(SERVICE, e))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl SpeechSynthesisPort for HttpTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, ExternalServiceError> {
        tracing::debug!(
            url = %self.config.url,
            text_len = request.text.len(),
            locale = %request.locale,
            "Sending TTS request"
        );

        let response = self
            .client
            .post(&self.config.url)
            .json(&TtsHttpRequest {
                text: &request.text,
                lang: &request.locale,
            })
            .send()
            .await
            .map_err(|e| ExternalServiceError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExternalServiceError::new(
                SERVICE,
                format!("HTTP {}: {}", status, error_text),
            ));
        }

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| ExternalServiceError::new(SERVICE, format!("failed to read audio: {}", e)))?
            .to_vec();

        if audio_data.is_empty() {
            return Err(ExternalServiceError::new(SERVICE, "empty audio payload"));
        }

        tracing::info!(
            locale = %request.locale,
            audio_size = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}
