//! OpenRouter Client - OpenAI 兼容的 chat completions 接口
//!
//! POST {url}
//! Headers: Authorization: Bearer {api_key}, HTTP-Referer: {referer}
//! Request: {"model": "...", "messages": [{"role": "system", ...}, {"role": "user", ...}]}
//! Response: choices[0].message.content

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{ExternalServiceError, TextGenerationPort};
use crate::domain::story::StoryPrompt;

const SERVICE: &str = "llm";

/// OpenRouter 客户端配置
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub url: String,
    /// 未配置时每次调用都失败
    pub api_key: Option<String>,
    pub model: String,
    pub referer: String,
    pub timeout_secs: u64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            api_key: None,
            model: "openai/gpt-3.5-turbo".to_string(),
            referer: "http://localhost".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// 取第一个 choice 的文本，缺字段或为空都视为失败
fn extract_content(response: ChatResponse) -> Result<String, ExternalServiceError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ExternalServiceError::new(SERVICE, "response has no choices"))?
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| ExternalServiceError::new(SERVICE, "response has no message content"))?;

    let content = content.trim();
    if content.is_empty() {
        return Err(ExternalServiceError::new(SERVICE, "response content is empty"));
    }
    Ok(content.to_string())
}

/// OpenRouter 文本生成客户端
pub struct OpenRouterClient {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Result<Self, ExternalServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExternalServiceError::from_reqwest(SERVICE, e))?;

        if config.api_key.is_none() {
            tracing::warn!("LLM api_key is not configured, AI story generation will fail");
        }

        Ok(Self { client, config })
    }
}

#[async_trait]
impl TextGenerationPort for OpenRouterClient {
    async fn generate(&self, prompt: &StoryPrompt) -> Result<String, ExternalServiceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ExternalServiceError::new(SERVICE, "api key is not configured"))?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        tracing::debug!(model = %self.config.model, prompt_len = prompt.user.len(), "Sending chat completion request");

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.referer)
            .json(&request)
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

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExternalServiceError::new(SERVICE, format!("malformed response: {}", e)))?;

        let content = extract_content(body)?;
        tracing::debug!(content_len = content.len(), "Chat completion successful");
        Ok(content)
    }
}
