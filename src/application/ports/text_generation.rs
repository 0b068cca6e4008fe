//! Text Generation Port - LLM 文本生成抽象

use async_trait::async_trait;

use super::ExternalServiceError;
use crate::domain::story::StoryPrompt;

/// Text Generation Port
///
/// 输入 system + user 提示词，返回生成的文本（已去除首尾空白）
#[async_trait]
pub trait TextGenerationPort: Send + Sync {
    async fn generate(&self, prompt: &StoryPrompt) -> Result<String, ExternalServiceError>;
}
