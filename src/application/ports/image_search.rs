//! Image Search Port - 配图搜索抽象

use async_trait::async_trait;

use super::ExternalServiceError;

/// Image Search Port
///
/// 按自由文本查询返回一张图片的 URL。
/// 未配置凭证或搜索失败时返回错误，由调用方换成兜底地址。
#[async_trait]
pub trait ImageSearchPort: Send + Sync {
    async fn search(&self, query: &str) -> Result<String, ExternalServiceError>;
}
