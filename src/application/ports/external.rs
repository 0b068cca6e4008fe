//! 外部服务统一错误
//!
//! 网络错误、超时、非 2xx、响应格式错误、缺少字段都归一为同一个错误，
//! 调用方只区分成功 / 失败，具体原因只用于日志。

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{service} failed: {message}")]
pub struct ExternalServiceError {
    pub service: &'static str,
    pub message: String,
}

impl ExternalServiceError {
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }

    /// 从 reqwest 错误构造，区分超时和连接失败以便日志排查
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(service, "request timeout")
        } else if err.is_connect() {
            Self::new(service, format!("cannot connect: {}", err))
        } else {
            Self::new(service, err.to_string())
        }
    }
}
