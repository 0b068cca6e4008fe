//! Unsplash Client - 配图搜索
//!
//! GET {search_url}?query=..&per_page=1&orientation=landscape
//! Header: Authorization: Client-ID {access_key}
//! Response: results[0].urls.regular

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{ExternalServiceError, ImageSearchPort};

const SERVICE: &str = "image";

#[derive(Debug, Clone)]
pub struct UnsplashConfig {
    pub search_url: String,
    /// 未配置时直接失败，由调用方使用兜底模板
    pub access_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            search_url: "https://api.unsplash.com/search/photos".to_string(),
            access_key: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: Option<PhotoUrls>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
}

fn first_photo_url(response: SearchResponse) -> Result<String, ExternalServiceError> {
    response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| ExternalServiceError::new(SERVICE, "no search results"))?
        .urls
        .and_then(|urls| urls.regular)
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ExternalServiceError::new(SERVICE, "result has no regular url"))
}

pub struct UnsplashClient {
    client: Client,
    config: UnsplashConfig,
}

impl UnsplashClient {
    pub fn new(config: UnsplashConfig) -> Result<Self, ExternalServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExternalServiceError::from_reqwest(SERVICE, e))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ImageSearchPort for UnsplashClient {
    async fn search(&self, query: &str) -> Result<String, ExternalServiceError> {
        let access_key = self
            .config
            .access_key
            .as_deref()
            .ok_or_else(|| ExternalServiceError::new(SERVICE, "access key is not configured"))?;

        let response = self
            .client
            .get(&self.config.search_url)
            .header("Authorization", format!("Client-ID {}", access_key))
            .query(&[
                ("query", query),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .send()
            .await
            .map_err(|e| ExternalServiceError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExternalServiceError::new(SERVICE, format!("HTTP {}", status)));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ExternalServiceError::new(SERVICE, format!("malformed response: {}", e)))?;

        let url = first_photo_url(body)?;
        tracing::debug!(query = %query, url = %url, "Image found");
        Ok(url)
    }
}
