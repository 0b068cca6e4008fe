//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml / config.local.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, DatabaseBackend};
use crate::domain::story::KEYWORDS_PLACEHOLDER;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "STORYFORGE";

/// 加载应用配置
///
/// # 环境变量示例
/// - `STORYFORGE_SERVER__PORT=8080`
/// - `STORYFORGE_LLM__API_KEY=sk-or-...`
/// - `STORYFORGE_STORY__TITLE_POLICY=ai_or_first_line`
/// - `STORYFORGE_CACHE__BACKEND=sled`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时搜索工作目录下的默认配置文件（均可缺省）
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("llm.timeout_secs", 15)?
        .set_default("tts.timeout_secs", 15)?
        .set_default("tts.default_locale", "en")?
        .set_default("image.timeout_secs", 10)?
        .set_default("story.title_policy", "first_line")?
        .set_default("story.default_language", "english")?
        .set_default("story.parallel_enrichment", false)?
        .set_default("cache.backend", "memory")?
        .set_default("cache.max_size_bytes", 256_u64 * 1024 * 1024)?
        .set_default("database.backend", "sqlite")?
        .set_default("database.path", "data/storyforge.db")?
        .set_default("database.max_connections", 5)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 层级分隔符: __ (双下划线)，变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("Server port cannot be 0"));
    }

    if config.llm.url.trim().is_empty() {
        return Err(invalid("LLM url cannot be empty"));
    }

    if config.database.backend == DatabaseBackend::Sqlite && config.database.path.trim().is_empty() {
        return Err(invalid("Database path cannot be empty when backend is sqlite"));
    }

    if config.cache.max_size_bytes == 0 {
        return Err(invalid("Cache max_size_bytes cannot be 0"));
    }

    if config.story.title_max_words == 0 {
        return Err(invalid("Story title_max_words cannot be 0"));
    }

    if !config.image.fallback_template.contains(KEYWORDS_PLACEHOLDER) {
        return Err(ConfigError::ValidationError(format!(
            "Image fallback_template must contain {}",
            KEYWORDS_PLACEHOLDER
        )));
    }

    Ok(())
}

/// 打印配置信息（启动日志，不输出密钥）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("LLM: {} (model {})", config.llm.url, config.llm.model);
    tracing::info!("LLM API Key: {}", if config.llm.api_key.is_some() { "set" } else { "missing" });
    tracing::info!("TTS: {:?} {}", config.tts.provider, config.tts.url);
    tracing::info!("Image Search Key: {}", if config.image.access_key.is_some() { "set" } else { "missing" });
    tracing::info!("Title Policy: {:?}", config.story.title_policy);
    tracing::info!("Parallel Enrichment: {}", config.story.parallel_enrichment);
    tracing::info!("Cache: {:?} ({} bytes)", config.cache.backend, config.cache.max_size_bytes);
    tracing::info!("Database: {:?} {}", config.database.backend, config.database.path);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
