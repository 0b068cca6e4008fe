//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::story::{TitleLimits, TitlePolicy, DEFAULT_FALLBACK_IMAGE_TEMPLATE};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// LLM 文本生成
    #[serde(default)]
    pub llm: LlmConfig,

    /// 语音合成
    #[serde(default)]
    pub tts: TtsConfig,

    /// 配图搜索
    #[serde(default)]
    pub image: ImageConfig,

    /// 故事生成策略
    #[serde(default)]
    pub story: StoryConfig,

    #[serde(default)]
    pub audio: AudioConfig,

    /// 音频缓存
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub log: LogConfig,
}

// ============================================================================
// Server
// ============================================================================

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 对外的 Base URL，用于拼接音频播放地址
    /// 未设置时使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 监听地址 host:port
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL（不带结尾斜杠）
    pub fn public_base_url(&self) -> String {
        match self.base_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let host = if self.host == "0.0.0.0" {
                    "localhost"
                } else {
                    &self.host
                };
                format!("http://{}:{}", host, self.port)
            }
        }
    }
}

// ============================================================================
// External services
// ============================================================================

/// LLM 配置（OpenAI 兼容接口）
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// 未配置时启动成功，但 AI 创建全部失败
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_llm_referer")]
    pub referer: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_llm_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_llm_model() -> String {
    "openai/gpt-3.5-turbo".to_string()
}

fn default_llm_timeout() -> u64 {
    15
}

fn default_llm_referer() -> String {
    "http://localhost".to_string()
}

fn default_system_prompt() -> String {
    crate::domain::story::STORYTELLER_SYSTEM_PROMPT.to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: default_llm_url(),
            api_key: None,
            model: default_llm_model(),
            timeout_secs: default_llm_timeout(),
            referer: default_llm_referer(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// TTS 实现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TtsProvider {
    /// 外部 HTTP TTS 服务
    #[default]
    Http,
    /// 固定音频，离线开发用
    Fake,
}

/// TTS 配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default)]
    pub provider: TtsProvider,

    /// 合成接口地址
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 未知语言名时使用的 locale
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

fn default_tts_url() -> String {
    "http://localhost:5002/api/tts".to_string()
}

fn default_tts_timeout() -> u64 {
    15
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: TtsProvider::default(),
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            default_locale: default_locale(),
        }
    }
}

/// 配图配置
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_image_search_url")]
    pub search_url: String,

    #[serde(default)]
    pub access_key: Option<String>,

    #[serde(default = "default_image_timeout")]
    pub timeout_secs: u64,

    /// 搜索失败时的兜底地址模板，必须包含 `{keywords}`
    #[serde(default = "default_fallback_template")]
    pub fallback_template: String,
}

fn default_image_search_url() -> String {
    "https://api.unsplash.com/search/photos".to_string()
}

fn default_image_timeout() -> u64 {
    10
}

fn default_fallback_template() -> String {
    DEFAULT_FALLBACK_IMAGE_TEMPLATE.to_string()
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            search_url: default_image_search_url(),
            access_key: None,
            timeout_secs: default_image_timeout(),
            fallback_template: default_fallback_template(),
        }
    }
}

// ============================================================================
// Story / Audio
// ============================================================================

/// 故事生成配置
#[derive(Debug, Clone, Deserialize)]
pub struct StoryConfig {
    #[serde(default)]
    pub title_policy: TitlePolicy,

    #[serde(default = "default_title_max_words")]
    pub title_max_words: usize,

    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,

    #[serde(default = "default_language")]
    pub default_language: String,

    /// 音频和配图并发执行
    #[serde(default)]
    pub parallel_enrichment: bool,
}

fn default_title_max_words() -> usize {
    TitleLimits::default().max_words
}

fn default_title_max_chars() -> usize {
    TitleLimits::default().max_chars
}

fn default_language() -> String {
    "english".to_string()
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            title_policy: TitlePolicy::default(),
            title_max_words: default_title_max_words(),
            title_max_chars: default_title_max_chars(),
            default_language: default_language(),
            parallel_enrichment: false,
        }
    }
}

impl StoryConfig {
    pub fn title_limits(&self) -> TitleLimits {
        TitleLimits {
            max_words: self.title_max_words,
            max_chars: self.title_max_chars,
        }
    }
}

/// 音频配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AudioConfig {
    /// "audio unavailable" 提示音频文件；不可读时使用一秒静音 WAV
    #[serde(default)]
    pub fallback_file: Option<PathBuf>,
}

// ============================================================================
// Storage
// ============================================================================

/// 音频缓存实现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    #[default]
    Memory,
    Sled,
}

/// 音频缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// 缓存总大小上限（字节）
    #[serde(default = "default_cache_max_size")]
    pub max_size_bytes: u64,

    /// sled 数据目录；未设置时使用临时库
    #[serde(default)]
    pub sled_path: Option<String>,
}

fn default_cache_max_size() -> u64 {
    256 * 1024 * 1024 // 256MB
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            max_size_bytes: default_cache_max_size(),
            sled_path: None,
        }
    }
}

/// 故事仓储实现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseBackend {
    #[default]
    Sqlite,
    Memory,
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: DatabaseBackend,

    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/storyforge.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

// ============================================================================
// Log
// ============================================================================

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
