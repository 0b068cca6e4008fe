//! StoryForge - AI 故事生成与有声播放服务
//!
//! 启动流程：加载配置 -> 初始化日志 -> 按配置选择仓储 / 缓存 / TTS 实现 -> 启动 HTTP 服务

use std::path::Path;
use std::sync::Arc;

use storyforge::application::{
    AudioCachePort, MediaSettings, SpeechSynthesisPort, StoryRepositoryPort, StorySettings,
};
use storyforge::config::{
    load_config, print_config, AppConfig, CacheBackend, DatabaseBackend, LogConfig, TtsProvider,
};
use storyforge::domain::silent_wav;
use storyforge::infrastructure::adapters::{
    FakeTtsClient, HttpTtsClient, HttpTtsClientConfig, OpenRouterClient, OpenRouterConfig,
    UnsplashClient, UnsplashConfig,
};
use storyforge::infrastructure::http::{build_router, serve, AppDependencies, AppState};
use storyforge::infrastructure::memory::{InMemoryAudioCache, InMemoryStoryRepository};
use storyforge::infrastructure::persistence::sled::{SledAudioCache, SledCacheConfig};
use storyforge::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteStoryRepository,
};

/// 兜底音频时长（毫秒）
const FALLBACK_SILENCE_MS: u32 = 1000;
const FALLBACK_SAMPLE_RATE: u32 = 16_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("StoryForge v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    let story_repo = build_story_repository(&config).await?;
    let audio_cache = build_audio_cache(&config)?;
    let fallback_audio = load_fallback_audio(config.audio.fallback_file.as_deref());

    let text_generator = Arc::new(OpenRouterClient::new(OpenRouterConfig {
        url: config.llm.url.clone(),
        api_key: config.llm.api_key.clone(),
        model: config.llm.model.clone(),
        referer: config.llm.referer.clone(),
        timeout_secs: config.llm.timeout_secs,
    })?);

    let speech: Arc<dyn SpeechSynthesisPort> = match config.tts.provider {
        TtsProvider::Http => Arc::new(HttpTtsClient::new(
            HttpTtsClientConfig::new(&config.tts.url).with_timeout(config.tts.timeout_secs),
        )?),
        TtsProvider::Fake => {
            tracing::warn!("Using fake TTS client, every story gets the same audio");
            Arc::new(FakeTtsClient::new(fallback_audio.clone()))
        }
    };

    if config.image.access_key.is_none() {
        tracing::warn!("Image access_key is not configured, stories will use fallback images");
    }
    let images = Arc::new(UnsplashClient::new(UnsplashConfig {
        search_url: config.image.search_url.clone(),
        access_key: config.image.access_key.clone(),
        timeout_secs: config.image.timeout_secs,
    })?);

    let state = AppState::new(AppDependencies {
        text_generator,
        speech,
        images,
        audio_cache,
        story_repo,
        story_settings: StorySettings {
            title_policy: config.story.title_policy,
            title_limits: config.story.title_limits(),
            default_language: config.story.default_language.clone(),
            system_prompt: config.llm.system_prompt.clone(),
        },
        media_settings: MediaSettings {
            public_base_url: config.server.public_base_url(),
            fallback_image_template: config.image.fallback_template.clone(),
            default_locale: config.tts.default_locale.clone(),
            parallel: config.story.parallel_enrichment,
        },
        fallback_audio,
    });

    serve(&config.server.bind_addr(), build_router(state), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            return;
        }
        tracing::info!("Received shutdown signal");
    })
    .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志；RUST_LOG 优先于 log.level
fn init_tracing(log: &LogConfig) {
    let log_filter = format!(
        "{},storyforge={},tower_http=debug,sqlx=warn",
        log.level, log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn build_story_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn StoryRepositoryPort>> {
    match config.database.backend {
        DatabaseBackend::Sqlite => {
            if let Some(parent) = Path::new(&config.database.path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }

            let db_config = DatabaseConfig::new(&config.database.path)
                .with_max_connections(config.database.max_connections);
            let pool = create_pool(&db_config).await?;
            run_migrations(&pool).await?;

            Ok(Arc::new(SqliteStoryRepository::new(pool)))
        }
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory story repository, stories are lost on restart");
            Ok(Arc::new(InMemoryStoryRepository::new()))
        }
    }
}

fn build_audio_cache(config: &AppConfig) -> anyhow::Result<Arc<dyn AudioCachePort>> {
    let cache: Arc<dyn AudioCachePort> = match config.cache.backend {
        CacheBackend::Memory => InMemoryAudioCache::new(config.cache.max_size_bytes).arc(),
        CacheBackend::Sled => SledAudioCache::new(&SledCacheConfig {
            db_path: config.cache.sled_path.clone(),
            max_size_bytes: config.cache.max_size_bytes,
        })?
        .arc(),
    };
    Ok(cache)
}

/// 读取 "audio unavailable" 提示音频，读取失败时使用静音 WAV
fn load_fallback_audio(path: Option<&Path>) -> Vec<u8> {
    if let Some(path) = path {
        match std::fs::read(path) {
            Ok(data) if !data.is_empty() => {
                tracing::info!(path = %path.display(), size = data.len(), "Fallback audio loaded");
                return data;
            }
            Ok(_) => tracing::warn!(path = %path.display(), "Fallback audio file is empty"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Cannot read fallback audio"),
        }
    }

    silent_wav(FALLBACK_SILENCE_MS, FALLBACK_SAMPLE_RATE)
}
