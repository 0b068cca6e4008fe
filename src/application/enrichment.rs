//! 故事富化（音频 + 配图）
//!
//! 这两步是尽力而为的：失败时换成兜底引用，故事照常创建。
//! 返回类型 [`Enrichment`] 没有错误分支，调用方无法把这两步的失败传播出去。

use std::sync::Arc;

use crate::application::ports::{
    AudioCachePort, ExternalServiceError, ImageSearchPort, SpeechSynthesisPort, SynthesisRequest,
};
use crate::domain::locale_for;
use crate::domain::story::{
    audio_playback_url, audio_unavailable_url, fallback_image_url, image_search_query, StoryDraft,
    StoryId, StoryMedia,
};

/// 富化步骤结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment<T> {
    /// 外部服务成功
    Enriched(T),
    /// 外部服务失败，使用兜底值
    Degraded { fallback: T, reason: String },
}

impl<T> Enrichment<T> {
    pub fn degraded(fallback: T, reason: impl Into<String>) -> Self {
        Self::Degraded {
            fallback,
            reason: reason.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Enriched(value) => value,
            Self::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Enriched(value) => value,
            Self::Degraded { fallback, .. } => fallback,
        }
    }
}

/// 富化配置
#[derive(Debug, Clone)]
pub struct MediaSettings {
    /// 对外 Base URL，用于拼接音频播放地址
    pub public_base_url: String,
    /// 兜底图片模板，包含 `{keywords}`
    pub fallback_image_template: String,
    /// 未知语言使用的 TTS locale
    pub default_locale: String,
    /// 音频和配图是否并发请求
    pub parallel: bool,
}

/// StoryEnricher - 音频合成、缓存写入、配图查询
pub struct StoryEnricher {
    speech: Arc<dyn SpeechSynthesisPort>,
    images: Arc<dyn ImageSearchPort>,
    audio_cache: Arc<dyn AudioCachePort>,
    settings: MediaSettings,
}

impl StoryEnricher {
    pub fn new(
        speech: Arc<dyn SpeechSynthesisPort>,
        images: Arc<dyn ImageSearchPort>,
        audio_cache: Arc<dyn AudioCachePort>,
        settings: MediaSettings,
    ) -> Self {
        Self {
            speech,
            images,
            audio_cache,
            settings,
        }
    }

    pub fn settings(&self) -> &MediaSettings {
        &self.settings
    }

    /// 按语言名称合成音频
    pub async fn synthesize(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Vec<u8>, ExternalServiceError> {
        if text.trim().is_empty() {
            return Err(ExternalServiceError::new("tts", "nothing to synthesize"));
        }

        let request = SynthesisRequest {
            text: text.to_string(),
            locale: locale_for(language, &self.settings.default_locale),
        };
        self.speech.synthesize(request).await
    }

    /// 第 3 步：合成音频并写入缓存，返回播放地址
    pub async fn audio(&self, story_id: StoryId, content: &str, language: &str) -> Enrichment<String> {
        let fallback = || audio_unavailable_url(&self.settings.public_base_url);

        let audio = match self.synthesize(content, language).await {
            Ok(audio) => audio,
            Err(e) => return Enrichment::degraded(fallback(), e.to_string()),
        };

        match self.audio_cache.put(story_id, audio).await {
            Ok(()) => Enrichment::Enriched(audio_playback_url(&self.settings.public_base_url, &story_id)),
            Err(e) => Enrichment::degraded(fallback(), e.to_string()),
        }
    }

    /// 第 4 步：按 title + theme + genre 搜索配图
    pub async fn image(&self, title: &str, theme: &str, genre: &str) -> Enrichment<String> {
        let query = image_search_query(title, theme, genre);

        match self.images.search(&query).await {
            Ok(url) => Enrichment::Enriched(url),
            Err(e) => Enrichment::degraded(
                fallback_image_url(&self.settings.fallback_image_template, title, theme, genre),
                e.to_string(),
            ),
        }
    }

    /// 执行第 3、4 步，降级时记录 warn 日志
    pub async fn enrich(&self, draft: &StoryDraft) -> StoryMedia {
        let audio = self.audio(draft.id, &draft.content, &draft.language);
        let image = self.image(&draft.title, &draft.theme, &draft.genre);

        let (audio, image) = if self.settings.parallel {
            tokio::join!(audio, image)
        } else {
            let audio = audio.await;
            (audio, image.await)
        };

        if let Enrichment::Degraded { reason, .. } = &audio {
            tracing::warn!(story_id = %draft.id, step = "audio", error = %reason, "Audio unavailable, using fallback");
        }
        if let Enrichment::Degraded { reason, .. } = &image {
            tracing::warn!(story_id = %draft.id, step = "image", error = %reason, "Image search failed, using fallback");
        }

        StoryMedia {
            audio_url: audio.into_value(),
            image_url: image.into_value(),
        }
    }

    /// 持久化失败时清理已经写入的音频
    pub async fn discard_audio(&self, story_id: StoryId) {
        if let Err(e) = self.audio_cache.remove(story_id).await {
            tracing::warn!(story_id = %story_id, error = %e, "Failed to discard cached audio");
        }
    }
}
