//! Audio Query Handlers
//!
//! 缓存优先；未命中时从仓储加载故事并重新合成，合成结果回填缓存。
//! 合成失败时返回兜底音频而不是错误，兜底音频不写入缓存。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::application::enrichment::StoryEnricher;
use crate::application::error::{parse_story_id, ApplicationError};
use crate::application::ports::{
    AudioCacheExt, AudioCachePort, CacheError, ExternalServiceError, RepositoryError,
    StoryRepositoryPort,
};
use crate::application::queries::{AudioSource, GetStoryAudio, GetStoryAudioResponse};
use crate::domain::AudioFormat;

/// 未命中路径上的失败
enum AudioMiss {
    StoryNotFound,
    Repository(RepositoryError),
    Synthesis(ExternalServiceError),
    Cache(CacheError),
}

impl From<CacheError> for AudioMiss {
    fn from(err: CacheError) -> Self {
        AudioMiss::Cache(err)
    }
}

/// GetStoryAudio Handler
pub struct GetStoryAudioHandler {
    audio_cache: Arc<dyn AudioCachePort>,
    story_repo: Arc<dyn StoryRepositoryPort>,
    enricher: Arc<StoryEnricher>,
    fallback_audio: Arc<Vec<u8>>,
}

impl GetStoryAudioHandler {
    pub fn new(
        audio_cache: Arc<dyn AudioCachePort>,
        story_repo: Arc<dyn StoryRepositoryPort>,
        enricher: Arc<StoryEnricher>,
        fallback_audio: Vec<u8>,
    ) -> Self {
        Self {
            audio_cache,
            story_repo,
            enricher,
            fallback_audio: Arc::new(fallback_audio),
        }
    }

    /// "audio unavailable" 兜底音频
    pub fn fallback(&self) -> GetStoryAudioResponse {
        response(self.fallback_audio.as_ref().clone(), AudioSource::Fallback)
    }

    pub async fn handle(&self, query: GetStoryAudio) -> Result<GetStoryAudioResponse, ApplicationError> {
        let story_id = parse_story_id(&query.story_id)?;

        let synthesized = AtomicBool::new(false);
        let story_repo = &self.story_repo;
        let enricher = &self.enricher;
        let flag = &synthesized;

        let result = self
            .audio_cache
            .get_or_compute(story_id, move || async move {
                let story = story_repo
                    .find_by_id(&story_id)
                    .await
                    .map_err(AudioMiss::Repository)?
                    .ok_or(AudioMiss::StoryNotFound)?;

                let audio = enricher
                    .synthesize(story.content(), story.language())
                    .await
                    .map_err(AudioMiss::Synthesis)?;

                flag.store(true, Ordering::Relaxed);
                Ok(audio)
            })
            .await;

        match result {
            Ok(audio) => {
                let source = if synthesized.load(Ordering::Relaxed) {
                    tracing::info!(story_id = %story_id, bytes = audio.len(), "Audio re-synthesized");
                    AudioSource::Synthesized
                } else {
                    AudioSource::Cached
                };
                Ok(response(audio, source))
            }
            Err(AudioMiss::StoryNotFound) => Err(ApplicationError::not_found("Story", story_id)),
            Err(AudioMiss::Repository(e)) => Err(e.into()),
            Err(AudioMiss::Synthesis(e)) => {
                tracing::warn!(story_id = %story_id, error = %e, "Audio synthesis failed, serving fallback");
                Ok(self.fallback())
            }
            Err(AudioMiss::Cache(e)) => {
                // 缓存不可用时仍然区分未知故事
                if self.story_repo.find_by_id(&story_id).await?.is_none() {
                    return Err(ApplicationError::not_found("Story", story_id));
                }
                tracing::warn!(story_id = %story_id, error = %e, "Audio cache unavailable, serving fallback");
                Ok(self.fallback())
            }
        }
    }
}

fn response(audio_data: Vec<u8>, source: AudioSource) -> GetStoryAudioResponse {
    let content_type = AudioFormat::sniff(&audio_data).content_type().to_string();
    GetStoryAudioResponse {
        audio_data,
        content_type,
        source,
    }
}
