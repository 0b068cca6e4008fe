//! Audio Handlers
//!
//! 返回原始音频字节，`X-Audio-Source` 标明来源（cached / synthesized / fallback）

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use http::{header, HeaderName};
use std::sync::Arc;

use crate::application::{GetStoryAudio, GetStoryAudioResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub const AUDIO_SOURCE_HEADER: HeaderName = HeaderName::from_static("x-audio-source");

fn audio_response(audio: GetStoryAudioResponse) -> Response {
    (
        [
            (header::CONTENT_TYPE, audio.content_type),
            (AUDIO_SOURCE_HEADER, audio.source.as_str().to_string()),
        ],
        audio.audio_data,
    )
        .into_response()
}

pub async fn get_story_audio(
    State(state): State<Arc<AppState>>,
    Path(story_id): Path<String>,
) -> Result<Response, ApiError> {
    let audio = state
        .get_story_audio_handler
        .handle(GetStoryAudio { story_id })
        .await?;

    Ok(audio_response(audio))
}

/// "audio unavailable" 兜底音频
pub async fn get_unavailable_audio(State(state): State<Arc<AppState>>) -> Response {
    audio_response(state.get_story_audio_handler.fallback())
}
