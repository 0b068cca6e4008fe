//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                      GET   健康检查
//! - /api/story/generate            POST  AI 生成故事
//! - /api/story/manual              POST  手动创建故事
//! - /api/story/get                 POST  获取故事详情
//! - /api/story/list                POST  列出全部故事（最新在前，可分页）
//! - /api/story/mine                POST  某作者的故事（可按状态过滤）
//! - /api/story/search              POST  按标题 / 主题搜索
//! - /api/story/count               POST  某作者的故事数
//! - /api/story/update              POST  修改标题、正文、状态
//! - /api/story/delete              POST  删除故事
//! - /api/story/bookmark            POST  收藏
//! - /api/story/unbookmark          POST  取消收藏
//! - /api/story/bookmarks           POST  某用户收藏的故事
//! - /api/story/audio/unavailable   GET   兜底音频
//! - /api/story/audio/:id           GET   故事音频

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/story", story_routes())
}

fn story_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(handlers::generate_story))
        .route("/manual", post(handlers::create_manual_story))
        .route("/get", post(handlers::get_story))
        .route("/list", post(handlers::list_stories))
        .route("/mine", post(handlers::list_owner_stories))
        .route("/search", post(handlers::search_stories))
        .route("/count", post(handlers::count_owner_stories))
        .route("/update", post(handlers::update_story))
        .route("/delete", post(handlers::delete_story))
        .route("/bookmark", post(handlers::add_bookmark))
        .route("/unbookmark", post(handlers::remove_bookmark))
        .route("/bookmarks", post(handlers::list_bookmarks))
        .route("/audio/unavailable", get(handlers::get_unavailable_audio))
        .route("/audio/:story_id", get(handlers::get_story_audio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::application::test_support::{media_settings, StubImages, StubSpeech, StubTextGenerator};
    use crate::application::StorySettings;
    use crate::domain::story::{TitleLimits, TitlePolicy};
    use crate::domain::silent_wav;
    use crate::infrastructure::http::handlers::AUDIO_SOURCE_HEADER;
    use crate::infrastructure::http::server::build_router;
    use crate::infrastructure::http::state::AppDependencies;
    use crate::infrastructure::memory::{InMemoryAudioCache, InMemoryStoryRepository};

    fn app(speech: StubSpeech) -> Router {
        let state = AppState::new(AppDependencies {
            text_generator: Arc::new(StubTextGenerator::ok(
                "The Tide Keeper\nA lighthouse keeper befriends the sea.",
            )),
            speech: Arc::new(speech),
            images: Arc::new(StubImages::failing()),
            audio_cache: InMemoryAudioCache::new(1024 * 1024).arc(),
            story_repo: Arc::new(InMemoryStoryRepository::new()),
            story_settings: StorySettings {
                title_policy: TitlePolicy::FirstLine,
                title_limits: TitleLimits::default(),
                default_language: "english".to_string(),
                system_prompt: "You are a creative storyteller.".to_string(),
            },
            media_settings: media_settings(),
            fallback_audio: silent_wav(100, 16_000),
        });

        build_router(state)
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> Value {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let request = Request::builder().uri("/api/ping").body(Body::empty()).unwrap();
        let response = app(StubSpeech::failing()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_and_body_limit() {
        let app = app(StubSpeech::failing());

        let request = Request::builder()
            .uri("/api/ping")
            .header(header::ORIGIN, "http://player.test")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

        let oversized = json!({"query": "x".repeat(3 * 1024 * 1024)});
        let request = Request::builder()
            .method("POST")
            .uri("/api/story/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(oversized.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_generate_then_bookmark_flow() {
        let app = app(StubSpeech::ok(b"ID3audio".to_vec()));

        let created = post_json(
            &app,
            "/api/story/generate",
            json!({"genre": "Mystery", "theme": "a lighthouse", "length": "short", "owner_id": "u1"}),
        )
        .await;
        assert_eq!(created["errno"], 0);
        assert_eq!(created["data"]["title"], "The Tide Keeper");
        assert_eq!(created["data"]["status"], "draft");
        assert!(created["data"]["image_url"]
            .as_str()
            .unwrap()
            .starts_with("https://source.unsplash.com/800x600/?"));
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let added = post_json(&app, "/api/story/bookmark", json!({"story_id": id, "user_id": "u2"})).await;
        assert_eq!(added["data"]["changed"], true);
        let again = post_json(&app, "/api/story/bookmark", json!({"story_id": id, "user_id": "u2"})).await;
        assert_eq!(again["data"]["changed"], false);

        let bookmarks = post_json(&app, "/api/story/bookmarks", json!({"user_id": "u2"})).await;
        assert_eq!(bookmarks["data"]["total"], 1);
        assert_eq!(bookmarks["data"]["stories"][0]["id"], id.as_str());

        let count = post_json(&app, "/api/story/count", json!({"owner_id": "u1"})).await;
        assert_eq!(count["data"]["count"], 1);
    }

    #[tokio::test]
    async fn test_business_errors_use_envelope() {
        let app = app(StubSpeech::failing());

        let forbidden = post_json(
            &app,
            "/api/story/generate",
            json!({"genre": "Mystery", "theme": "a lighthouse", "length": "short", "status": "published"}),
        )
        .await;
        assert_eq!(forbidden["errno"], 403);
        assert!(forbidden["data"].is_null());

        let missing = post_json(&app, "/api/story/get", json!({"id": "not-a-uuid"})).await;
        assert_eq!(missing["errno"], 404);

        let invalid = post_json(&app, "/api/story/search", json!({"query": "   "})).await;
        assert_eq!(invalid["errno"], 400);
    }

    #[tokio::test]
    async fn test_list_without_body() {
        let app = app(StubSpeech::failing());
        let request = Request::builder()
            .method("POST")
            .uri("/api/story/list")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["errno"], 0);
        assert_eq!(json["data"]["total"], 0);
    }

    #[tokio::test]
    async fn test_unavailable_audio() {
        let request = Request::builder()
            .uri("/api/story/audio/unavailable")
            .body(Body::empty())
            .unwrap();

        let response = app(StubSpeech::failing()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
        assert_eq!(response.headers()[AUDIO_SOURCE_HEADER], "fallback");
    }

    #[tokio::test]
    async fn test_story_audio_from_cache() {
        let app = app(StubSpeech::ok(b"ID3audio".to_vec()));
        let created = post_json(
            &app,
            "/api/story/manual",
            json!({
                "genre": "Fable", "theme": "a fox", "length": "short",
                "title": "The Fox", "content": "A clever fox.", "owner_id": "u1"
            }),
        )
        .await;
        let id = created["data"]["id"].as_str().unwrap();
        assert!(created["data"]["audio_url"].as_str().unwrap().ends_with(id));

        let request = Request::builder()
            .uri(format!("/api/story/audio/{}", id))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
        assert_eq!(response.headers()[AUDIO_SOURCE_HEADER], "cached");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ID3audio");
    }
}
