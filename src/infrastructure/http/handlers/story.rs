//! Story HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    CountStoriesByOwner, CreateAiStory, CreateManualStory, DeleteStory, GetStory, ListStories,
    ListStoriesByOwner, SearchStories, UpdateStory,
};
use crate::infrastructure::http::dto::{
    ApiResponse, CountResponse, DeleteStoryResponse, GenerateStoryRequest, ListStoriesRequest,
    ManualStoryRequest, OwnerRequest, OwnerStoriesRequest, SearchStoriesRequest, StoryIdRequest,
    StoryListResponse, StoryResponse, UpdateStoryRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

type StoryResult = Result<Json<ApiResponse<StoryResponse>>, ApiError>;
type StoryListResult = Result<Json<ApiResponse<StoryListResponse>>, ApiError>;

/// AI 生成故事
pub async fn generate_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateStoryRequest>,
) -> StoryResult {
    let command = CreateAiStory {
        genre: req.genre,
        theme: req.theme,
        length: req.length,
        language: req.language,
        owner_id: req.owner_id,
        owner_name: req.owner_name,
        status: req.status,
    };

    let story = state.create_ai_story_handler.handle(command).await?;

    tracing::info!(
        story_id = %story.id(),
        owner = %story.owner_id(),
        title = %story.title(),
        "AI story created"
    );

    Ok(Json(ApiResponse::success(StoryResponse::from(&story))))
}

/// 手动创建故事
pub async fn create_manual_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ManualStoryRequest>,
) -> StoryResult {
    let command = CreateManualStory {
        genre: req.genre,
        theme: req.theme,
        length: req.length,
        language: req.language,
        title: req.title,
        content: req.content,
        owner_id: req.owner_id,
        owner_name: req.owner_name,
        status: req.status,
    };

    let story = state.create_manual_story_handler.handle(command).await?;
    tracing::info!(story_id = %story.id(), owner = %story.owner_id(), "Manual story created");

    Ok(Json(ApiResponse::success(StoryResponse::from(&story))))
}

pub async fn get_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StoryIdRequest>,
) -> StoryResult {
    let story = state
        .get_story_handler
        .handle(GetStory { story_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(StoryResponse::from(&story))))
}

/// 全部故事，最新在前；请求体可省略
pub async fn list_stories(
    State(state): State<Arc<AppState>>,
    req: Option<Json<ListStoriesRequest>>,
) -> StoryListResult {
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let stories = state
        .list_stories_handler
        .handle(ListStories {
            skip: req.skip,
            limit: req.limit,
        })
        .await?;

    Ok(Json(ApiResponse::success(stories.into())))
}

/// 某作者的故事，可按状态过滤
pub async fn list_owner_stories(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OwnerStoriesRequest>,
) -> StoryListResult {
    let stories = state
        .list_stories_by_owner_handler
        .handle(ListStoriesByOwner {
            owner_id: req.owner_id,
            status: req.status,
        })
        .await?;

    Ok(Json(ApiResponse::success(stories.into())))
}

pub async fn search_stories(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchStoriesRequest>,
) -> StoryListResult {
    let stories = state
        .search_stories_handler
        .handle(SearchStories { query: req.query })
        .await?;

    Ok(Json(ApiResponse::success(stories.into())))
}

pub async fn count_owner_stories(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OwnerRequest>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state
        .count_stories_handler
        .handle(CountStoriesByOwner {
            owner_id: req.owner_id.clone(),
        })
        .await?;

    Ok(Json(ApiResponse::success(CountResponse {
        owner_id: req.owner_id,
        count,
    })))
}

pub async fn update_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateStoryRequest>,
) -> StoryResult {
    let command = UpdateStory {
        story_id: req.id,
        title: req.title,
        content: req.content,
        status: req.status,
    };

    let story = state.update_story_handler.handle(command).await?;
    tracing::info!(story_id = %story.id(), status = %story.status(), "Story updated");

    Ok(Json(ApiResponse::success(StoryResponse::from(&story))))
}

pub async fn delete_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StoryIdRequest>,
) -> Result<Json<ApiResponse<DeleteStoryResponse>>, ApiError> {
    state
        .delete_story_handler
        .handle(DeleteStory {
            story_id: req.id.clone(),
        })
        .await?;

    tracing::info!(story_id = %req.id, "Story deleted");

    Ok(Json(ApiResponse::success(DeleteStoryResponse {
        id: req.id,
        status: "deleted".to_string(),
    })))
}
