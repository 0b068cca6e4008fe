//! Bookmark HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{AddBookmark, ListBookmarkedStories, RemoveBookmark};
use crate::infrastructure::http::dto::{
    ApiResponse, BookmarkRequest, BookmarkResponse, StoryListResponse, UserRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn add_bookmark(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookmarkRequest>,
) -> Result<Json<ApiResponse<BookmarkResponse>>, ApiError> {
    let outcome = state
        .add_bookmark_handler
        .handle(AddBookmark {
            story_id: req.story_id.clone(),
            user_id: req.user_id.clone(),
        })
        .await?;

    Ok(Json(ApiResponse::success(BookmarkResponse::added(
        req.story_id,
        req.user_id,
        outcome,
    ))))
}

pub async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookmarkRequest>,
) -> Result<Json<ApiResponse<BookmarkResponse>>, ApiError> {
    let outcome = state
        .remove_bookmark_handler
        .handle(RemoveBookmark {
            story_id: req.story_id.clone(),
            user_id: req.user_id.clone(),
        })
        .await?;

    Ok(Json(ApiResponse::success(BookmarkResponse::removed(
        req.story_id,
        req.user_id,
        outcome,
    ))))
}

/// 用户收藏的故事，最新在前
pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UserRequest>,
) -> Result<Json<ApiResponse<StoryListResponse>>, ApiError> {
    let stories = state
        .list_bookmarked_handler
        .handle(ListBookmarkedStories {
            user_id: req.user_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(stories.into())))
}
