//! Media API endpoints.
//!
//! Every successful mutation drops the gallery snapshot so the next sampling
//! request sees the change.

use axum::extract::State;

use super::{error, success, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateMediaRequest, ListQuery, MediaItem, UpdateMediaRequest};
use crate::AppState;

/// GET /api/media - List media, optionally filtered by `id` or `type`.
pub async fn list_media(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ListQuery>,
) -> ApiResult<Vec<MediaItem>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_media(&filter).await {
        Ok(items) => success(items, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/media/{id} - Get one media record.
pub async fn get_media(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<MediaItem> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_media(id).await {
        Ok(Some(item)) => success(item, revision_id),
        Ok(None) => error(AppError::NotFound(format!("Media {} not found", id)), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/media - Register an uploaded asset by its URL.
pub async fn create_media(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateMediaRequest>,
) -> ApiResult<MediaItem> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_media(&request).await {
        Ok(item) => {
            state.gallery.invalidate().await;

            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(item, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/media/{id} - Update a media record.
pub async fn update_media(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateMediaRequest>,
) -> ApiResult<MediaItem> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_media(id, &request).await {
        Ok(item) => {
            state.gallery.invalidate().await;

            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(item, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/media/{id} - Delete a media record.
pub async fn delete_media(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_media(id).await {
        Ok(()) => {
            state.gallery.invalidate().await;

            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
