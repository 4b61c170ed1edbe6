//! Gallery sampling endpoints backed by the selection cache.

use axum::extract::State;

use super::{error, success, ApiQuery, ApiResult, CountQuery};
use crate::models::MediaItem;
use crate::AppState;

/// GET /api/gallery/unique - Images not yet served in the current cycle.
pub async fn gallery_unique(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CountQuery>,
) -> ApiResult<Vec<MediaItem>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    let count = query.clamped(state.config.gallery_max_count);

    match state.gallery.sample_unique_images(count).await {
        Ok(items) => success(items, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/gallery/random - Random images, repeats allowed.
pub async fn gallery_random(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CountQuery>,
) -> ApiResult<Vec<MediaItem>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    let count = query.clamped(state.config.gallery_max_count);

    match state.gallery.sample_images(count).await {
        Ok(items) => success(items, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/gallery/videos - Random videos.
pub async fn gallery_videos(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CountQuery>,
) -> ApiResult<Vec<MediaItem>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    let count = query.clamped(state.config.gallery_max_count);

    match state.gallery.sample_videos(count).await {
        Ok(items) => success(items, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/gallery/any - Random media of either type.
pub async fn gallery_any(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CountQuery>,
) -> ApiResult<Vec<MediaItem>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    let count = query.clamped(state.config.gallery_max_count);

    match state.gallery.sample_any(count).await {
        Ok(items) => success(items, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/gallery/invalidate - Drop the snapshot and exclusions.
pub async fn invalidate_gallery(State(state): State<AppState>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    state.gallery.invalidate().await;
    tracing::info!("Gallery cache invalidated by admin");
    success((), revision_id)
}

/// POST /api/admin/gallery/reset-exclusions - Start a new unique cycle.
pub async fn reset_gallery_exclusions(State(state): State<AppState>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    state.gallery.reset_exclusions().await;
    success((), revision_id)
}
