//! Site settings, page image sets, home page content and the catalog link.

use axum::extract::State;

use super::{error, success, ApiJson, ApiPath, ApiResult};
use crate::errors::AppError;
use crate::models::{
    Catalog, HomeContent, PageImageSet, PageSlug, SiteSettings, UpdateCatalogRequest,
    UpdateHomeContentRequest, UpdatePageImagesRequest, UpdateSettingsRequest,
};
use crate::AppState;

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<SiteSettings> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_settings().await {
        Ok(settings) => success(settings, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/settings - Merge the provided fields into the settings.
pub async fn update_settings(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateSettingsRequest>,
) -> ApiResult<SiteSettings> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_settings(&request).await {
        Ok(settings) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(settings, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

fn parse_page(page: &str) -> Result<PageSlug, AppError> {
    PageSlug::parse(page).ok_or_else(|| AppError::NotFound(format!("Unknown page '{}'", page)))
}

/// GET /api/page-images/{page}
pub async fn get_page_images(
    State(state): State<AppState>,
    ApiPath(page): ApiPath<String>,
) -> ApiResult<PageImageSet> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let page = match parse_page(&page) {
        Ok(page) => page,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.get_page_images(page).await {
        Ok(set) => success(set, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/page-images/{page} - Replace the images of one page.
pub async fn update_page_images(
    State(state): State<AppState>,
    ApiPath(page): ApiPath<String>,
    ApiJson(request): ApiJson<UpdatePageImagesRequest>,
) -> ApiResult<PageImageSet> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let page = match parse_page(&page) {
        Ok(page) => page,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.update_page_images(page, &request).await {
        Ok(set) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(set, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/home
pub async fn get_home_content(State(state): State<AppState>) -> ApiResult<HomeContent> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_home_content().await {
        Ok(content) => success(content, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/home - Merge the provided fields into the home page content.
pub async fn update_home_content(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateHomeContentRequest>,
) -> ApiResult<HomeContent> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_home_content(&request).await {
        Ok(content) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(content, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/catalog
pub async fn get_catalog(State(state): State<AppState>) -> ApiResult<Catalog> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_catalog().await {
        Ok(catalog) => success(catalog, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/catalog - Point the catalog at a hosted PDF.
pub async fn update_catalog(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateCatalogRequest>,
) -> ApiResult<Catalog> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_catalog(&request).await {
        Ok(catalog) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(catalog, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/catalog
pub async fn clear_catalog(State(state): State<AppState>) -> ApiResult<Catalog> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.clear_catalog().await {
        Ok(catalog) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(catalog, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
