//! Blog API endpoints.

use axum::extract::State;

use super::{error, success, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::errors::AppError;
use crate::models::{BlogPost, CreateBlogPostRequest, ListQuery, RecordKey, UpdateBlogPostRequest};
use crate::AppState;

/// GET /api/blog - List blog posts, optionally filtered by `id` or `slug`.
pub async fn list_blog_posts(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ListQuery>,
) -> ApiResult<Vec<BlogPost>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_blog_posts(&filter).await {
        Ok(posts) => success(posts, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/blog/{key} - Get a blog post by id or slug.
pub async fn get_blog_post(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
) -> ApiResult<BlogPost> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    let key = RecordKey::parse(&key);

    match state.repo.get_blog_post(&key).await {
        Ok(Some(post)) => success(post, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Blog post {} not found", key)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/blog - Create a blog post.
pub async fn create_blog_post(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateBlogPostRequest>,
) -> ApiResult<BlogPost> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_blog_post(&request).await {
        Ok(post) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(post, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/blog/{key} - Update a blog post.
pub async fn update_blog_post(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
    ApiJson(request): ApiJson<UpdateBlogPostRequest>,
) -> ApiResult<BlogPost> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state
        .repo
        .update_blog_post(&RecordKey::parse(&key), &request)
        .await
    {
        Ok(post) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(post, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/blog/{key} - Delete a blog post and its images.
pub async fn delete_blog_post(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_blog_post(&RecordKey::parse(&key)).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
