//! Project API endpoints.

use axum::extract::State;

use super::{error, success, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateProjectRequest, ListQuery, Project, RecordKey, UpdateProjectRequest};
use crate::AppState;

/// GET /api/projects - List projects, optionally filtered by `id` or `slug`.
pub async fn list_projects(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ListQuery>,
) -> ApiResult<Vec<Project>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_projects(&filter).await {
        Ok(projects) => success(projects, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/projects/{key} - Get a project by id or slug.
pub async fn get_project(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
) -> ApiResult<Project> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    let key = RecordKey::parse(&key);

    match state.repo.get_project(&key).await {
        Ok(Some(project)) => success(project, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Project {} not found", key)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/projects - Create a project.
pub async fn create_project(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateProjectRequest>,
) -> ApiResult<Project> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_project(&request).await {
        Ok(project) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(project, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/projects/{key} - Update a project.
pub async fn update_project(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
    ApiJson(request): ApiJson<UpdateProjectRequest>,
) -> ApiResult<Project> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state
        .repo
        .update_project(&RecordKey::parse(&key), &request)
        .await
    {
        Ok(project) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(project, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/projects/{key} - Delete a project and its images.
pub async fn delete_project(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_project(&RecordKey::parse(&key)).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
