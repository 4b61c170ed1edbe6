//! Contact form endpoints.

use axum::extract::State;

use super::{error, success, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::errors::AppError;
use crate::models::{ContactMessage, CreateContactMessageRequest, ListQuery};
use crate::AppState;

/// POST /api/contact - Submit the public contact form.
pub async fn submit_contact_message(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateContactMessageRequest>,
) -> ApiResult<ContactMessage> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_contact_message(&request).await {
        Ok(message) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(message, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/admin/contact - List received messages, newest first.
pub async fn list_contact_messages(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ListQuery>,
) -> ApiResult<Vec<ContactMessage>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_contact_messages(&filter).await {
        Ok(messages) => success(messages, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/admin/contact/{id}
pub async fn get_contact_message(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ContactMessage> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_contact_message(id).await {
        Ok(Some(message)) => success(message, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Contact message {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/contact/{id}/read - Mark a message as read.
pub async fn mark_contact_message_read(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ContactMessage> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.mark_contact_message_read(id).await {
        Ok(message) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(message, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/contact/{id}
pub async fn delete_contact_message(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_contact_message(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
