//! Team member and FAQ endpoints.

use axum::extract::State;

use super::{error, success, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CreateFaqRequest, CreateTeamMemberRequest, FaqEntry, ListQuery, TeamMember, UpdateFaqRequest,
    UpdateTeamMemberRequest,
};
use crate::AppState;

/// GET /api/team - List team members.
pub async fn list_team_members(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ListQuery>,
) -> ApiResult<Vec<TeamMember>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_team_members(&filter).await {
        Ok(members) => success(members, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/team/{id} - Get a team member.
pub async fn get_team_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<TeamMember> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_team_member(id).await {
        Ok(Some(member)) => success(member, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Team member {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/team - Add a team member.
pub async fn create_team_member(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTeamMemberRequest>,
) -> ApiResult<TeamMember> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_team_member(&request).await {
        Ok(member) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(member, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/team/{id} - Update a team member.
pub async fn update_team_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateTeamMemberRequest>,
) -> ApiResult<TeamMember> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_team_member(id, &request).await {
        Ok(member) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(member, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/team/{id} - Remove a team member.
pub async fn delete_team_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_team_member(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/faq - List FAQ entries.
pub async fn list_faqs(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ListQuery>,
) -> ApiResult<Vec<FaqEntry>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_faqs(&filter).await {
        Ok(faqs) => success(faqs, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/faq/{id}
pub async fn get_faq(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<FaqEntry> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_faq(id).await {
        Ok(Some(faq)) => success(faq, revision_id),
        Ok(None) => error(AppError::NotFound(format!("FAQ {} not found", id)), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/admin/faq
pub async fn create_faq(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateFaqRequest>,
) -> ApiResult<FaqEntry> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_faq(&request).await {
        Ok(faq) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(faq, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/admin/faq/{id}
pub async fn update_faq(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateFaqRequest>,
) -> ApiResult<FaqEntry> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_faq(id, &request).await {
        Ok(faq) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(faq, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/admin/faq/{id}
pub async fn delete_faq(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_faq(id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
