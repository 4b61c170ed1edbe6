//! Request extractors that reject with the error envelope.
//!
//! axum's own `Json`, `Path` and `Query` answer bad input with plain-text
//! bodies. These wrappers run the same extraction and turn the rejection into
//! an `AppError` stamped with the current revision.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::errors::{AppError, AppErrorWithRevision};
use crate::AppState;

/// JSON request body.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

/// Typed path parameters.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

/// Typed query string.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T> FromRequest<AppState> for ApiJson<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppErrorWithRevision;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(with_revision(state, json_error(rejection)).await),
        }
    }
}

impl<T> FromRequestParts<AppState> for ApiPath<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppErrorWithRevision;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(with_revision(state, path_error(rejection)).await),
        }
    }
}

impl<T> FromRequestParts<AppState> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppErrorWithRevision;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(with_revision(state, query_error(rejection)).await),
        }
    }
}

async fn with_revision(state: &AppState, error: AppError) -> AppErrorWithRevision {
    tracing::debug!("Rejected request input: {}", error);
    AppErrorWithRevision {
        error,
        revision_id: state.repo.get_revision_id().await.unwrap_or(0),
    }
}

/// Unparseable or wrongly typed bodies are validation failures; a missing
/// content type or an unreadable body is a bad request.
fn json_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            AppError::Validation(rejection.body_text())
        }
        _ => AppError::BadRequest(rejection.body_text()),
    }
}

fn path_error(rejection: PathRejection) -> AppError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(_) => {
            AppError::Validation(rejection.body_text())
        }
        _ => AppError::BadRequest(rejection.body_text()),
    }
}

fn query_error(rejection: QueryRejection) -> AppError {
    match rejection {
        QueryRejection::FailedToDeserializeQueryString(_) => {
            AppError::Validation(rejection.body_text())
        }
        _ => AppError::BadRequest(rejection.body_text()),
    }
}
