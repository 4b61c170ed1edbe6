//! REST API module.
//!
//! Public read routes for the site pages, admin write routes for the panel.

mod blog;
mod contact;
mod extract;
mod gallery;
mod media;
mod projects;
mod revision;
mod site;
mod team;

pub use blog::*;
pub use contact::*;
pub use extract::*;
pub use gallery::*;
pub use media::*;
pub use projects::*;
pub use revision::*;
pub use site::*;
pub use team::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: crate::errors::AppError, revision_id: i64) -> ApiResult<T> {
    Err(crate::errors::AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

/// `?count=` on the gallery routes.
#[derive(Debug, Default, Deserialize)]
pub struct CountQuery {
    #[serde(default)]
    pub count: Option<i64>,
}

impl CountQuery {
    pub const DEFAULT_COUNT: usize = 6;

    /// Requested count, clamped to `0..=max`. Negative counts become zero.
    pub fn clamped(&self, max: usize) -> usize {
        match self.count {
            None => Self::DEFAULT_COUNT.min(max),
            Some(n) if n <= 0 => 0,
            Some(n) => usize::try_from(n).unwrap_or(max).min(max),
        }
    }
}
