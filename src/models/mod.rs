//! Data models for the Nera site.
//!
//! Records serialize in camelCase to match the JSON the pages and admin forms exchange.

mod common;
mod contact;
mod media;
mod project;
mod site;
mod team;

pub use common::*;
pub use contact::*;
pub use media::*;
pub use project::*;
pub use site::*;
pub use team::*;

use serde::{Deserialize, Serialize};

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
