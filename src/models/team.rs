//! Team members and FAQ entries, the two id-ordered resources.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::not_blank;

/// A person shown on the "about us" page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamMemberRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub role: String,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamMemberRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub role: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// A frequently asked question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FaqEntry {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFaqRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub question: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub answer: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFaqRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub question: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub answer: Option<String>,
}
