//! Gallery media records.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::not_blank;

/// Kind of a media asset. Fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "IMAGE",
            MediaType::Video => "VIDEO",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IMAGE" => Some(MediaType::Image),
            "VIDEO" => Some(MediaType::Video),
            _ => None,
        }
    }
}

/// An image or video shown in the gallery and used to decorate pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: i64,
    pub title: String,
    /// Cloud-hosted URL or a local path
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Hosting platform for embedded videos, e.g. "youtube"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub created_at: String,
}

/// Request body for registering an uploaded asset.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default, rename = "type")]
    #[validate(required(message = "is required"))]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Request body for editing a media record. `type` may be repeated but not changed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMediaRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}
