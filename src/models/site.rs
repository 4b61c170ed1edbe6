//! Singleton site content: settings, per-page image sets, the home page copy
//! and the downloadable catalog.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::common::{field_error, not_blank};

/// Global site settings. There is exactly one row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_name: String,
    pub site_description: String,
    pub contact_email: String,
    pub maintenance_mode: bool,
}

/// Partial settings update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub site_name: Option<String>,
    #[serde(default)]
    pub site_description: Option<String>,
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub maintenance_mode: Option<bool>,
}

/// Pages that carry an editable image set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PageSlug {
    Home,
    About,
    Projects,
    Contact,
}

impl PageSlug {
    pub const ALL: [PageSlug; 4] = [
        PageSlug::Home,
        PageSlug::About,
        PageSlug::Projects,
        PageSlug::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageSlug::Home => "home",
            PageSlug::About => "about",
            PageSlug::Projects => "projects",
            PageSlug::Contact => "contact",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.as_str() == s)
    }
}

/// Ordered images shown on one page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageImageSet {
    pub page: PageSlug,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageImagesRequest {
    #[serde(default)]
    pub images: Vec<String>,
}

/// Editable copy and imagery of the landing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HomeContent {
    pub hero_title: String,
    pub hero_description: String,
    pub hero_button: String,
    pub hero_image: String,
    pub slider_images: Vec<String>,
    pub gallery_images: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHomeContentRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub hero_title: Option<String>,
    #[serde(default)]
    pub hero_description: Option<String>,
    #[serde(default)]
    pub hero_button: Option<String>,
    #[serde(default)]
    pub hero_image: Option<String>,
    #[serde(default)]
    pub slider_images: Option<Vec<String>>,
    #[serde(default)]
    pub gallery_images: Option<Vec<String>>,
}

/// The downloadable product catalog. The PDF itself is hosted elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub exists: bool,
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCatalogRequest {
    #[serde(default)]
    #[validate(custom(function = "pdf_url"))]
    pub url: String,
}

/// Catalog links must point at a PDF, ignoring any query or fragment.
pub fn pdf_url(value: &str) -> Result<(), ValidationError> {
    let path = value.trim().split(['?', '#']).next().unwrap_or_default();
    if path.is_empty() {
        return Err(field_error("required", "is required"));
    }
    if !path.to_ascii_lowercase().ends_with(".pdf") {
        return Err(field_error("pdf", "must point to a PDF file"));
    }
    Ok(())
}
