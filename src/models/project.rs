//! Portfolio projects and blog posts.
//!
//! Both own an ordered image list and expose a derived cover image, so they
//! share the same payload rules.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::common::{check_cover_image, deserialize_features, not_blank, url_safe_slug};

/// A tiny house built by the company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub images: Vec<String>,
    /// First image unless one was chosen explicitly; empty without images
    pub cover_image: String,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: String,
}

/// Request body for creating a project.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "url_safe_slug"))]
    pub slug: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_features")]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Request body for editing a project. A present `images` list replaces the
/// stored list wholesale.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "url_safe_slug"))]
    pub slug: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_features")]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// A blog article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub images: Vec<String>,
    pub cover_image: String,
    pub features: Vec<String>,
    pub created_at: String,
}

/// Request body for creating a blog post.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogPostRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "url_safe_slug"))]
    pub slug: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_features")]
    pub features: Option<Vec<String>>,
}

/// Request body for editing a blog post.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogPostRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "url_safe_slug"))]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_features")]
    pub features: Option<Vec<String>>,
}

/// Checks an explicit cover against the image list the record will have once
/// the payload is applied.
pub fn check_cover_against(
    cover_image: Option<&str>,
    resulting_images: &[String],
) -> Result<(), ValidationErrors> {
    check_cover_image(cover_image, resulting_images).map_err(|err| {
        let mut errors = ValidationErrors::new();
        errors.add("coverImage", err);
        errors
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_payload(json: serde_json::Value) -> CreateProjectRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_create_project_requires_title_slug_description() {
        let request = create_payload(serde_json::json!({ "title": "Tiny A" }));
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("slug"));
        assert!(fields.contains_key("description"));
        assert!(!fields.contains_key("title"));
    }

    #[test]
    fn test_create_project_valid_payload() {
        let request = create_payload(serde_json::json!({
            "title": "Tiny A",
            "slug": "tiny-a",
            "description": "d",
            "images": ["u1", "u2"],
            "coverImage": "u2"
        }));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_project_rejects_uppercase_slug() {
        let request = create_payload(serde_json::json!({
            "title": "Tiny A",
            "slug": "Tiny-A",
            "description": "d"
        }));
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("slug"));
    }

    #[test]
    fn test_update_blog_blank_title_rejected() {
        let request: UpdateBlogPostRequest =
            serde_json::from_value(serde_json::json!({ "title": "   " })).unwrap();
        assert!(request.validate().is_err());

        let untouched = UpdateBlogPostRequest::default();
        assert!(untouched.validate().is_ok());
    }

    #[test]
    fn test_check_cover_against() {
        let images = vec!["u3".to_string()];
        assert!(check_cover_against(Some("u3"), &images).is_ok());
        assert!(check_cover_against(None, &images).is_ok());
        let err = check_cover_against(Some("u1"), &images).unwrap_err();
        assert!(err.field_errors().contains_key("coverImage"));
    }
}
