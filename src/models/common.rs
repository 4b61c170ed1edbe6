//! Shared pieces of the record contract: lookup keys, list filters, and the
//! field rules reused by several payloads.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

use super::MediaType;

/// How a caller addresses a single Project or BlogPost.
///
/// Path segments that parse as an integer are ids; anything else is a slug.
/// Slugs may never be purely numeric, so the two never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    Id(i64),
    Slug(String),
}

impl RecordKey {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(id) => RecordKey::Id(id),
            Err(_) => RecordKey::Slug(raw.to_string()),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Id(id) => write!(f, "{}", id),
            RecordKey::Slug(slug) => write!(f, "'{}'", slug),
        }
    }
}

/// Optional single-field filter accepted by the list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<MediaType>,
}

/// Cover image for an owned image list: the explicit choice when it is one of
/// `images`, otherwise the first image, otherwise empty.
pub fn derive_cover_image(explicit: Option<&str>, images: &[String]) -> String {
    explicit
        .filter(|cover| images.iter().any(|img| img == cover))
        .map(str::to_string)
        .or_else(|| images.first().cloned())
        .unwrap_or_default()
}

/// Rejects an explicit cover that is not part of the image list.
pub fn check_cover_image(explicit: Option<&str>, images: &[String]) -> Result<(), ValidationError> {
    match explicit {
        Some(cover) if !cover.is_empty() && !images.iter().any(|img| img == cover) => Err(
            field_error("cover_not_in_images", "must be one of the images"),
        ),
        _ => Ok(()),
    }
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("required", "is required"));
    }
    Ok(())
}

/// Slugs must already be in their slugified form and must not look like an id.
pub fn url_safe_slug(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("required", "is required"));
    }
    if slug::slugify(value) != value {
        return Err(field_error(
            "slug",
            "must contain only lowercase letters, digits and single hyphens",
        ));
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return Err(field_error("slug", "must not be purely numeric"));
    }
    Ok(())
}

pub(super) fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Feature lists arrive either as a JSON array or as one comma-separated string.
pub fn deserialize_features<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Features {
        List(Vec<String>),
        Csv(String),
    }

    let raw = Option::<Features>::deserialize(deserializer)?;
    Ok(raw.map(|features| {
        let items = match features {
            Features::List(items) => items,
            Features::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        };
        items
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key_parse() {
        assert_eq!(RecordKey::parse("42"), RecordKey::Id(42));
        assert_eq!(
            RecordKey::parse("tiny-a"),
            RecordKey::Slug("tiny-a".to_string())
        );
    }

    #[test]
    fn test_cover_defaults_to_first_image() {
        let images = vec!["u1".to_string(), "u2".to_string()];
        assert_eq!(derive_cover_image(None, &images), "u1");
        assert_eq!(derive_cover_image(Some("u2"), &images), "u2");
        assert_eq!(derive_cover_image(Some("gone"), &images), "u1");
        assert_eq!(derive_cover_image(None, &[]), "");
    }

    #[test]
    fn test_check_cover_image() {
        let images = vec!["u1".to_string()];
        assert!(check_cover_image(None, &images).is_ok());
        assert!(check_cover_image(Some(""), &images).is_ok());
        assert!(check_cover_image(Some("u1"), &images).is_ok());
        assert!(check_cover_image(Some("u9"), &images).is_err());
    }

    #[test]
    fn test_slug_rules() {
        assert!(url_safe_slug("tiny-a").is_ok());
        assert!(url_safe_slug("ev-2024").is_ok());
        assert!(url_safe_slug("").is_err());
        assert!(url_safe_slug("Tiny A").is_err());
        assert!(url_safe_slug("tiny--a").is_err());
        assert!(url_safe_slug("2024").is_err());
    }

    #[test]
    fn test_features_from_csv_or_list() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "deserialize_features")]
            features: Option<Vec<String>>,
        }

        let csv: Holder = serde_json::from_str(r#"{"features": "solar, wood ,, deck"}"#).unwrap();
        assert_eq!(
            csv.features,
            Some(vec!["solar".to_string(), "wood".to_string(), "deck".to_string()])
        );

        let list: Holder = serde_json::from_str(r#"{"features": ["a", " b "]}"#).unwrap();
        assert_eq!(list.features, Some(vec!["a".to_string(), "b".to_string()]));

        let missing: Holder = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.features, None);
    }
}
