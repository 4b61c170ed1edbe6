//! Messages sent through the public contact form.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
    pub created_at: String,
    /// Only ever flips from false to true
    pub is_read: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactMessageRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_message_requires_valid_email() {
        let request: CreateContactMessageRequest = serde_json::from_value(serde_json::json!({
            "name": "Ayşe",
            "email": "not-an-email",
            "message": "Merhaba"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_contact_message_phone_is_optional() {
        let request: CreateContactMessageRequest = serde_json::from_value(serde_json::json!({
            "name": "Ayşe",
            "email": "ayse@example.com",
            "message": "Merhaba"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(request.phone.is_none());
    }
}
