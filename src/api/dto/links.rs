//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::pagination::PaginationMeta;
use crate::domain::entities::{Link, LinkPatch};

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Redirect target; must be an absolute HTTP/HTTPS URL.
    #[validate(url(message = "Invalid URL format"))]
    pub original_url: String,

    /// Optional RFC3339 expiry. After this instant the link stops resolving.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request body for `PATCH /api/links/{id}`.
///
/// All fields are optional; only provided fields are changed.
///
/// # `expires_at` semantics
///
/// - **Absent** (`expires_at` not in JSON) → leave existing value unchanged
/// - **`null`** → clear expiry (link never expires)
/// - **Timestamp** → set new expiry
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLinkRequest {
    pub is_enabled: Option<bool>,

    /// Expiry timestamp. Absent = no change, null = clear, value = set.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateLinkRequest> for LinkPatch {
    fn from(req: UpdateLinkRequest) -> Self {
        LinkPatch {
            is_enabled: req.is_enabled,
            expires_at: req.expires_at,
        }
    }
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub is_enabled: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            code: link.code,
            short_url,
            original_url: link.original_url,
            is_enabled: link.is_enabled,
            expires_at: link.expires_at,
            created_at: link.created_at,
        }
    }
}

/// Paginated list of the caller's links.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<LinkResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_absent_expiry_is_untouched() {
        let req: UpdateLinkRequest = serde_json::from_str(r#"{"is_enabled": false}"#).unwrap();
        let patch = LinkPatch::from(req);

        assert_eq!(patch.is_enabled, Some(false));
        assert_eq!(patch.expires_at, None);
    }

    #[test]
    fn test_update_null_expiry_clears() {
        let req: UpdateLinkRequest = serde_json::from_str(r#"{"expires_at": null}"#).unwrap();
        assert_eq!(LinkPatch::from(req).expires_at, Some(None));
    }

    #[test]
    fn test_update_timestamp_expiry_sets() {
        let req: UpdateLinkRequest =
            serde_json::from_str(r#"{"expires_at": "2026-12-31T23:59:59Z"}"#).unwrap();
        let expires = LinkPatch::from(req).expires_at.flatten().unwrap();

        assert_eq!(expires.to_rfc3339(), "2026-12-31T23:59:59+00:00");
    }

    #[test]
    fn test_update_rejects_non_rfc3339_expiry() {
        assert!(serde_json::from_str::<UpdateLinkRequest>(r#"{"expires_at": "tomorrow"}"#).is_err());
    }

    #[test]
    fn test_create_validates_url() {
        let ok = CreateLinkRequest {
            original_url: "https://example.com".to_string(),
            expires_at: None,
        };
        let bad = CreateLinkRequest {
            original_url: "not a url".to_string(),
            expires_at: None,
        };

        assert!(ok.validate().is_ok());
        assert!(bad.validate().is_err());
    }
}
