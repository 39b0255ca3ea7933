//! Link entity representing a short code to URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL owned by a single actor.
///
/// `code` is assigned once at creation and never changes. Only `is_enabled`
/// and `expires_at` are mutable.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub owner_id: String,
    pub code: String,
    pub original_url: String,
    pub is_enabled: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        owner_id: String,
        code: String,
        original_url: String,
        is_enabled: bool,
        expires_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            code,
            original_url,
            is_enabled,
            expires_at,
            created_at,
        }
    }

    /// Returns true if the link has an expiry strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e < now)
    }

    /// A link is a redirect target only while enabled and not expired.
    pub fn is_redirectable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_enabled && !self.is_expired_at(now)
    }
}

/// Input data for inserting a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub owner_id: String,
    pub code: String,
    pub original_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub is_enabled: Option<bool>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.is_enabled.is_none() && self.expires_at.is_none()
    }

    /// Applies the patch to an in-memory link.
    pub fn apply(&self, link: &mut Link) {
        if let Some(enabled) = self.is_enabled {
            link.is_enabled = enabled;
        }
        if let Some(expires_at) = self.expires_at {
            link.expires_at = expires_at;
        }
    }
}
