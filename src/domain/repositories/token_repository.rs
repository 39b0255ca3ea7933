//! Storage for the API tokens behind Bearer authentication.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// An issued token. `token_hash` is the HMAC of the raw value, which is never stored.
#[derive(Debug, Clone)]
pub struct ApiToken {
    pub id: i64,
    pub name: String,
    pub owner_id: String,
    pub is_admin: bool,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ApiToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Input for issuing a new token.
#[derive(Debug, Clone)]
pub struct NewApiToken {
    pub name: String,
    pub owner_id: String,
    pub is_admin: bool,
    pub token_hash: String,
}

/// Resolves token hashes to the owner id and role a request acts as, and
/// backs the token commands of the admin CLI.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Finds a non-revoked token by hash.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn find_active(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError>;

    /// Stamps `last_used_at` with the current time.
    async fn touch(&self, token_hash: &str) -> Result<(), AppError>;

    /// Persists a newly issued token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a token with the same hash or name already exists.
    async fn create_token(&self, new_token: NewApiToken) -> Result<ApiToken, AppError>;

    /// Every token, revoked ones included, newest first.
    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError>;

    /// Exact match on the label given at issue time.
    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError>;

    /// Sets `revoked_at`; the token stops authenticating immediately.
    async fn revoke_token(&self, id: i64) -> Result<(), AppError>;
}
