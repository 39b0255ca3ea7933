//! Bearer token identity provider.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::Actor;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use serde_json::json;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI stores this
/// value when issuing tokens, so both sides must use the same secret.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the MAC cannot be keyed.
pub fn hash_token(signing_secret: &str, token: &str) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|e| AppError::internal("Invalid token signing key", json!({ "reason": e.to_string() })))?;
    mac.update(token.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Resolves Bearer tokens to the [`Actor`] they act as.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before lookup.
/// An attacker with read-only access to the database cannot verify or forge
/// tokens without the server-side secret.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the value used when tokens were created.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Authenticates a raw token and returns its actor.
    ///
    /// On success the token's `last_used_at` is touched; a failed touch is
    /// logged and does not reject the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<Actor, AppError> {
        let token_hash = hash_token(&self.signing_secret, token)?;

        let api_token = self
            .repository
            .find_active(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("Unauthorized", json!({"reason": "Invalid or revoked token"}))
            })?;

        if let Err(e) = self.repository.touch(&token_hash).await {
            warn!(token_id = api_token.id, error = %e, "Failed to update token last_used_at");
        }

        debug!(token_id = api_token.id, owner = %api_token.owner_id, "Authenticated");

        Ok(Actor {
            id: api_token.owner_id,
            is_admin: api_token.is_admin,
        })
    }
}
