//! Application error type and its HTTP mapping.
//!
//! Every layer returns [`AppError`]. Handlers let it propagate and axum turns it
//! into a JSON body via [`IntoResponse`]:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Link not found", "details": {} } }
//! ```

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::infrastructure::cache::CacheError;
use crate::utils::db_error::is_unique_violation_on_code;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    Forbidden { message: String, details: Value },

    /// Absent, disabled and expired links all collapse into this variant.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// No free code was found within the bounded number of attempts.
    #[error("{message}")]
    AllocationExhausted { message: String, details: Value },

    #[error("{message}")]
    RateLimited { message: String, details: Value },

    /// A durable, cache or counting store call failed.
    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn allocation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::AllocationExhausted {
            message: message.into(),
            details,
        }
    }
    pub fn rate_limited(message: impl Into<String>, details: Value) -> Self {
        Self::RateLimited {
            message: message.into(),
            details,
        }
    }
    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Forbidden { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            AppError::AllocationExhausted { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "allocation_exhausted")
            }
            AppError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            AppError::StoreUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
            AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    fn into_parts(self) -> (String, Value) {
        match self {
            AppError::Validation { message, details }
            | AppError::Unauthorized { message, details }
            | AppError::Forbidden { message, details }
            | AppError::NotFound { message, details }
            | AppError::Conflict { message, details }
            | AppError::AllocationExhausted { message, details }
            | AppError::RateLimited { message, details }
            | AppError::StoreUnavailable { message, details }
            | AppError::Internal { message, details } => (message, details),
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(self) -> ErrorInfo {
        let (_, code) = self.status_and_code();
        let (message, details) = self.into_parts();
        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();
        let retry_after = match &self {
            AppError::RateLimited { details, .. } => details["retry_after"].as_u64(),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }
        if let Some(seconds) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation_on_code(&e) {
            return AppError::conflict("Short code already exists", json!({ "field": "code" }));
        }

        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!("Database error: {}", e);
        AppError::store_unavailable("Database unavailable", json!({}))
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        tracing::error!("Cache error: {}", e);
        AppError::store_unavailable("Cache unavailable", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Validation failed", json!(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::bad_request("x", json!({})), StatusCode::BAD_REQUEST),
            (AppError::unauthorized("x", json!({})), StatusCode::UNAUTHORIZED),
            (AppError::forbidden("x", json!({})), StatusCode::FORBIDDEN),
            (AppError::not_found("x", json!({})), StatusCode::NOT_FOUND),
            (AppError::conflict("x", json!({})), StatusCode::CONFLICT),
            (
                AppError::allocation_exhausted("x", json!({})),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::rate_limited("x", json!({})),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                AppError::store_unavailable("x", json!({})),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::internal("x", json!({})),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_error_info_keeps_message() {
        let info = AppError::not_found("Link not found", json!({ "code": "abc" })).to_error_info();
        assert_eq!(info.code, "not_found");
        assert_eq!(info.message, "Link not found");
        assert_eq!(info.details["code"], "abc");
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = AppError::unauthorized("Unauthorized", json!({})).into_response();
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response =
            AppError::rate_limited("Too many requests", json!({ "retry_after": 17 })).into_response();
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "17");
    }

    #[test]
    fn test_cache_error_maps_to_store_unavailable() {
        let err: AppError = CacheError::OperationError("boom".to_string()).into();
        assert!(matches!(err, AppError::StoreUnavailable { .. }));
    }
}
