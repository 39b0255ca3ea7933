//! Top-level router.

use axum::{Router, middleware, routing::get};

use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes::protected_routes;
use crate::state::AppState;

/// Builds the full application router.
///
/// # Layout
///
/// - `GET /r/{code}` - Public redirect, per-IP rate limit
/// - `GET /health`   - Component health
/// - `/api/*`        - Authenticated link management ([`protected_routes`])
///
/// Rate limit policies are taken from [`crate::state::Settings`] here, once,
/// and handed to each endpoint's middleware.
pub fn app_router(state: AppState) -> Router {
    let redirect_limit = middleware::from_fn_with_state(
        (state.clone(), state.settings.redirect_limit),
        rate_limit::layer,
    );

    Router::new()
        .route("/r/{code}", get(redirect_handler).layer(redirect_limit))
        .route("/health", get(health_handler))
        .nest("/api", protected_routes(&state))
        .layer(tracing::layer())
        .with_state(state)
}
