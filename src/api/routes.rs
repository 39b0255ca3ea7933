//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_link_handler, get_link_handler, link_stats_handler, list_links_handler,
    update_link_handler,
};
use crate::api::middleware::{auth, rate_limit};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /links`            - Create a short link (per-actor rate limit)
/// - `GET    /links`            - List own links (paginated)
/// - `GET    /links/{id}`       - Fetch one link
/// - `PATCH  /links/{id}`       - Enable/disable a link or change its expiry
/// - `GET    /links/{id}/stats` - Daily click counts
pub fn protected_routes(state: &AppState) -> Router<AppState> {
    let create_limit = middleware::from_fn_with_state(
        (state.clone(), state.settings.create_link_limit),
        rate_limit::layer,
    );

    Router::new()
        .route(
            "/links",
            post(create_link_handler)
                .layer(create_limit)
                .get(list_links_handler),
        )
        .route(
            "/links/{id}",
            get(get_link_handler).patch(update_link_handler),
        )
        .route("/links/{id}/stats", get(link_stats_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
}
