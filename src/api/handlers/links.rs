//! Handlers for link management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkListResponse, LinkResponse, UpdateLinkRequest};
use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::domain::entities::{Actor, Link};
use crate::error::AppError;
use crate::state::AppState;

fn to_response(state: &AppState, link: Link) -> LinkResponse {
    let short_url = state.link_service.short_url(&link.code);
    LinkResponse::new(link, short_url)
}

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/some/long/path",
///   "expires_at": "2026-12-31T23:59:59Z"   // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 1,
///   "code": "aZ3kP9qX",
///   "short_url": "http://localhost:3000/r/aZ3kP9qX",
///   "original_url": "https://example.com/some/long/path",
///   "is_enabled": true,
///   "expires_at": "2026-12-31T23:59:59Z",
///   "created_at": "2026-10-16T09:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is invalid.
/// Returns 429 Too Many Requests when the per-actor limit is hit.
/// Returns 503 Service Unavailable if no free code could be allocated.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create(&actor, &payload.original_url, payload.expires_at)
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, link))))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&page_size=20`
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are out of range.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let (page, page_size) = params
        .validate_and_get_page()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let (links, total) = state
        .link_service
        .list(&actor, i64::from(page), i64::from(page_size))
        .await?;

    Ok(Json(LinkListResponse {
        pagination: PaginationMeta::new(page, page_size, total),
        items: links
            .into_iter()
            .map(|link| to_response(&state, link))
            .collect(),
    }))
}

/// Returns one link.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist.
/// Returns 403 Forbidden if the caller is neither owner nor admin.
pub async fn get_link_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get(id, &actor).await?;
    Ok(Json(to_response(&state, link)))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// # Request Body
///
/// All fields are optional. Only provided fields are changed.
///
/// ```json
/// {
///   "is_enabled": false,
///   "expires_at": "2026-12-31T23:59:59Z"   // null to clear
/// }
/// ```
///
/// # Cache
///
/// The cached redirect for this link is invalidated after the update is
/// stored, so the next redirect sees the new state.
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist.
/// Returns 403 Forbidden if the caller is neither owner nor admin.
pub async fn update_link_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state
        .link_service
        .update(id, &actor, payload.into())
        .await?;

    Ok(Json(to_response(&state, link)))
}
