//! Handler for per-link click statistics.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::api::dto::stats::{StatsQueryParams, StatsResponse};
use crate::domain::entities::{Actor, total_clicks};
use crate::error::AppError;
use crate::state::AppState;

/// Returns daily click counts for a link.
///
/// # Endpoint
///
/// `GET /api/links/{id}/stats?from=2026-01-01&to=2026-01-31`
///
/// # Query Parameters
///
/// - `from` (optional): First day, inclusive (default: 29 days before `to`)
/// - `to` (optional): Last day, inclusive (default: today, UTC)
///
/// # Response
///
/// ```json
/// {
///   "id": 1,
///   "code": "aZ3kP9qX",
///   "total": 7,
///   "items": [ { "day": "2026-01-02", "clicks": 7 } ]
/// }
/// ```
///
/// Days without clicks are omitted.
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist.
/// Returns 403 Forbidden if the caller is neither owner nor admin.
/// Returns 400 Bad Request for an inverted or oversized range.
pub async fn link_stats_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    Query(params): Query<StatsQueryParams>,
) -> Result<Json<StatsResponse>, AppError> {
    let link = state.link_service.get(id, &actor).await?;

    let items = state
        .stats_service
        .daily_clicks(link.id, params.from, params.to)
        .await?;

    Ok(Json(StatsResponse {
        id: link.id,
        code: link.code,
        total: total_clicks(&items),
        items,
    }))
}
