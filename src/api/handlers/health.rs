//! `GET /health`: probes the link store, the redirect cache and the click queue.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{HealthResponse, OverallStatus, Probe, Probes};
use crate::state::AppState;

/// Answers 200 when every probe passes and 503 otherwise. The body has the
/// same shape either way:
///
/// ```json
/// {
///   "status": "degraded",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "cache": { "status": "error", "message": "Cache unreachable" },
///     "click_queue": { "status": "ok", "message": "9998 slots free" }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let sender = &state.click_sender;
    let checks = Probes {
        database: Probe::from_outcome(
            state.links.health_check().await,
            "Connected",
            "Database query failed",
        ),
        cache: Probe::from_outcome(
            state.cache.health_check().await,
            "Cache reachable",
            "Cache unreachable",
        ),
        click_queue: Probe::from_outcome(
            !sender.is_closed(),
            format!("{} slots free", sender.capacity()),
            "Click queue is closed",
        ),
    };

    let (code, status) = if checks.all_passed() {
        (StatusCode::OK, OverallStatus::Healthy)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, OverallStatus::Degraded)
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }),
    )
}
