//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /r/{code}`
///
/// # Request Flow
///
/// 1. Per-IP rate limit (middleware)
/// 2. Resolve the code through the redirect cache, falling back to the store
/// 3. Queue a click event for the daily counter
/// 4. Return `302 Found` with `Location`
///
/// # Click Tracking
///
/// Click events are sent to a bounded channel for async processing.
/// If the queue is full, the click is dropped (fire-and-forget).
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown, disabled or expired.
/// Returns 503 Service Unavailable if the cache or store is down.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let original_url = state.redirect_resolver.resolve(&code).await?;

    match state.click_sender.try_send(ClickEvent::new(code)) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            metrics::counter!("shortlink_clicks_dropped_total", "reason" => "queue_full")
                .increment(1);
            debug!(code = %event.code, "Click queue full, dropping event");
        }
        Err(TrySendError::Closed(event)) => {
            debug!(code = %event.code, "Click queue closed, dropping event");
        }
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]).into_response())
}
