//! HTTP request/response tracing middleware.

use axum::{extract::MatchedPath, http::Request};
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

/// Span factory naming requests by their route template.
///
/// `/r/{code}` is recorded instead of the concrete path so redirect spans
/// group together; the concrete path stays available as `uri`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteSpan;

impl<B> MakeSpan<B> for RouteSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str)
            .unwrap_or("unmatched");

        tracing::info_span!(
            "request",
            method = %request.method(),
            route,
            uri = %request.uri().path(),
        )
    }
}

/// Creates a tracing middleware for HTTP requests.
///
/// # Logging Behavior
///
/// - One `INFO` span per request with method, route template and path
/// - Response logged at `INFO` with status and latency in milliseconds
/// - 5xx responses additionally logged at `ERROR`
///
/// # Example Logs
///
/// ```text
/// INFO request{method=GET route=/r/{code} uri=/r/aZ3kP9qX}: finished processing request latency=2 ms status=302
/// INFO request{method=POST route=/api/links uri=/api/links}: finished processing request latency=9 ms status=201
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RouteSpan> {
    TraceLayer::new_for_http()
        .make_span_with(RouteSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(DefaultOnFailure::new().level(Level::ERROR))
}
