//! Fixed-window rate limiting middleware.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::domain::entities::Actor;
use crate::domain::rate_limit::RateLimitPolicy;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const RESET_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Counts the request against `policy` and rejects it once the window is full.
///
/// Attach one instance per endpoint, with the endpoint's own policy:
///
/// ```rust,ignore
/// let redirect = get(redirect_handler).layer(middleware::from_fn_with_state(
///     (state.clone(), state.settings.redirect_limit),
///     rate_limit::layer,
/// ));
/// ```
///
/// # Identity
///
/// - IP scope: first `X-Forwarded-For` entry (when `BEHIND_PROXY` is set),
///   else the socket peer address
/// - User scope: the authenticated actor, else the IP, else `anonymous`.
///   Must run inside the auth layer to see the actor.
///
/// # Responses
///
/// Allowed responses carry `X-RateLimit-Limit`, `X-RateLimit-Remaining` and
/// `X-RateLimit-Reset`. Rejected requests get `429 Too Many Requests` with
/// `Retry-After`.
///
/// # Errors
///
/// Returns `503 Service Unavailable` if the counting store fails.
pub async fn layer(
    State((st, policy)): State<(AppState, RateLimitPolicy)>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(req.headers(), peer, st.settings.behind_proxy);
    let identity = policy
        .scope
        .identity(req.extensions().get::<Actor>(), ip.as_deref());

    let decision = st.rate_limiter.check(&policy, &identity).await?;

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(LIMIT_HEADER, HeaderValue::from(decision.limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(decision.remaining()));
    headers.insert(RESET_HEADER, HeaderValue::from(decision.reset_after));

    Ok(response)
}
