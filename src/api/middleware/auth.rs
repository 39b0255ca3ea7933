//! Resolves `Authorization: Bearer <token>` to the [`Actor`] a request acts as.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::entities::Actor;
use crate::{error::AppError, state::AppState};

/// Rejects the request with 401 unless it carries an active token, then
/// stores the resolved [`Actor`] in the request extensions.
///
/// Installed with `route_layer` on `/api`, so unmatched paths still 404
/// instead of asking for credentials.
pub async fn layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = bearer_token(&mut parts).await?;
    let actor: Actor = state.auth_service.authenticate(&token).await?;
    parts.extensions.insert(actor);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

async fn bearer_token(parts: &mut Parts) -> Result<String, AppError> {
    match AuthBearer::from_request_parts(parts, &()).await {
        Ok(AuthBearer(token)) => Ok(token),
        Err(_) => Err(AppError::unauthorized(
            "Unauthorized",
            json!({ "reason": "Authorization header is missing or invalid" }),
        )),
    }
}
