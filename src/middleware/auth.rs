//! Session-restoring middleware.
//!
//! Verifies the bearer token and rebuilds the [`Session`] record it carries,
//! making it available to handlers as a request extension. No store lookup
//! happens here; the token is the session.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use tracing::debug;

use crate::{auth::session::Session, error::ApiError, AppState};

pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    let token = extract_bearer_token(&req).ok_or_else(|| {
        ApiError::unauthorized("Missing or malformed authorization header", "MISSING_TOKEN")
    })?;

    let session: Session = state.session_keys.verify(token).map_err(|e| {
        debug!(error = %e, "Session token rejected");
        ApiError::unauthorized("Invalid or expired session token", "INVALID_TOKEN")
    })?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
