//! Session authentication for protected routes.
//!
//! Reads the opaque session token from the `X-Auth-Token` header, resolves it
//! through the session store (extending its expiry) and injects the
//! [`Principal`] and the raw [`SessionToken`] into request extensions.

use crate::errors::RsvpError;
use crate::routes::AppState;
use crate::services::auth_service::{self, Principal};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// The token the current request authenticated with.
#[derive(Clone)]
pub struct SessionToken(pub String);

/// Token from the `X-Auth-Token` header.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, RsvpError> {
    headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::debug!(target: "rsvp.middleware.auth", "Missing X-Auth-Token header");
            RsvpError::Unauthorized("Missing authentication token".to_string())
        })
}

/// Reject requests without a live session.
///
/// # Response
///
/// - Returns 401 Unauthorized if the token is missing, unknown or expired
/// - Continues with `Principal` and `SessionToken` in extensions otherwise
#[instrument(skip_all, name = "rsvp.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, RsvpError> {
    let token = extract_token(req.headers())?.to_string();

    let principal: Principal = auth_service::authenticate(
        &state.pool,
        state.sessions.as_ref(),
        state.session_ttl(),
        &token,
    )
    .await?;

    req.extensions_mut().insert(principal);
    req.extensions_mut().insert(SessionToken(token));

    Ok(next.run(req).await)
}
