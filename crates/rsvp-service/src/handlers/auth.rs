//! Login, logout and session lookup.

use crate::errors::RsvpError;
use crate::middleware::auth::{extract_token, SessionToken};
use crate::models::LoginRequest;
use crate::routes::AppState;
use crate::services::auth_service;
use crate::sessions::Session;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use std::sync::Arc;

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Session>), RsvpError> {
    let Json(request) = payload?;

    let session = auth_service::login(
        &state.pool,
        state.sessions.as_ref(),
        state.session_ttl(),
        &request.principal,
        &request.credentials,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Result<StatusCode, RsvpError> {
    auth_service::logout(state.sessions.as_ref(), &token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/accounts/data
///
/// Public route: answers 401 itself instead of going through the auth layer,
/// and does not extend the session.
pub async fn session_data(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Session>, RsvpError> {
    let token = extract_token(&headers)?;
    let session = auth_service::current_session(state.sessions.as_ref(), token).await?;
    Ok(Json(session))
}
