//! Public registration and activation endpoints.

use crate::errors::RsvpError;
use crate::models::{ActivateRequest, ActivationLookupResponse, RegisterInviteeRequest};
use crate::routes::AppState;
use crate::services::{activation_service, registration_service};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// POST /api/activations
///
/// Registers an invitee against an invitation code. The activation link is
/// emailed; the response carries no token.
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterInviteeRequest>, JsonRejection>,
) -> Result<StatusCode, RsvpError> {
    let Json(request) = payload?;
    registration_service::register_invitee(&state.pool, &state.mailer, request).await?;
    Ok(StatusCode::CREATED)
}

/// GET /api/activations/:token
pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<ActivationLookupResponse>, RsvpError> {
    Ok(Json(activation_service::lookup(&state.pool, &token).await?))
}

/// PUT /api/activations/:token
pub async fn activate(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    payload: Result<Json<ActivateRequest>, JsonRejection>,
) -> Result<StatusCode, RsvpError> {
    let Json(request) = payload?;
    activation_service::activate(&state.pool, state.config.bcrypt_cost, &token, request).await?;
    Ok(StatusCode::NO_CONTENT)
}
