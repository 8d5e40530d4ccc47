//! Attendants of an invitation.
//!
//! Listing and answering are open to admins and the invitation's owner;
//! adding, editing and removing attendants is admin only.

use crate::errors::RsvpError;
use crate::models::{AttendantRequest, AttendantResponse, RsvpRequest};
use crate::routes::AppState;
use crate::services::attendant_service;
use crate::services::auth_service::Principal;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// GET /api/invitations/:id/attendants
pub async fn list_attendants(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<AttendantResponse>>, RsvpError> {
    let Path(invitation_id) = path?;
    let attendants =
        attendant_service::list_attendants(&state.pool, &principal, invitation_id).await?;
    Ok(Json(
        attendants
            .into_iter()
            .map(AttendantResponse::from)
            .collect(),
    ))
}

/// POST /api/invitations/:id/attendants
pub async fn save_attendant(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<AttendantRequest>, JsonRejection>,
) -> Result<Json<AttendantResponse>, RsvpError> {
    let Path(invitation_id) = path?;
    principal.require_admin()?;
    let Json(request) = payload?;
    let attendant = attendant_service::save_attendant(&state.pool, invitation_id, request).await?;
    Ok(Json(attendant.into()))
}

/// PUT /api/invitations/:id/attendants/:attendant_id
pub async fn respond(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    payload: Result<Json<RsvpRequest>, JsonRejection>,
) -> Result<StatusCode, RsvpError> {
    let Path((invitation_id, attendant_id)) = path?;
    let Json(request) = payload?;
    attendant_service::respond(
        &state.pool,
        &principal,
        invitation_id,
        attendant_id,
        request,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/invitations/:id/attendants/:attendant_id
pub async fn delete_attendant(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<StatusCode, RsvpError> {
    let Path((invitation_id, attendant_id)) = path?;
    principal.require_admin()?;
    attendant_service::delete_attendant(&state.pool, invitation_id, attendant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
