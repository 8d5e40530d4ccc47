use crate::errors::RsvpError;
use crate::models::{InvitationRequest, InvitationResponse};
use crate::routes::AppState;
use crate::services::auth_service::Principal;
use crate::services::invitation_service;
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

/// GET /api/invitations
pub async fn list_invitations(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<InvitationResponse>>, RsvpError> {
    principal.require_admin()?;
    let invitations = invitation_service::list_invitations(&state.pool).await?;
    Ok(Json(
        invitations
            .into_iter()
            .map(InvitationResponse::from)
            .collect(),
    ))
}

/// POST /api/invitations
pub async fn save_invitation(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<InvitationRequest>, JsonRejection>,
) -> Result<Json<InvitationResponse>, RsvpError> {
    principal.require_admin()?;
    let Json(request) = payload?;
    let invitation = invitation_service::save_invitation(&state.pool, request).await?;
    Ok(Json(invitation.into()))
}

/// GET /api/invitations/:id (admins, or the invitee who claimed it)
pub async fn get_invitation(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<InvitationResponse>, RsvpError> {
    let Path(id) = path?;
    let invitation = invitation_service::get_invitation(&state.pool, &principal, id).await?;
    Ok(Json(invitation.into()))
}

/// DELETE /api/invitations/:id
pub async fn delete_invitation(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, RsvpError> {
    let Path(id) = path?;
    principal.require_admin()?;
    invitation_service::delete_invitation(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
