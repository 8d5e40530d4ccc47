//! Administrator management. Every route requires an admin caller.

use crate::errors::RsvpError;
use crate::models::{AdminSummary, CreateAdminRequest};
use crate::routes::AppState;
use crate::services::auth_service::Principal;
use crate::services::{admin_service, registration_service};
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

/// GET /api/admins
pub async fn list_admins(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<AdminSummary>>, RsvpError> {
    principal.require_admin()?;
    Ok(Json(admin_service::list_admins(&state.pool).await?))
}

/// GET /api/admins/:id
pub async fn get_admin(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AdminSummary>, RsvpError> {
    let Path(id) = path?;
    principal.require_admin()?;
    Ok(Json(admin_service::get_admin(&state.pool, id).await?))
}

/// POST /api/admins
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<CreateAdminRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AdminSummary>), RsvpError> {
    principal.require_admin()?;
    let Json(request) = payload?;

    let account = registration_service::register_admin(&state.pool, &state.mailer, request).await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// DELETE /api/admins/:id
pub async fn delete_admin(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, RsvpError> {
    let Path(id) = path?;
    principal.require_admin()?;
    admin_service::delete_admin(&state.pool, principal.account_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
