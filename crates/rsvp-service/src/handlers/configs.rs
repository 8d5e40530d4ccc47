use crate::errors::RsvpError;
use crate::models::{ConfigEntry, ConfigUpdate};
use crate::routes::AppState;
use crate::services::auth_service::Principal;
use crate::services::config_service;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// GET /api/configs
pub async fn list_configs(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<ConfigEntry>>, RsvpError> {
    principal.require_admin()?;
    Ok(Json(config_service::list_configs(&state.pool).await?))
}

/// POST /api/configs
pub async fn update_configs(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<Vec<ConfigUpdate>>, JsonRejection>,
) -> Result<StatusCode, RsvpError> {
    principal.require_admin()?;
    let Json(updates) = payload?;
    config_service::update_configs(&state.pool, updates).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/event
pub async fn event_details(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, String>>, RsvpError> {
    Ok(Json(config_service::event_details(&state.pool).await?))
}
