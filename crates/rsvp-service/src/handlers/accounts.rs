use crate::errors::RsvpError;
use crate::models::{AccountResponse, UpdateAccountRequest};
use crate::routes::AppState;
use crate::services::account_service;
use crate::services::auth_service::Principal;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

/// GET /api/accounts
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<AccountResponse>, RsvpError> {
    let account = account_service::get_account(&state.pool, principal.account_id).await?;
    Ok(Json(account.into()))
}

/// PUT /api/accounts
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> Result<StatusCode, RsvpError> {
    let Json(request) = payload?;

    account_service::update_account(
        &state.pool,
        state.config.bcrypt_cost,
        principal.account_id,
        request,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
