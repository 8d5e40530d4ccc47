use crate::errors::RsvpError;
use crate::models::{MealRequest, MealResponse};
use crate::routes::AppState;
use crate::services::auth_service::Principal;
use crate::services::meal_service;
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

/// GET /api/meals (any signed-in account)
pub async fn list_meals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MealResponse>>, RsvpError> {
    let meals = meal_service::list_meals(&state.pool).await?;
    Ok(Json(meals.into_iter().map(MealResponse::from).collect()))
}

/// POST /api/meals
pub async fn save_meal(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<MealRequest>, JsonRejection>,
) -> Result<Json<MealResponse>, RsvpError> {
    principal.require_admin()?;
    let Json(request) = payload?;
    Ok(Json(meal_service::save_meal(&state.pool, request).await?.into()))
}

/// GET /api/meals/:id
pub async fn get_meal(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MealResponse>, RsvpError> {
    let Path(id) = path?;
    principal.require_admin()?;
    Ok(Json(meal_service::get_meal(&state.pool, id).await?.into()))
}

/// DELETE /api/meals/:id
pub async fn delete_meal(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, RsvpError> {
    let Path(id) = path?;
    principal.require_admin()?;
    meal_service::delete_meal(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
