use crate::errors::RsvpError;
use crate::models::StatsResponse;
use crate::routes::AppState;
use crate::services::auth_service::Principal;
use crate::services::stats_service;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

/// GET /api/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<StatsResponse>, RsvpError> {
    principal.require_admin()?;
    Ok(Json(stats_service::summary(&state.pool).await?))
}

/// GET /api/stats/attendants.csv
pub async fn attendants_csv(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, RsvpError> {
    principal.require_admin()?;
    let body = stats_service::attendant_report(&state.pool).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"attendants.csv\"",
            ),
        ],
        body,
    ))
}
