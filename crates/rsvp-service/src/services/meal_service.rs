use crate::errors::RsvpError;
use crate::models::{MealOption, MealRequest};
use crate::repositories::meal_options;
use crate::services::validation::require_non_blank;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

fn meal_not_found() -> RsvpError {
    RsvpError::NotFound("Meal option not found".to_string())
}

pub async fn list_meals(pool: &PgPool) -> Result<Vec<MealOption>, RsvpError> {
    meal_options::list(pool).await
}

pub async fn get_meal(pool: &PgPool, id: Uuid) -> Result<MealOption, RsvpError> {
    meal_options::get_by_id(pool, id)
        .await?
        .ok_or_else(meal_not_found)
}

/// Create a meal option, or replace one when `id` is given.
#[instrument(skip_all, name = "rsvp.services.meal.save")]
pub async fn save_meal(pool: &PgPool, request: MealRequest) -> Result<MealOption, RsvpError> {
    let name = require_non_blank(&request.name, "Name")?;
    let description = request.description.trim();

    let meal = match request.id {
        Some(id) => meal_options::update(pool, id, &name, description)
            .await?
            .ok_or_else(meal_not_found)?,
        None => meal_options::create(pool, &name, description).await?,
    };

    info!(target: "rsvp.services.meal", meal_id = %meal.id, "Meal option saved");
    Ok(meal)
}

/// Delete a meal option; attendants who chose it are left without a meal.
#[instrument(skip_all, name = "rsvp.services.meal.delete", fields(meal_id = %id))]
pub async fn delete_meal(pool: &PgPool, id: Uuid) -> Result<(), RsvpError> {
    if !meal_options::delete(pool, id).await? {
        return Err(meal_not_found());
    }
    info!(target: "rsvp.services.meal", "Meal option deleted");
    Ok(())
}
