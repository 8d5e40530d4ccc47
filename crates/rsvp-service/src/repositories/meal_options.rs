//! Meal option repository.
//!
//! Deleting a meal option sets `attendants.meal_option_id` to NULL through the
//! foreign key.

use crate::errors::RsvpError;
use crate::models::MealOption;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create(pool: &PgPool, name: &str, description: &str) -> Result<MealOption, RsvpError> {
    sqlx::query_as::<_, MealOption>(
        r#"
        INSERT INTO meal_options (name, description)
        VALUES ($1, $2)
        RETURNING id, name, description, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to create meal option: {}", e)))
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<MealOption>, RsvpError> {
    sqlx::query_as::<_, MealOption>(
        r#"
        SELECT id, name, description, created_at, updated_at
        FROM meal_options
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to fetch meal option: {}", e)))
}

pub async fn list(pool: &PgPool) -> Result<Vec<MealOption>, RsvpError> {
    sqlx::query_as::<_, MealOption>(
        r#"
        SELECT id, name, description, created_at, updated_at
        FROM meal_options
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to list meal options: {}", e)))
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    description: &str,
) -> Result<Option<MealOption>, RsvpError> {
    sqlx::query_as::<_, MealOption>(
        r#"
        UPDATE meal_options
        SET name = $2, description = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, description, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .fetch_optional(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to update meal option: {}", e)))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, RsvpError> {
    let result = sqlx::query("DELETE FROM meal_options WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| RsvpError::Database(format!("Failed to delete meal option: {}", e)))?;

    Ok(result.rows_affected() > 0)
}
