//! Event configuration repository.

use crate::errors::RsvpError;
use crate::models::EventConfig;
use sqlx::{PgExecutor, PgPool};

/// All configuration rows, sorted by key.
pub async fn list(pool: &PgPool) -> Result<Vec<EventConfig>, RsvpError> {
    sqlx::query_as::<_, EventConfig>(
        r#"
        SELECT id, config_key, value, display_type, updated_at
        FROM event_configs
        ORDER BY config_key
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to list event configs: {}", e)))
}

/// Value of a single key, if the row exists.
pub async fn get_value(pool: &PgPool, key: &str) -> Result<Option<String>, RsvpError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT value FROM event_configs WHERE config_key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await
            .map_err(|e| RsvpError::Database(format!("Failed to fetch event config: {}", e)))?;

    Ok(row.map(|(value,)| value))
}

/// Insert or replace a value.
pub async fn upsert<'e, E>(
    executor: E,
    key: &str,
    value: &str,
    display_type: &str,
) -> Result<(), RsvpError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO event_configs (config_key, value, display_type)
        VALUES ($1, $2, $3)
        ON CONFLICT (config_key)
        DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(display_type)
    .execute(executor)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to save event config: {}", e)))?;

    Ok(())
}
