//! Attendant repository.

use crate::errors::RsvpError;
use crate::models::{Attendant, AttendantReportRow, MealCountRow, ResponseStatus};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create(
    pool: &PgPool,
    invitation_id: Uuid,
    name: &str,
    response_status: ResponseStatus,
    meal_option_id: Option<Uuid>,
) -> Result<Attendant, RsvpError> {
    sqlx::query_as::<_, Attendant>(
        r#"
        INSERT INTO attendants (invitation_id, name, response_status, meal_option_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, invitation_id, name, response_status, meal_option_id, created_at, updated_at
        "#,
    )
    .bind(invitation_id)
    .bind(name)
    .bind(response_status)
    .bind(meal_option_id)
    .fetch_one(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to create attendant: {}", e)))
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Attendant>, RsvpError> {
    sqlx::query_as::<_, Attendant>(
        r#"
        SELECT id, invitation_id, name, response_status, meal_option_id, created_at, updated_at
        FROM attendants
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to fetch attendant: {}", e)))
}

/// Attendants of one invitation in the order they were added.
pub async fn list_by_invitation(
    pool: &PgPool,
    invitation_id: Uuid,
) -> Result<Vec<Attendant>, RsvpError> {
    sqlx::query_as::<_, Attendant>(
        r#"
        SELECT id, invitation_id, name, response_status, meal_option_id, created_at, updated_at
        FROM attendants
        WHERE invitation_id = $1
        ORDER BY created_at, name
        "#,
    )
    .bind(invitation_id)
    .fetch_all(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to list attendants: {}", e)))
}

/// Change the fields that are present.
pub async fn update_details(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    response_status: Option<ResponseStatus>,
    meal_option_id: Option<Uuid>,
) -> Result<Attendant, RsvpError> {
    sqlx::query_as::<_, Attendant>(
        r#"
        UPDATE attendants
        SET name = COALESCE($2, name),
            response_status = COALESCE($3, response_status),
            meal_option_id = COALESCE($4, meal_option_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, invitation_id, name, response_status, meal_option_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(response_status)
    .bind(meal_option_id)
    .fetch_one(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to update attendant: {}", e)))
}

/// Record an RSVP answer; the meal choice is replaced, `None` clears it.
pub async fn set_response(
    pool: &PgPool,
    id: Uuid,
    response_status: ResponseStatus,
    meal_option_id: Option<Uuid>,
) -> Result<Attendant, RsvpError> {
    sqlx::query_as::<_, Attendant>(
        r#"
        UPDATE attendants
        SET response_status = $2, meal_option_id = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING id, invitation_id, name, response_status, meal_option_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(response_status)
    .bind(meal_option_id)
    .fetch_one(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to record response: {}", e)))
}

/// Delete an attendant of the given invitation. Returns false if no such attendant.
pub async fn delete(pool: &PgPool, invitation_id: Uuid, id: Uuid) -> Result<bool, RsvpError> {
    let result = sqlx::query("DELETE FROM attendants WHERE id = $1 AND invitation_id = $2")
        .bind(id)
        .bind(invitation_id)
        .execute(pool)
        .await
        .map_err(|e| RsvpError::Database(format!("Failed to delete attendant: {}", e)))?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_by_status(pool: &PgPool, status: ResponseStatus) -> Result<i64, RsvpError> {
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM attendants WHERE response_status = $1")
            .bind(status)
            .fetch_one(pool)
            .await
            .map_err(|e| RsvpError::Database(format!("Failed to count attendants: {}", e)))?;

    Ok(count.0)
}

/// Number of attendants per meal option, including options nobody chose.
pub async fn meal_counts(pool: &PgPool) -> Result<Vec<MealCountRow>, RsvpError> {
    sqlx::query_as::<_, MealCountRow>(
        r#"
        SELECT m.name, COUNT(a.id) AS count
        FROM meal_options m
        LEFT JOIN attendants a ON a.meal_option_id = m.id
        GROUP BY m.id
        ORDER BY m.name
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to count meals: {}", e)))
}

/// Every attendant with party and meal names, sorted by party then attendant name.
pub async fn report_rows(pool: &PgPool) -> Result<Vec<AttendantReportRow>, RsvpError> {
    sqlx::query_as::<_, AttendantReportRow>(
        r#"
        SELECT i.name AS party, a.name, a.response_status, m.name AS meal
        FROM attendants a
        JOIN invitations i ON i.id = a.invitation_id
        LEFT JOIN meal_options m ON m.id = a.meal_option_id
        ORDER BY i.name, a.name
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to load attendant report: {}", e)))
}
