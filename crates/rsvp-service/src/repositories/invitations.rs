//! Invitation repository.

use crate::errors::RsvpError;
use crate::models::{Invitation, InvitationWithCount, PendingInvitee};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const CODE_UNIQUE_CONSTRAINT: &str = "invitations_code_unique";

pub async fn code_taken(pool: &PgPool, code: &str) -> Result<bool, RsvpError> {
    let taken: (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM invitations WHERE code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await
            .map_err(|e| RsvpError::Database(format!("Failed to check invitation code: {}", e)))?;

    Ok(taken.0)
}

/// Insert an invitation with the given code.
///
/// Returns `Ok(None)` when the code is already in use, so the caller can draw
/// another one.
pub async fn insert(
    pool: &PgPool,
    name: &str,
    address: &str,
    code: &str,
) -> Result<Option<Invitation>, RsvpError> {
    let result = sqlx::query_as::<_, Invitation>(
        r#"
        INSERT INTO invitations (name, address, code)
        VALUES ($1, $2, $3)
        RETURNING id, name, address, code, account_id, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(address)
    .bind(code)
    .fetch_one(pool)
    .await;

    match result {
        Ok(invitation) => Ok(Some(invitation)),
        Err(e) => {
            let is_code_collision = e
                .as_database_error()
                .map(|db_err| {
                    db_err.is_unique_violation()
                        && db_err.constraint() == Some(CODE_UNIQUE_CONSTRAINT)
                })
                .unwrap_or(false);
            if is_code_collision {
                Ok(None)
            } else {
                Err(RsvpError::Database(format!(
                    "Failed to create invitation: {}",
                    e
                )))
            }
        }
    }
}

pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Invitation>, RsvpError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Invitation>(
        r#"
        SELECT id, name, address, code, account_id, created_at, updated_at
        FROM invitations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to fetch invitation: {}", e)))
}

/// Look up an invitation by code, ignoring case.
pub async fn get_by_code<'e, E>(executor: E, code: &str) -> Result<Option<Invitation>, RsvpError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Invitation>(
        r#"
        SELECT id, name, address, code, account_id, created_at, updated_at
        FROM invitations
        WHERE code = LOWER($1)
        "#,
    )
    .bind(code.trim())
    .fetch_optional(executor)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to fetch invitation by code: {}", e)))
}

pub async fn get_with_count(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<InvitationWithCount>, RsvpError> {
    sqlx::query_as::<_, InvitationWithCount>(
        r#"
        SELECT i.id, i.name, i.address, i.code, i.account_id,
               COUNT(a.id) AS guest_count
        FROM invitations i
        LEFT JOIN attendants a ON a.invitation_id = i.id
        WHERE i.id = $1
        GROUP BY i.id
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to fetch invitation: {}", e)))
}

/// All invitations with their attendant counts, sorted by party name.
pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<InvitationWithCount>, RsvpError> {
    sqlx::query_as::<_, InvitationWithCount>(
        r#"
        SELECT i.id, i.name, i.address, i.code, i.account_id,
               COUNT(a.id) AS guest_count
        FROM invitations i
        LEFT JOIN attendants a ON a.invitation_id = i.id
        GROUP BY i.id
        ORDER BY i.name, i.created_at
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to list invitations: {}", e)))
}

/// Update the fields that are present. The code never changes.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    address: Option<&str>,
) -> Result<Option<Invitation>, RsvpError> {
    sqlx::query_as::<_, Invitation>(
        r#"
        UPDATE invitations
        SET name = COALESCE($2, name),
            address = COALESCE($3, address),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, address, code, account_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(address)
    .fetch_optional(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to update invitation: {}", e)))
}

/// Link an unclaimed invitation to an account.
///
/// Returns false if the invitation was claimed in the meantime.
pub async fn claim<'e, E>(executor: E, id: Uuid, account_id: Uuid) -> Result<bool, RsvpError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE invitations
        SET account_id = $2, updated_at = NOW()
        WHERE id = $1 AND account_id IS NULL
        "#,
    )
    .bind(id)
    .bind(account_id)
    .execute(executor)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to claim invitation: {}", e)))?;

    Ok(result.rows_affected() == 1)
}

/// Delete an invitation, returning the deleted row.
pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<Option<Invitation>, RsvpError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Invitation>(
        r#"
        DELETE FROM invitations
        WHERE id = $1
        RETURNING id, name, address, code, account_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to delete invitation: {}", e)))
}

/// Claimed invitations whose owners are activated and still have PENDING attendants.
pub async fn pending_invitees(pool: &PgPool) -> Result<Vec<PendingInvitee>, RsvpError> {
    sqlx::query_as::<_, PendingInvitee>(
        r#"
        SELECT i.name AS invitation_name, acc.email, acc.first_name,
               COUNT(a.id) AS pending_count
        FROM invitations i
        JOIN accounts acc ON acc.id = i.account_id
        JOIN attendants a ON a.invitation_id = i.id
        WHERE a.response_status = 'PENDING' AND acc.activated
        GROUP BY i.id, acc.id
        ORDER BY i.name
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to find pending invitees: {}", e)))
}
