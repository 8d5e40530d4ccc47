//! Account repository.
//!
//! Emails are matched case-insensitively; the `accounts_email_lower_unique`
//! index enforces uniqueness on `LOWER(email)`.

use crate::errors::RsvpError;
use crate::models::{Account, AccountType};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const EMAIL_UNIQUE_INDEX: &str = "accounts_email_lower_unique";

fn map_write_error(context: &str, e: sqlx::Error) -> RsvpError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.constraint() == Some(EMAIL_UNIQUE_INDEX) {
            return RsvpError::DuplicateEmail;
        }
    }
    RsvpError::Database(format!("{}: {}", context, e))
}

/// Create an unactivated account without a password.
pub async fn create<'e, E>(
    executor: E,
    first_name: &str,
    last_name: &str,
    email: &str,
    account_type: AccountType,
) -> Result<Account, RsvpError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (first_name, last_name, email, account_type)
        VALUES ($1, $2, $3, $4)
        RETURNING
            id, first_name, last_name, email, password_hash,
            account_type, activated, created_at, updated_at
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(account_type)
    .fetch_one(executor)
    .await
    .map_err(|e| map_write_error("Failed to create account", e))
}

pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Account>, RsvpError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Account>(
        r#"
        SELECT
            id, first_name, last_name, email, password_hash,
            account_type, activated, created_at, updated_at
        FROM accounts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to fetch account by id: {}", e)))
}

pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>, RsvpError> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT
            id, first_name, last_name, email, password_hash,
            account_type, activated, created_at, updated_at
        FROM accounts
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to fetch account by email: {}", e)))
}

/// Whether `email` belongs to an account other than `exclude`.
pub async fn email_taken<'e, E>(
    executor: E,
    email: &str,
    exclude: Option<Uuid>,
) -> Result<bool, RsvpError>
where
    E: PgExecutor<'e>,
{
    let taken: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM accounts
            WHERE LOWER(email) = LOWER($1)
              AND ($2::uuid IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(email)
    .bind(exclude)
    .fetch_one(executor)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to check email: {}", e)))?;

    Ok(taken.0)
}

/// All accounts of one type, ordered by last then first name.
pub async fn list_by_type(
    pool: &PgPool,
    account_type: AccountType,
) -> Result<Vec<Account>, RsvpError> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT
            id, first_name, last_name, email, password_hash,
            account_type, activated, created_at, updated_at
        FROM accounts
        WHERE account_type = $1
        ORDER BY last_name, first_name, email
        "#,
    )
    .bind(account_type)
    .fetch_all(pool)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to list accounts: {}", e)))
}

pub async fn count_by_type(pool: &PgPool, account_type: AccountType) -> Result<i64, RsvpError> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE account_type = $1")
        .bind(account_type)
        .fetch_one(pool)
        .await
        .map_err(|e| RsvpError::Database(format!("Failed to count accounts: {}", e)))?;

    Ok(count.0)
}

/// Update names and email; replace the password hash only when one is given.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    first_name: &str,
    last_name: &str,
    email: &str,
    password_hash: Option<&str>,
) -> Result<(), RsvpError> {
    let result = sqlx::query(
        r#"
        UPDATE accounts
        SET first_name = $2,
            last_name = $3,
            email = $4,
            password_hash = COALESCE($5, password_hash),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(password_hash)
    .execute(pool)
    .await
    .map_err(|e| map_write_error("Failed to update account", e))?;

    if result.rows_affected() == 0 {
        return Err(RsvpError::NotFound("Account not found".to_string()));
    }

    Ok(())
}

/// Set the password and mark the account activated.
pub async fn activate<'e, E>(executor: E, id: Uuid, password_hash: &str) -> Result<(), RsvpError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE accounts
        SET password_hash = $2, activated = TRUE, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(password_hash)
    .execute(executor)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to activate account: {}", e)))?;

    Ok(())
}

/// Delete an account. Returns false if it did not exist.
pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, RsvpError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| RsvpError::Database(format!("Failed to delete account: {}", e)))?;

    Ok(result.rows_affected() > 0)
}
