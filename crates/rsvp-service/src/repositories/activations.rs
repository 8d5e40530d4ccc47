//! Activation token repository.

use crate::errors::RsvpError;
use crate::models::Activation;
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn create<'e, E>(executor: E, account_id: Uuid, token: &str) -> Result<Activation, RsvpError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Activation>(
        r#"
        INSERT INTO activations (token, account_id)
        VALUES ($1, $2)
        RETURNING id, token, account_id, created_at
        "#,
    )
    .bind(token)
    .bind(account_id)
    .fetch_one(executor)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to create activation: {}", e)))
}

pub async fn get_by_token<'e, E>(executor: E, token: &str) -> Result<Option<Activation>, RsvpError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Activation>(
        r#"
        SELECT id, token, account_id, created_at
        FROM activations
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(executor)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to fetch activation: {}", e)))
}

/// Remove an activation by token, returning it if it existed.
///
/// Used to consume a token exactly once.
pub async fn take<'e, E>(executor: E, token: &str) -> Result<Option<Activation>, RsvpError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Activation>(
        r#"
        DELETE FROM activations
        WHERE token = $1
        RETURNING id, token, account_id, created_at
        "#,
    )
    .bind(token)
    .fetch_optional(executor)
    .await
    .map_err(|e| RsvpError::Database(format!("Failed to consume activation: {}", e)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::AccountType;
    use crate::repositories::accounts;
    use sqlx::PgPool;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_take_consumes_once(pool: PgPool) -> Result<(), RsvpError> {
        let account = accounts::create(&pool, "A", "B", "a@example.com", AccountType::Invitee).await?;
        create(&pool, account.id, "tok123").await?;

        assert!(get_by_token(&pool, "tok123").await?.is_some());
        let taken = take(&pool, "tok123").await?.expect("activation exists");
        assert_eq!(taken.account_id, account.id);
        assert!(take(&pool, "tok123").await?.is_none());

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_account_delete_cascades(pool: PgPool) -> Result<(), RsvpError> {
        let account = accounts::create(&pool, "A", "B", "a@example.com", AccountType::Invitee).await?;
        create(&pool, account.id, "tok123").await?;

        accounts::delete(&pool, account.id).await?;
        assert!(get_by_token(&pool, "tok123").await?.is_none());

        Ok(())
    }
}
