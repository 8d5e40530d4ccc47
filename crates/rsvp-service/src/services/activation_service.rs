use crate::crypto;
use crate::errors::RsvpError;
use crate::models::{ActivateRequest, ActivationLookupResponse};
use crate::repositories::{accounts, activations};
use crate::services::validation::validate_password;
use sqlx::PgPool;
use tracing::{info, instrument};

fn unknown_token() -> RsvpError {
    RsvpError::NotFound("Activation not found".to_string())
}

/// Who an activation link belongs to, for greeting on the activation page.
pub async fn lookup(pool: &PgPool, token: &str) -> Result<ActivationLookupResponse, RsvpError> {
    let activation = activations::get_by_token(pool, token)
        .await?
        .ok_or_else(unknown_token)?;

    let account = accounts::get_by_id(pool, activation.account_id)
        .await?
        .ok_or_else(unknown_token)?;

    Ok(ActivationLookupResponse {
        email: account.email,
        first_name: account.first_name,
    })
}

/// Set the password, activate the account and consume the token.
#[instrument(skip_all, name = "rsvp.services.activation.activate")]
pub async fn activate(
    pool: &PgPool,
    bcrypt_cost: u32,
    token: &str,
    request: ActivateRequest,
) -> Result<(), RsvpError> {
    validate_password(&request.password, &request.confirm_password)?;

    let mut tx = pool.begin().await?;

    let activation = activations::take(&mut *tx, token)
        .await?
        .ok_or_else(unknown_token)?;

    let password_hash = crypto::hash_password(&request.password, bcrypt_cost)?;
    accounts::activate(&mut *tx, activation.account_id, &password_hash).await?;

    tx.commit().await?;

    info!(
        target: "rsvp.services.activation",
        account_id = %activation.account_id,
        "Account activated"
    );

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::AccountType;
    use crate::services::testing::TEST_BCRYPT_COST;

    fn request(password: &str, confirm: &str) -> ActivateRequest {
        ActivateRequest {
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_lookup_and_activate(pool: PgPool) -> Result<(), RsvpError> {
        let account =
            accounts::create(&pool, "Ivy", "G", "ivy@example.com", AccountType::Invitee).await?;
        activations::create(&pool, account.id, "TokenTokenTokenTokenTokenToken12").await?;

        let found = lookup(&pool, "TokenTokenTokenTokenTokenToken12").await?;
        assert_eq!(found.email, "ivy@example.com");
        assert_eq!(found.first_name, "Ivy");

        activate(
            &pool,
            TEST_BCRYPT_COST,
            "TokenTokenTokenTokenTokenToken12",
            request("correct horse", "correct horse"),
        )
        .await?;

        let activated = accounts::get_by_id(&pool, account.id).await?.unwrap();
        assert!(activated.activated);
        assert!(crypto::verify_password(
            "correct horse",
            activated.password_hash.as_deref().unwrap()
        )?);

        // Consumed.
        assert!(matches!(
            lookup(&pool, "TokenTokenTokenTokenTokenToken12").await,
            Err(RsvpError::NotFound(_))
        ));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_activate_validation(pool: PgPool) -> Result<(), RsvpError> {
        let account =
            accounts::create(&pool, "Ivy", "G", "ivy@example.com", AccountType::Invitee).await?;
        activations::create(&pool, account.id, "abc").await?;

        for (password, confirm) in [("", ""), ("longenough", "different"), ("short", "short")] {
            let result = activate(&pool, TEST_BCRYPT_COST, "abc", request(password, confirm)).await;
            assert!(matches!(result, Err(RsvpError::BadRequest(_))));
        }

        // Failed attempts leave the activation in place.
        assert!(lookup(&pool, "abc").await.is_ok());

        let unknown =
            activate(&pool, TEST_BCRYPT_COST, "nope", request("longenough", "longenough")).await;
        assert!(matches!(unknown, Err(RsvpError::NotFound(_))));
        Ok(())
    }
}
