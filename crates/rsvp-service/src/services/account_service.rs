use crate::crypto;
use crate::errors::RsvpError;
use crate::models::{Account, UpdateAccountRequest};
use crate::repositories::accounts;
use crate::services::validation::{require_non_blank, validate_email, validate_password};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

pub async fn get_account(pool: &PgPool, account_id: Uuid) -> Result<Account, RsvpError> {
    accounts::get_by_id(pool, account_id)
        .await?
        .ok_or_else(|| RsvpError::NotFound("Account not found".to_string()))
}

/// Update the caller's own profile.
///
/// A new password is hashed only when it differs from the current one, so
/// resubmitting the same form does not pay for another bcrypt round.
#[instrument(skip_all, name = "rsvp.services.account.update", fields(account_id = %account_id))]
pub async fn update_account(
    pool: &PgPool,
    bcrypt_cost: u32,
    account_id: Uuid,
    request: UpdateAccountRequest,
) -> Result<(), RsvpError> {
    let first_name = require_non_blank(&request.first_name, "First name")?;
    let last_name = require_non_blank(&request.last_name, "Last name")?;
    let email = validate_email(&request.email)?;

    let account = get_account(pool, account_id).await?;

    if accounts::email_taken(pool, &email, Some(account_id)).await? {
        return Err(RsvpError::DuplicateEmail);
    }

    let new_hash = match request.password.as_deref() {
        Some(password) if !password.is_empty() => {
            validate_password(password, request.confirm_password.as_deref().unwrap_or(""))?;
            let unchanged = match account.password_hash.as_deref() {
                Some(current) => crypto::verify_password(password, current).unwrap_or(false),
                None => false,
            };
            if unchanged {
                None
            } else {
                Some(crypto::hash_password(password, bcrypt_cost)?)
            }
        }
        _ => None,
    };

    accounts::update_profile(
        pool,
        account_id,
        &first_name,
        &last_name,
        &email,
        new_hash.as_deref(),
    )
    .await?;

    info!(
        target: "rsvp.services.account",
        password_changed = new_hash.is_some(),
        "Account updated"
    );

    Ok(())
}
