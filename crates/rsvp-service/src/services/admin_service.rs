use crate::errors::RsvpError;
use crate::models::{AccountType, AdminSummary};
use crate::repositories::accounts;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

pub async fn list_admins(pool: &PgPool) -> Result<Vec<AdminSummary>, RsvpError> {
    let admins = accounts::list_by_type(pool, AccountType::Admin).await?;
    Ok(admins.into_iter().map(AdminSummary::from).collect())
}

/// Fetch one administrator; invitee ids are reported as missing.
pub async fn get_admin(pool: &PgPool, id: Uuid) -> Result<AdminSummary, RsvpError> {
    match accounts::get_by_id(pool, id).await? {
        Some(account) if account.account_type == AccountType::Admin => Ok(account.into()),
        _ => Err(RsvpError::NotFound("Administrator not found".to_string())),
    }
}

#[instrument(skip_all, name = "rsvp.services.admin.delete", fields(admin_id = %id))]
pub async fn delete_admin(pool: &PgPool, caller_id: Uuid, id: Uuid) -> Result<(), RsvpError> {
    get_admin(pool, id).await?;

    if caller_id == id {
        return Err(RsvpError::BadRequest(
            "Administrators cannot delete their own account".to_string(),
        ));
    }

    if !accounts::delete(pool, id).await? {
        return Err(RsvpError::NotFound("Administrator not found".to_string()));
    }

    info!(target: "rsvp.services.admin", "Administrator deleted");
    Ok(())
}
