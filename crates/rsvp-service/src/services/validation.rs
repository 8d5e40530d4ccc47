//! Input checks shared by the services.

use crate::errors::RsvpError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Trimmed value, or 400 naming the field when blank.
pub fn require_non_blank(value: &str, field: &str) -> Result<String, RsvpError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RsvpError::BadRequest(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trimmed, syntactically valid email address.
pub fn validate_email(value: &str) -> Result<String, RsvpError> {
    let email = require_non_blank(value, "Email")?;
    email
        .parse::<lettre::Address>()
        .map_err(|_| RsvpError::BadRequest("Email is not a valid address".to_string()))?;
    Ok(email)
}

/// Password must be present, at least eight characters, and confirmed.
pub fn validate_password(password: &str, confirm_password: &str) -> Result<(), RsvpError> {
    if password.trim().is_empty() {
        return Err(RsvpError::BadRequest("Password is required".to_string()));
    }
    if password != confirm_password {
        return Err(RsvpError::BadRequest("Passwords do not match".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(RsvpError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}
