//! Password hashing and random token generation.
//!
//! All randomness comes from `ring::rand::SystemRandom`. Characters are drawn by
//! rejection sampling so every symbol of an alphabet is equally likely.

use crate::config::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::errors::RsvpError;
use ring::rand::{SecureRandom, SystemRandom};
use tracing::instrument;

/// Alphabet for invitation codes (lowercase, easy to read aloud).
pub const INVITATION_CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Alphabet for session and activation tokens.
pub const TOKEN_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const INVITATION_CODE_LENGTH: usize = 6;

pub const ACTIVATION_TOKEN_LENGTH: usize = 32;

pub const SESSION_TOKEN_LENGTH: usize = 64;

/// Bcrypt hash of a random string, verified against when the account is unknown
/// so that login latency does not reveal which emails are registered.
pub const DUMMY_PASSWORD_HASH: &str =
    "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Hash a password with bcrypt.
///
/// Rejects cost factors outside 10-14 even though configuration already
/// validates them.
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<String, RsvpError> {
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(RsvpError::Crypto(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    bcrypt::hash(password, cost)
        .map_err(|e| RsvpError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a bcrypt hash.
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, RsvpError> {
    bcrypt::verify(password, hash)
        .map_err(|e| RsvpError::Crypto(format!("Password verification failed: {}", e)))
}

/// Draw `len` characters uniformly from `alphabet`.
pub fn random_string(alphabet: &[u8], len: usize) -> Result<String, RsvpError> {
    if alphabet.is_empty() || alphabet.len() > 256 {
        return Err(RsvpError::Crypto(format!(
            "Unsupported alphabet size: {}",
            alphabet.len()
        )));
    }

    // Largest multiple of the alphabet size that fits in a byte; bytes at or
    // above it are discarded to avoid modulo bias.
    let limit = 256 - (256 % alphabet.len());
    let rng = SystemRandom::new();
    let mut out = String::with_capacity(len);
    let mut buf = [0u8; 64];

    while out.len() < len {
        rng.fill(&mut buf)
            .map_err(|e| RsvpError::Crypto(format!("Random bytes generation failed: {}", e)))?;

        for &byte in buf.iter() {
            if out.len() == len {
                break;
            }
            let value = usize::from(byte);
            if value >= limit {
                continue;
            }
            let ch = alphabet
                .get(value % alphabet.len())
                .ok_or_else(|| RsvpError::Crypto("Alphabet index out of range".to_string()))?;
            out.push(char::from(*ch));
        }
    }

    Ok(out)
}

/// Generate a 6-character invitation code.
pub fn generate_invitation_code() -> Result<String, RsvpError> {
    random_string(INVITATION_CODE_ALPHABET, INVITATION_CODE_LENGTH)
}

/// Generate a 32-character activation token.
pub fn generate_activation_token() -> Result<String, RsvpError> {
    random_string(TOKEN_ALPHABET, ACTIVATION_TOKEN_LENGTH)
}

/// Generate a 64-character session token.
pub fn generate_session_token() -> Result<String, RsvpError> {
    random_string(TOKEN_ALPHABET, SESSION_TOKEN_LENGTH)
}
