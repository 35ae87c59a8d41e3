use anyhow::Context as _;
use sha2::{Digest, Sha256};

use warden_domain::user::PASSWORD_MAX_BYTES;

use crate::error::AuthServiceError;

/// bcrypt hashing on the blocking pool.
///
/// Inputs past [`PASSWORD_MAX_BYTES`] are refused rather than truncated:
/// `hash` fails with `InvalidInput` and `verify` never matches.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    pub cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String, AuthServiceError> {
        if password.len() > PASSWORD_MAX_BYTES {
            return Err(AuthServiceError::InvalidInput(format!(
                "password must be at most {PASSWORD_MAX_BYTES} bytes"
            )));
        }
        let password = password.to_owned();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("join password hash task")?
            .context("hash password")?;
        Ok(hash)
    }

    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthServiceError> {
        if password.len() > PASSWORD_MAX_BYTES {
            return Ok(false);
        }
        let password = password.to_owned();
        let hash = hash.to_owned();
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .context("join password verify task")?
            .context("verify password")?;
        Ok(ok)
    }
}

/// SHA-256 hex of a refresh token, as stored on the user row.
pub fn hash_refresh_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
