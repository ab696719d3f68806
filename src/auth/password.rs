//! Password hashing for admin accounts (bcrypt)

use thiserror::Error;

use crate::common::ApiError;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(#[source] bcrypt::BcryptError),

    #[error("stored password hash is unusable: {0}")]
    Verify(#[source] bcrypt::BcryptError),

    #[error("password worker failed: {0}")]
    Worker(String),
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalServer(err.to_string())
    }
}

/// bcrypt is CPU-bound, so both operations run on the blocking pool.
pub async fn hash_password(password: &str) -> Result<String, PasswordError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| PasswordError::Worker(e.to_string()))?
        .map_err(PasswordError::Hash)
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| PasswordError::Worker(e.to_string()))?
        .map_err(PasswordError::Verify)
}
