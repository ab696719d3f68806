//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Bearer token claims
///
/// `iat` and `exp` are Unix seconds; `exp` is `iat` plus the configured TTL.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Admin user database model
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct AdminUser {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub last_login: Option<String>,
}

/// Public view of an admin returned by login and validate
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdminProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<&AdminUser> for AdminProfile {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ValidateTokenRequest {
    pub token: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: AdminProfile,
}

#[derive(Serialize, Debug)]
pub struct ValidateTokenResponse {
    pub success: bool,
    pub user: AdminProfile,
}
