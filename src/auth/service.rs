//! Admin login, token validation and provisioning

use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use super::models::{AdminProfile, AdminUser};
use super::password::{hash_password, verify_password, PasswordError};
use super::token::TokenCodec;
use crate::common::config::AdminBootstrap;
use crate::common::error::is_unique_violation;
use crate::common::{now_timestamp, safe_email_log, ApiError};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthService {
    db: SqlitePool,
    tokens: TokenCodec,
}

impl AuthService {
    pub fn new(db: SqlitePool, tokens: TokenCodec) -> Self {
        Self { db, tokens }
    }

    /// Verifies credentials of an active admin and issues a bearer token.
    ///
    /// Unknown email, inactive account and wrong password are deliberately
    /// indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, AdminProfile), ApiError> {
        let email = email.trim().to_lowercase();

        let user = self.find_active_admin_by_email(&email).await?.ok_or_else(|| {
            warn!(email = %safe_email_log(&email), "Login failed: admin not found or inactive");
            ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
        })?;

        match verify_password(password, &user.password_hash).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(admin_id = user.id, "Login failed: password mismatch");
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(PasswordError::Verify(e)) => {
                error!(error = %e, admin_id = user.id, "Stored password hash could not be verified");
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        sqlx::query("UPDATE admin_users SET last_login = ? WHERE id = ?")
            .bind(now_timestamp())
            .bind(user.id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        let token = self.tokens.issue(&user.id.to_string())?;

        info!(
            admin_id = user.id,
            email = %safe_email_log(&user.email),
            "Admin login successful"
        );

        Ok((token, AdminProfile::from(&user)))
    }

    /// Decodes a token and re-confirms that its admin still exists and is active.
    pub async fn validate_token(&self, token: &str) -> Result<AdminProfile, ApiError> {
        let claims = self.tokens.decode(token)?;

        let admin_id: i64 = claims.sub.parse().map_err(|_| {
            warn!(subject = %claims.sub, "Token subject is not an admin id");
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })?;

        let user = self.find_active_admin_by_id(admin_id).await?.ok_or_else(|| {
            warn!(admin_id = admin_id, "Token refers to a missing or inactive admin");
            ApiError::Unauthorized("User not found or inactive".to_string())
        })?;

        debug!(admin_id = user.id, "Token validated");

        Ok(AdminProfile::from(&user))
    }

    pub async fn find_active_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>, ApiError> {
        sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE email = ? AND is_active = 1")
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn find_active_admin_by_id(&self, id: i64) -> Result<Option<AdminUser>, ApiError> {
        sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE id = ? AND is_active = 1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn create_admin(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: &str,
    ) -> Result<AdminUser, ApiError> {
        let email = email.trim().to_lowercase();
        let password_hash = hash_password(password).await?;
        let now = now_timestamp();

        let id = sqlx::query(
            r#"
            INSERT INTO admin_users (email, password_hash, name, role, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(name)
        .bind(role)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("An admin with this email already exists".to_string())
            } else {
                ApiError::DatabaseError(e)
            }
        })?
        .last_insert_rowid();

        sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    /// Creates the configured bootstrap admin unless that email is already taken.
    ///
    /// Returns whether an account was created. Existing accounts are never modified.
    pub async fn ensure_bootstrap_admin(&self, bootstrap: &AdminBootstrap) -> Result<bool, ApiError> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM admin_users WHERE email = ?")
            .bind(&bootstrap.email)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        if exists.is_some() {
            debug!(email = %safe_email_log(&bootstrap.email), "Bootstrap admin already present");
            return Ok(false);
        }

        let user = self
            .create_admin(&bootstrap.email, &bootstrap.password, &bootstrap.name, "admin")
            .await?;
        info!(
            admin_id = user.id,
            email = %safe_email_log(&user.email),
            "Bootstrap admin created"
        );
        Ok(true)
    }
}
