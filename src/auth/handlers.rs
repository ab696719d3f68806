//! Authentication handlers

use axum::extract::{rejection::JsonRejection, Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{LoginRequest, LoginResponse, ValidateTokenRequest, ValidateTokenResponse};
use super::service::AuthService;
use crate::common::{ApiError, AppState, ValidationResult};

/// POST /api/auth/login
/// Authenticates an admin with email and password
///
/// # Request Body
/// ```json
/// { "email": "admin@bsapphire.com", "password": "..." }
/// ```
///
/// # Response
/// ```json
/// { "success": true, "token": "<bearer token>", "user": { "id": "1", "email": "...", "name": "...", "role": "admin" } }
/// ```
pub async fn login_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut validation = ValidationResult::new();
    validation.require("email", payload.email.as_deref(), "Email is required");
    validation.require("password", payload.password.as_deref(), "Password is required");
    if !validation.is_valid {
        return Err(ApiError::ValidationError(
            "Email and password are required".to_string(),
        ));
    }

    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let service = AuthService::new(state.db.clone(), state.tokens.clone());
    let (token, user) = service.login(&email, &password).await?;

    Ok(Json(LoginResponse {
        success: true,
        token,
        user,
    }))
}

/// POST /api/auth/validate
/// Checks a bearer token and returns the current admin profile
///
/// Expiry is not extended.
pub async fn validate_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    payload: Result<Json<ValidateTokenRequest>, JsonRejection>,
) -> Result<Json<ValidateTokenResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let token = payload
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::ValidationError("Token is required".to_string()))?;

    let service = AuthService::new(state.db.clone(), state.tokens.clone());
    let user = service.validate_token(&token).await?;

    Ok(Json(ValidateTokenResponse {
        success: true,
        user,
    }))
}

/// POST /api/auth/logout
/// Tokens are held by the client, so logout only acknowledges the request.
/// A discarded token remains valid until it expires.
pub async fn logout_handler() -> Json<serde_json::Value> {
    info!("Admin logout requested");
    Json(serde_json::json!({
        "success": true,
        "message": "Logout successful"
    }))
}
