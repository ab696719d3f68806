//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::models::AdminProfile;
use super::service::AuthService;
use crate::common::{safe_email_log, safe_token_log, ApiError, AppState};

/// Authenticated admin extractor
///
/// Reads `Authorization: Bearer <token>`, validates the token and confirms
/// the admin is still active. Every dashboard endpoint takes one of these.
#[derive(Debug)]
pub struct AuthedAdmin {
    pub profile: AdminProfile,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        // DEV MODE: Bypass authentication completely
        if app_state.dev_mode.is_enabled() {
            let profile = app_state.dev_mode.dev_admin();
            debug!(
                email = %safe_email_log(&profile.email),
                "DEV MODE: Admin authentication bypassed"
            );
            return Ok(AuthedAdmin { profile });
        }

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                warn!("Authentication failed: missing Authorization header");
                ApiError::Unauthorized("Authentication required".to_string())
            })?;

        // Handle "Bearer <token>" format or raw token
        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();

        debug!(token = %safe_token_log(token), "Validating bearer token");

        let service = AuthService::new(app_state.db.clone(), app_state.tokens.clone());
        let profile = service.validate_token(token).await?;

        Ok(AuthedAdmin { profile })
    }
}
