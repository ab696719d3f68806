//! Authentication routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/login` - Email/password login
/// - `POST /api/auth/validate` - Validate a bearer token
/// - `POST /api/auth/logout` - Logout (client-side token removal)
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login_handler))
        .route("/api/auth/validate", post(handlers::validate_handler))
        .route("/api/auth/logout", post(handlers::logout_handler))
}
