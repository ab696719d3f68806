// src/main.rs
use axum::{
    extract::Extension,
    http::{header, HeaderValue, Method},
    middleware, Router,
};
use chrono::Duration;
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod candidates;
mod common;
mod cv_files;
mod health;
mod logging_middleware;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use auth::token::TokenCodec;
use auth::AuthService;
use common::config::AppConfig;
use common::dev_mode::{apply_cli_override, print_dev_mode_status, DevModeConfig};
use common::AppState;

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

/// Assembles every route with the shared state and middleware layers.
///
/// CORS is only installed when at least one origin is configured.
pub fn build_router(app_state: AppState, cors_origins: &[String]) -> Router {
    let shared = Arc::new(RwLock::new(app_state));

    let app = Router::new()
        // Health check
        .merge(health::health_routes())
        // Admin login, token validation, logout
        .merge(auth::auth_routes())
        // Questionnaire submission and the review dashboard
        .merge(candidates::candidates_routes())
        // CV upload and download
        .merge(cv_files::cv_files_routes())
        // Add request/response body logging in debug mode
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared));

    let app = if cors_origins.is_empty() {
        app
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        app.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true),
        )
    };

    app.layer(TraceLayer::new_for_http())
}

/// Creates the parent directory of a file-backed SQLite URL.
async fn ensure_database_dir(database_url: &str) -> std::io::Result<()> {
    if let Some(path_part) = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
    {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env()?;

    if config.jwt_secret == "replace_with_strong_secret" {
        warn!("JWT_SECRET is not set; using the placeholder secret");
    }

    // ========================================================================
    // DEV MODE CONFIGURATION
    // ========================================================================

    let dev_mode = apply_cli_override(DevModeConfig::from_env());
    print_dev_mode_status(&dev_mode);

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    ensure_database_dir(&config.database_url).await?;

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    if config.reset_db {
        warn!("RESET_DB is set; dropping all tables before migrating");
    }
    common::migrations::run_migrations(&pool, config.reset_db).await?;
    info!("Database migrations complete");

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let tokens = TokenCodec::new(&config.jwt_secret, Duration::hours(config.token_ttl_hours));

    match &config.admin_bootstrap {
        Some(bootstrap) => {
            let auth_service = AuthService::new(pool.clone(), tokens.clone());
            if let Err(e) = auth_service.ensure_bootstrap_admin(bootstrap).await {
                warn!(error = %e, "Failed to create bootstrap admin");
            }
        }
        None => info!("No bootstrap admin configured"),
    }

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        db: pool,
        tokens,
        dev_mode,
    };

    let app = build_router(app_state, &config.cors_origins);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
