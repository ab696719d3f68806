// src/common/config.rs
//! Process configuration read from the environment (and `.env` via dotenv)

use std::env;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://careers.db";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0} must be set together with ADMIN_BOOTSTRAP_EMAIL")]
    IncompleteBootstrap(&'static str),
}

/// First admin account created at start-up when none exists with this email
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub cors_origins: Vec<String>,
    pub reset_db: bool,
    pub admin_bootstrap: Option<AdminBootstrap>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let token_ttl_hours = match get("TOKEN_TTL_HOURS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "TOKEN_TTL_HOURS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_TOKEN_TTL_HOURS,
        };

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let admin_bootstrap = match get("ADMIN_BOOTSTRAP_EMAIL") {
            Some(email) => {
                let password = get("ADMIN_BOOTSTRAP_PASSWORD")
                    .ok_or(ConfigError::IncompleteBootstrap("ADMIN_BOOTSTRAP_PASSWORD"))?;
                Some(AdminBootstrap {
                    email: email.trim().to_lowercase(),
                    password,
                    name: get("ADMIN_BOOTSTRAP_NAME").unwrap_or_else(|| "Admin User".to_string()),
                })
            }
            None => None,
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            port,
            jwt_secret: get("JWT_SECRET")
                .unwrap_or_else(|| "replace_with_strong_secret".to_string()),
            token_ttl_hours,
            cors_origins,
            reset_db: get("RESET_DB").map_or(false, |v| v.eq_ignore_ascii_case("true")),
            admin_bootstrap,
        })
    }
}
