// Application state shared across all modules

use sqlx::SqlitePool;

use crate::auth::token::TokenCodec;
use crate::common::dev_mode::DevModeConfig;

/// Application state containing the database pool and request-independent configuration.
///
/// Nothing here is mutated after start-up.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub tokens: TokenCodec,
    pub dev_mode: DevModeConfig,
}
