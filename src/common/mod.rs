// Common module - shared types and utilities across all modules

pub mod config;
pub mod dev_mode;
pub mod error;
pub mod helpers;
pub mod migrations;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod test_support;

// Re-export commonly used types for convenience
pub use error::ApiError;
pub use helpers::{now_timestamp, parse_path_id, safe_email_log, safe_token_log};
pub use state::AppState;
pub use validation::{ValidationResult, Validator};
