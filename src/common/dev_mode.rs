// src/common/dev_mode.rs
//! Development mode configuration and utilities
//! Allows bypassing admin authentication for local testing

use std::env;

use crate::auth::models::AdminProfile;

#[derive(Debug, Clone)]
pub struct DevModeConfig {
    pub enabled: bool,
    pub admin_email: String,
    pub admin_name: String,
}

impl DevModeConfig {
    pub fn from_env() -> Self {
        let enabled = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        let admin_email =
            env::var("DEV_ADMIN_EMAIL").unwrap_or_else(|_| "dev@bsapphire.com".to_string());

        let admin_name = env::var("DEV_ADMIN_NAME").unwrap_or_else(|_| "Dev Admin".to_string());

        Self {
            enabled,
            admin_email,
            admin_name,
        }
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            admin_email: String::new(),
            admin_name: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Profile handed to admin endpoints while authentication is bypassed
    pub fn dev_admin(&self) -> AdminProfile {
        AdminProfile {
            id: "0".to_string(),
            email: self.admin_email.clone(),
            name: self.admin_name.clone(),
            role: "admin".to_string(),
        }
    }
}

/// Print dev mode status on startup
pub fn print_dev_mode_status(config: &DevModeConfig) {
    if config.enabled {
        println!("⚠️  🔓 DEV MODE ENABLED 🔓 ⚠️");
        println!("   Admin authentication bypassed for testing");
        println!("   Dev Admin: {} ({})", config.admin_name, config.admin_email);
        println!("   ⚠️  DO NOT USE IN PRODUCTION ⚠️");
        println!();
    } else {
        println!("🔒 Production mode - Admin authentication required");
    }
}

/// CLI argument parsing for dev mode
pub fn parse_dev_mode_args<I>(args: I) -> Option<bool>
where
    I: IntoIterator<Item = String>,
{
    let mut decision = None;
    for arg in args {
        match arg.as_str() {
            "--dev" | "--dev-mode" => decision = Some(true),
            "--no-dev" | "--prod" | "--production" => decision = Some(false),
            _ => {}
        }
    }
    decision
}

/// Override dev mode from CLI args
pub fn apply_cli_override(mut config: DevModeConfig) -> DevModeConfig {
    if let Some(cli_dev_mode) = parse_dev_mode_args(env::args().skip(1)) {
        println!("🔧 CLI override: DEV_MODE = {}", cli_dev_mode);
        config.enabled = cli_dev_mode;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cli_args_parsing() {
        assert_eq!(parse_dev_mode_args(args(&[])), None);
        assert_eq!(parse_dev_mode_args(args(&["--dev"])), Some(true));
        assert_eq!(parse_dev_mode_args(args(&["--prod"])), Some(false));
        // last flag wins
        assert_eq!(parse_dev_mode_args(args(&["--dev", "--no-dev"])), Some(false));
        assert_eq!(parse_dev_mode_args(args(&["--verbose"])), None);
    }

    #[test]
    fn test_dev_admin_profile() {
        let config = DevModeConfig {
            enabled: true,
            admin_email: "dev@bsapphire.com".to_string(),
            admin_name: "Dev Admin".to_string(),
        };
        let profile = config.dev_admin();
        assert_eq!(profile.email, "dev@bsapphire.com");
        assert_eq!(profile.role, "admin");
        assert!(!DevModeConfig::disabled().is_enabled());
    }
}
