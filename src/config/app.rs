//! Application-level settings and constants.

use std::path::PathBuf;

use super::parse::{env_bool, env_or};
use super::ConfigError;

/// Application settings loaded from environment.
///
/// The two memory limit constants and the debug flag mirror the hosted
/// application's own configuration constants; they are reported verbatim.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// PHP interpreter binary probed for runtime facts (default: php).
    pub php_bin: String,
    /// Module registry root (default: /var/www/modules).
    pub modules_dir: PathBuf,
    /// Site state file (default: /var/www/site.json).
    pub site_state: PathBuf,
    /// Application memory limit constant (default: 40M).
    pub memory_limit: String,
    /// Admin-side memory limit constant (default: 256M).
    pub max_memory_limit: String,
    /// Application debug flag.
    pub debug: bool,
}

impl AppConfig {
    /// Load settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            php_bin: env_or("PHP_BIN", "php"),
            modules_dir: PathBuf::from(env_or("MODULES_DIR", "/var/www/modules")),
            site_state: PathBuf::from(env_or("SITE_STATE", "/var/www/site.json")),
            memory_limit: env_or("APP_MEMORY_LIMIT", "40M"),
            max_memory_limit: env_or("APP_MAX_MEMORY_LIMIT", "256M"),
            debug: env_bool("APP_DEBUG", false),
        })
    }
}
