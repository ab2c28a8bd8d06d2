//! Configuration module for hostinfo.
//!
//! This module provides centralized configuration loading from environment
//! variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use hostinfo::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Listen address: {}", config.server.listen_addr);
//! ```

mod app;
mod database;
mod error;
mod logging;
mod parse;
mod server;

pub use app::AppConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use server::ServerConfig;

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Admin server configuration.
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Application-level settings and constants.
    pub app: AppConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env(),
            app: AppConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Listen: {}", self.server.listen_addr);
        info!("  Modules dir: {:?}", self.app.modules_dir);
        info!("  Site state: {:?}", self.app.site_state);
        info!("  PHP binary: {}", self.app.php_bin);

        if let Some(ref admin) = self.server.server_admin {
            info!("  Server admin: {}", admin);
        }

        match self.database.host {
            Some(ref host) => info!("  Database: {}@{}", self.database.user_or_default(), host),
            None => info!("  Database: not configured"),
        }

        if self.app.debug {
            info!("  Debug: enabled");
        }
    }
}
