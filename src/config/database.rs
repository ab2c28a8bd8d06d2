//! Database connection settings.
//!
//! The database itself is an external collaborator; these settings describe
//! the connection the hosted application uses and feed the sensitive fields
//! of the report's database group. No value here is ever required: with no
//! `DB_HOST` the service simply reports an empty database group.

use super::parse::{env_opt, env_or};

/// Database connection settings loaded from environment.
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    /// Database host (unset means no database is configured).
    pub host: Option<String>,
    /// Connection user name.
    pub user: Option<String>,
    /// Schema name.
    pub name: Option<String>,
    /// Table-name prefix (default: wp_).
    pub prefix: String,
    /// Connection character set (default: utf8mb4).
    pub charset: String,
    /// Collation override (empty by default).
    pub collate: String,
    /// mysql client binary used for version queries (default: mysql).
    pub mysql_bin: String,
}

impl DatabaseConfig {
    /// Load settings from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env_opt("DB_HOST"),
            user: env_opt("DB_USER"),
            name: env_opt("DB_NAME"),
            prefix: env_or("DB_PREFIX", "wp_"),
            charset: env_or("DB_CHARSET", "utf8mb4"),
            collate: env_or("DB_COLLATE", ""),
            mysql_bin: env_or("MYSQL_BIN", "mysql"),
        }
    }

    /// User name for display, empty when unset.
    pub fn user_or_default(&self) -> &str {
        self.user.as_deref().unwrap_or("")
    }
}
