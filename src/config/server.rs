//! Admin server configuration.

use std::net::SocketAddr;

use super::parse::{env_opt, env_parse};
use super::ConfigError;

/// Admin server configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address (default: 0.0.0.0:9090).
    pub listen_addr: SocketAddr,
    /// Admin contact shown in the report (SERVER_ADMIN).
    pub server_admin: Option<String>,
    /// Gateway interface string when fronted by a CGI-style gateway.
    pub gateway_interface: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            listen_addr: env_parse("LISTEN_ADDR", SocketAddr::from(([0, 0, 0, 0], 9090)))?,
            server_admin: env_opt("SERVER_ADMIN"),
            gateway_interface: env_opt("GATEWAY_INTERFACE"),
        })
    }
}
