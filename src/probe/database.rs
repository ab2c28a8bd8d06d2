//! Database probes.
//!
//! The database driver is an external collaborator; the collector only sees
//! the [`DatabaseHandle`] trait. The shipped implementation shells out to the
//! mysql client binary, which keeps this crate free of a driver dependency
//! and degrades cleanly when no client is installed.

use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::DatabaseConfig;

/// A live database connection, reduced to the three identification facts the
/// report needs. Every method may come back empty; the collector omits the
/// corresponding field.
pub trait DatabaseHandle: Send + Sync {
    /// Driver identification, e.g. "mysql" or "mysqli".
    fn driver(&self) -> Option<String>;

    /// Server version via a read-only `SELECT VERSION()` query.
    fn server_version(&self) -> Option<String>;

    /// Client library version, already normalized to a dotted triple.
    fn client_version(&self) -> Option<String>;
}

/// Handle backed by the mysql CLI client.
pub struct MysqlCli {
    bin: String,
    host: Option<String>,
    user: Option<String>,
    name: Option<String>,
}

impl MysqlCli {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            bin: config.mysql_bin.clone(),
            host: config.host.clone(),
            user: config.user.clone(),
            name: config.name.clone(),
        }
    }
}

impl DatabaseHandle for MysqlCli {
    fn driver(&self) -> Option<String> {
        Some("mysql".to_string())
    }

    fn server_version(&self) -> Option<String> {
        let mut cmd = Command::new(&self.bin);
        if let Some(ref host) = self.host {
            cmd.args(["-h", host]);
        }
        if let Some(ref user) = self.user {
            cmd.args(["-u", user]);
        }
        // -N -B: no column header, tab-separated batch output.
        cmd.args(["-N", "-B", "-e", "SELECT VERSION()"]);
        if let Some(ref name) = self.name {
            cmd.arg(name);
        }

        let output = cmd.output().ok()?;
        if !output.status.success() {
            return None;
        }
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!version.is_empty()).then_some(version)
    }

    fn client_version(&self) -> Option<String> {
        // `mysql --version` prints a free-form banner; run it through the
        // legacy extraction to get a bare dotted triple.
        let output = Command::new(&self.bin).arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        let banner = String::from_utf8_lossy(&output.stdout);
        extract_client_version(banner.trim()).map(str::to_string)
    }
}

static CLIENT_VERSION_RE: OnceLock<Regex> = OnceLock::new();

/// Extract a client version from a legacy free-form version string.
///
/// Matches the first occurrence of `\d{1,2}\.\d{1,2}\.\d{1,2}`, so
/// "Server type 5.7.32-log" yields "5.7.32". Returns `None` when the string
/// carries no dotted triple.
pub fn extract_client_version(raw: &str) -> Option<&str> {
    let re = CLIENT_VERSION_RE
        .get_or_init(|| Regex::new(r"[0-9]{1,2}\.[0-9]{1,2}\.[0-9]{1,2}").unwrap());
    re.find(raw).map(|m| m.as_str())
}
