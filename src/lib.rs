//! hostinfo - Hosting environment diagnostics for PHP stacks.
//!
//! This crate collects facts about the hosting environment (operating system,
//! web server, PHP runtime, database configuration, application metadata) and
//! renders them as an admin-facing HTML report: an abbreviated dashboard
//! widget and a full settings page.
//!
//! # Architecture
//!
//! Collection feeds presentation:
//!
//! - [`report::Collector`] probes a fixed catalog of facts through the trait
//!   seams in [`probe`]. Every probe is independently guarded: a missing
//!   capability degrades that one field (omission or placeholder), never the
//!   whole report.
//! - [`report::render`] turns the resulting [`report::Report`] into escaped
//!   HTML in one of two modes (summary widget or full page).
//!
//! The [`server`] module is the host integration point: a small hyper server
//! exposing the dashboard and the full report.
//!
//! # Example
//!
//! ```rust,ignore
//! use hostinfo::config::Config;
//! use hostinfo::report::{render, RenderMode};
//!
//! let config = Config::from_env()?;
//! let collector = hostinfo::build_collector(&config);
//! let report = collector.collect(&ctx);
//! let html = render(&report, RenderMode::Full);
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (8 chars), empty when built outside a checkout
pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Full version string: "0.1.0 (abc12345)" or "0.1.0" equivalent
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_VERSION"), ")");

pub mod config;
pub mod logging;
pub mod probe;
pub mod report;
pub mod server;

// Re-exports for convenience
pub use config::Config;
pub use report::{Collector, Report};

use std::sync::Arc;

use probe::database::MysqlCli;
use probe::host::LiveHost;
use probe::registry::FileRegistry;
use probe::runtime::PhpCli;
use report::ReportSettings;

/// Build a collector wired to the live probes described by `config`.
///
/// This is the composition root: called once at startup, the result is shared
/// behind `Arc` by every request handler. No global instance exists.
pub fn build_collector(config: &Config) -> Collector {
    let database = config
        .database
        .host
        .is_some()
        .then(|| Arc::new(MysqlCli::new(&config.database)) as Arc<dyn probe::DatabaseHandle>);

    Collector::new(
        Arc::new(LiveHost::new()),
        Arc::new(PhpCli::new(&config.app.php_bin)),
        database,
        Arc::new(FileRegistry::load(
            &config.app.modules_dir,
            &config.app.site_state,
        )),
        ReportSettings::from_config(config),
    )
}
