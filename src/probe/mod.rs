//! Fact sources for the report collector.
//!
//! Every environment the collector reads from sits behind a trait in this
//! module: the host OS ([`HostProbe`]), the PHP interpreter
//! ([`RuntimeProbe`]), the database ([`DatabaseHandle`]) and the application
//! registry ([`AppRegistry`]). The traits keep the collector testable and
//! make the degradation policy explicit: a probe that cannot answer returns
//! `None`, never an error.
//!
//! Capability detection is a separate, explicit step: callers ask
//! [`HostProbe::has_capability`] / [`RuntimeProbe::has_capability`] before
//! reading, so "this environment cannot do X at all" and "the probe ran but
//! produced nothing" stay distinguishable.

pub mod context;
pub mod database;
pub mod host;
pub mod registry;
pub mod runtime;

pub use context::RequestContext;
pub use database::DatabaseHandle;
pub use host::{HostProbe, Uname};
pub use registry::{AppRegistry, ModuleInfo, NetworkPage, Theme};
pub use runtime::{RuntimeProbe, RuntimeVersion};

/// A probe capability that may be absent in a given environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Kernel name/release/machine/hostname lookup (uname).
    Uname,
    /// Shell uptime probe.
    Uptime,
    /// Interpreter version query.
    RuntimeVersion,
    /// Interpreter configuration read (ini values).
    RuntimeConfig,
}
