//! Fact collector.
//!
//! One collection pass probes a fixed catalog of facts and assembles them
//! into a [`Report`]. The single control-flow discipline that matters here is
//! per-field isolation: every lookup is guarded on its own, so one missing
//! capability never aborts collection of the fields after it. Nothing in this
//! module returns an error; unavailability becomes omission or a placeholder.

use std::sync::Arc;

use crate::config::Config;
use crate::probe::{
    AppRegistry, Capability, DatabaseHandle, HostProbe, RequestContext, RuntimeProbe,
};

use super::{Fact, Group, Report};

/// Networks fetched per page when counting sites across a multi-tenant
/// install.
pub const NETWORK_PAGE_SIZE: usize = 100;

const UNABLE_OS: &str = "Unable to determine server architecture";
const UNABLE_RUNTIME: &str = "Unable to determine PHP version";
const UNABLE_HTTPD: &str = "Unable to determine what web server software is used";
const NONE_VALUE: &str = "None";

/// Static settings folded into the report: database connection settings and
/// the application's configuration constants.
#[derive(Clone, Debug)]
pub struct ReportSettings {
    pub db_user: String,
    pub db_host: String,
    pub db_name: String,
    pub db_prefix: String,
    pub db_charset: String,
    pub db_collate: String,
    pub app_memory_limit: String,
    pub app_max_memory_limit: String,
    pub app_debug: bool,
}

impl ReportSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            db_user: config.database.user.clone().unwrap_or_default(),
            db_host: config.database.host.clone().unwrap_or_default(),
            db_name: config.database.name.clone().unwrap_or_default(),
            db_prefix: config.database.prefix.clone(),
            db_charset: config.database.charset.clone(),
            db_collate: config.database.collate.clone(),
            app_memory_limit: config.app.memory_limit.clone(),
            app_max_memory_limit: config.app.max_memory_limit.clone(),
            app_debug: config.app.debug,
        }
    }
}

/// Probes the environment and produces [`Report`]s.
///
/// Built once at startup by the composition root and shared behind `Arc`;
/// holds no mutable state, so a collection pass is a pure read of the
/// environment.
pub struct Collector {
    host: Arc<dyn HostProbe>,
    runtime: Arc<dyn RuntimeProbe>,
    database: Option<Arc<dyn DatabaseHandle>>,
    app: Arc<dyn AppRegistry>,
    settings: ReportSettings,
}

impl Collector {
    pub fn new(
        host: Arc<dyn HostProbe>,
        runtime: Arc<dyn RuntimeProbe>,
        database: Option<Arc<dyn DatabaseHandle>>,
        app: Arc<dyn AppRegistry>,
        settings: ReportSettings,
    ) -> Self {
        Self {
            host,
            runtime,
            database,
            app,
            settings,
        }
    }

    /// Produce a report from the current environment. Never fails; fields
    /// whose probe cannot answer are omitted or carry a placeholder.
    pub fn collect(&self, ctx: &RequestContext) -> Report {
        Report::new(vec![
            self.collect_server(ctx),
            self.collect_database(),
            self.collect_app(),
        ])
    }

    /// Produce the abbreviated report backing the dashboard widget. Only the
    /// hosting group is collected; the database handle and the application
    /// registry are never touched on this path.
    pub fn collect_summary(&self, ctx: &RequestContext) -> Report {
        Report::new(vec![self.collect_server(ctx)])
    }

    fn collect_server(&self, ctx: &RequestContext) -> Group {
        let mut group = Group::new("server", "Hosting Server Information");

        let uname = self
            .host
            .has_capability(Capability::Uname)
            .then(|| self.host.uname())
            .flatten();

        match uname {
            Some(ref u) => group.push(
                "operating_system",
                Fact::text(
                    "Operating System",
                    format!("{} {} {}", u.sysname, u.release, u.machine),
                ),
            ),
            // Keep the row as an indicator that the probe was attempted.
            None => group.push("operating_system", Fact::text("Operating System", UNABLE_OS)),
        }

        if let Some(ref u) = uname {
            group.push("server_hostname", Fact::text("Server Hostname", &u.nodename));
        }

        if let Some(ref addr) = ctx.server_addr {
            group.push("server_ip", Fact::text("Server IP", addr));
        }

        if let Some(ref protocol) = ctx.protocol {
            group.push("server_protocol", Fact::text("Server Protocol", protocol));
        }

        if let Some(ref admin) = ctx.server_admin {
            group.push(
                "server_administrator",
                Fact::text("Server Administrator", admin),
            );
        }

        if let Some(port) = ctx.server_port {
            group.push(
                "server_web_port",
                Fact::text("Server Web Port", port.to_string()),
            );
        }

        if self.host.has_capability(Capability::Uptime) {
            if let Some(uptime) = self.host.uptime() {
                group.push("system_uptime", Fact::text("System Uptime", uptime));
            }
        }

        group.push(
            "httpd_software",
            Fact::text(
                "Web server",
                ctx.software.clone().unwrap_or_else(|| UNABLE_HTTPD.into()),
            ),
        );

        let runtime_version = self
            .runtime
            .has_capability(Capability::RuntimeVersion)
            .then(|| self.runtime.version())
            .flatten();

        match runtime_version {
            Some(v) => {
                let word_size = if v.supports_64bit() {
                    "(Supports 64bit values)"
                } else {
                    "(Does not support 64bit values)"
                };
                group.push(
                    "php_version",
                    Fact::text("PHP version", format!("{} {}", v.version, word_size)),
                );
            }
            None => group.push("php_version", Fact::text("PHP version", UNABLE_RUNTIME)),
        }

        // ini reads can be disabled wholesale by the hoster; only then is the
        // field dropped rather than probed.
        if self.runtime.has_capability(Capability::RuntimeConfig) {
            if let Some(limit) = self.runtime.memory_limit() {
                group.push("memory_limit", Fact::text("PHP memory limit", limit));
            }
        }

        if let Some(ref gateway) = ctx.gateway_interface {
            group.push("cgi_version", Fact::text("CGI Version", gateway));
        }

        group
    }

    fn collect_database(&self) -> Group {
        let mut group = Group::new("database", "Database");

        // No handle means no connection was established: the group stays
        // empty and the renderer skips it.
        let Some(ref db) = self.database else {
            return group;
        };

        if let Some(driver) = db.driver() {
            group.push("extension", Fact::text("Extension", driver));
        }

        if let Some(version) = db.server_version() {
            group.push("server_version", Fact::text("Server version", version));
        }

        if let Some(version) = db.client_version() {
            group.push("client_version", Fact::text("Client version", version));
        }

        let s = &self.settings;
        group.push(
            "database_user",
            Fact::sensitive("Database username", &s.db_user),
        );
        group.push(
            "database_host",
            Fact::sensitive("Database host", &s.db_host),
        );
        group.push(
            "database_name",
            Fact::sensitive("Database name", &s.db_name),
        );
        group.push(
            "database_prefix",
            Fact::sensitive("Table prefix", &s.db_prefix),
        );
        group.push(
            "database_charset",
            Fact::sensitive("Database charset", &s.db_charset),
        );
        group.push(
            "database_collate",
            Fact::sensitive("Database collation", &s.db_collate),
        );

        group
    }

    fn collect_app(&self) -> Group {
        let mut group = Group::new("app", "Application Information");

        let multisite = self.app.is_multisite();
        group.push(
            "multisite",
            Fact::text(
                "Is this a multisite?",
                if multisite { "Yes" } else { "No" },
            ),
        );

        if multisite {
            let page = self.app.networks(NETWORK_PAGE_SIZE);
            let site_count: u64 = page.ids.iter().map(|id| self.app.site_count(*id)).sum();

            group.push(
                "user_count",
                Fact::text("User count", self.app.user_count().to_string()),
            );
            group.push("site_count", Fact::text("Site count", site_count.to_string()));
            group.push(
                "network_count",
                Fact::text("Network count", page.found.to_string()),
            );
        } else {
            group.push(
                "user_count",
                Fact::text("User count", self.app.user_count().to_string()),
            );
        }

        let theme = self.app.active_theme();
        let theme_value = if theme.slug.is_empty() {
            theme.name
        } else {
            format!("{} ({})", theme.name, theme.slug)
        };
        group.push("active_theme", Fact::text("Active Theme", theme_value));

        let mut active = Vec::new();
        let mut inactive = Vec::new();
        for module in self.app.modules() {
            let author = if module.author.is_empty() {
                String::new()
            } else {
                format!("By {}", module.author)
            };
            if module.active {
                active.push((module.name, author));
            } else {
                inactive.push((module.name, author));
            }
        }

        group.push("modules_active", module_fact("Active Modules", active));
        group.push(
            "modules_inactive",
            module_fact("Inactive Modules", inactive),
        );

        group.push(
            "app_memory_limit",
            Fact::text("Application Memory Limit", &self.settings.app_memory_limit),
        );
        group.push(
            "app_max_memory_limit",
            Fact::text(
                "Application Max Memory Limit",
                &self.settings.app_max_memory_limit,
            ),
        );
        group.push(
            "debug",
            Fact::text(
                "Application Debugging",
                if self.settings.app_debug {
                    "Enabled"
                } else {
                    "Disabled"
                },
            ),
        );

        group
    }
}

/// An empty partition renders as "None", not as an empty list.
fn module_fact(label: &'static str, entries: Vec<(String, String)>) -> Fact {
    if entries.is_empty() {
        Fact::text(label, NONE_VALUE)
    } else {
        Fact::list(label, entries)
    }
}
