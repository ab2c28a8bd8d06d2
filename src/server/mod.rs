//! Admin HTTP server for the dashboard and the full report page.
//!
//! This is the host integration point: a small HTTP/1.1 server that invokes
//! the collector once per page view and renders the result. No caching, no
//! shared mutable state; the collector and config are built once at startup
//! and shared behind `Arc`.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::probe::RequestContext;
use crate::report::{render, Collector, RenderMode, Report};

/// Shared state for request handlers: the composition root builds one of
/// these and every connection task clones the `Arc`.
pub struct AdminState {
    pub collector: Arc<Collector>,
    pub config: Arc<Config>,
}

/// Run the admin server until the listener fails.
pub async fn run_admin_server(
    addr: SocketAddr,
    state: Arc<AdminState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Admin server listening on {}", addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let _ = stream.set_nodelay(true);
        let local_addr = stream.local_addr().ok();
        let state = Arc::clone(&state);

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { handle_request(req, local_addr, state).await }
            });

            let io = TokioIo::new(stream);
            let _ = http1::Builder::new().serve_connection(io, service).await;
        });
    }
}

/// Handle admin requests (/, /server-info, /healthz).
async fn handle_request<B>(
    req: Request<B>,
    local_addr: Option<SocketAddr>,
    state: Arc<AdminState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path();
    debug!("Admin request: {}", path);

    let response = match path {
        "/" => {
            // The dashboard widget only shows hosting facts, so the
            // summary pass runs; the database handle stays untouched
            // until the full page is requested.
            let ctx = request_context(&req, local_addr, &state.config);
            match collect_off_loop(&state.collector, ctx, RenderMode::Summary).await {
                Some(report) => {
                    let widget = render(&report, RenderMode::Summary);
                    html_response(page(
                        "Dashboard",
                        &format!("<h2>Server Info</h2>\n{}", widget),
                    ))
                }
                None => server_error(),
            }
        }
        "/server-info" => {
            let ctx = request_context(&req, local_addr, &state.config);
            match collect_off_loop(&state.collector, ctx, RenderMode::Full).await {
                Some(report) => {
                    let tables = render(&report, RenderMode::Full);
                    html_response(page(
                        "Server Information",
                        &format!(
                            "<h2>Server Information</h2>\n<hr />\n<p>{}</p>\n{}",
                            "General information about the hosting server this site runs on, \
                             useful for performance tuning and support requests.",
                            tables
                        ),
                    ))
                }
                None => server_error(),
            }
        }
        "/healthz" => {
            let body = serde_json::json!({
                "status": "ok",
                "version": crate::VERSION,
            });
            Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from(body.to_string())))
                .unwrap()
        }
        _ => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header("Content-Type", "text/plain")
            .body(Full::new(Bytes::from("Not Found")))
            .unwrap(),
    };

    Ok(response)
}

/// Run a collection pass on the blocking pool. The probes shell out to
/// external binaries; on a single-threaded runtime that would stall every
/// other connection for the probes' duration.
async fn collect_off_loop(
    collector: &Arc<Collector>,
    ctx: RequestContext,
    mode: RenderMode,
) -> Option<Report> {
    let collector = Arc::clone(collector);
    let task = tokio::task::spawn_blocking(move || match mode {
        RenderMode::Summary => collector.collect_summary(&ctx),
        RenderMode::Full => collector.collect(&ctx),
    });

    match task.await {
        Ok(report) => Some(report),
        Err(e) => {
            error!("Collection task failed: {}", e);
            None
        }
    }
}

fn server_error() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Internal Server Error")))
        .unwrap()
}

fn html_response(body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Assemble the request-scoped facts for the collector.
fn request_context<B>(
    req: &Request<B>,
    local_addr: Option<SocketAddr>,
    config: &Config,
) -> RequestContext {
    let protocol = match req.version() {
        http::Version::HTTP_10 => "HTTP/1.0",
        http::Version::HTTP_11 => "HTTP/1.1",
        http::Version::HTTP_2 => "HTTP/2.0",
        _ => "HTTP/1.1",
    };

    RequestContext {
        server_addr: local_addr.map(|a| a.ip().to_string()),
        server_port: local_addr.map(|a| a.port()),
        protocol: Some(protocol.to_string()),
        software: Some(format!("hostinfo/{}", crate::PKG_VERSION)),
        server_admin: config.server.server_admin.clone(),
        gateway_interface: config.server.gateway_interface.clone(),
    }
}

/// Wrap rendered content in a minimal self-contained page.
fn page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<div class="wrap">
{content}
</div>
</body>
</html>
"#,
        title = crate::report::render::escape_html(title),
        css = PAGE_CSS,
        content = content,
    )
}

const PAGE_CSS: &str = "\
body{font-family:sans-serif;margin:2em;background:#f0f0f1;color:#1d2327}\
.wrap{max-width:960px;margin:0 auto}\
table.info-table{width:100%;border-collapse:collapse;background:#fff;margin-bottom:1.5em}\
table.info-table td,table.info-table th{border:1px solid #c3c4c7;padding:.5em .8em;text-align:left}\
table.info-table tr:nth-child(odd) td{background:#f6f7f7}\
table.info-table ul{margin:0;padding-left:1.2em}\
table.info-table span{color:#646970;font-size:.9em}\
a.button{display:inline-block;padding:.4em 1em;background:#2271b1;color:#fff;text-decoration:none;border-radius:3px}";

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use http_body_util::BodyExt;

    use crate::config::{AppConfig, DatabaseConfig, LoggingConfig, ServerConfig};
    use crate::probe::registry::FileRegistry;
    use crate::probe::{Capability, DatabaseHandle, HostProbe, RuntimeProbe, RuntimeVersion, Uname};
    use crate::report::ReportSettings;

    struct StubHost;

    impl HostProbe for StubHost {
        fn has_capability(&self, cap: Capability) -> bool {
            matches!(cap, Capability::Uname)
        }

        fn uname(&self) -> Option<Uname> {
            Some(Uname {
                sysname: "Linux".into(),
                release: "6.1.0".into(),
                machine: "x86_64".into(),
                nodename: "web01".into(),
            })
        }

        fn uptime(&self) -> Option<String> {
            None
        }
    }

    struct StubRuntime;

    impl RuntimeProbe for StubRuntime {
        fn has_capability(&self, cap: Capability) -> bool {
            matches!(cap, Capability::RuntimeVersion)
        }

        fn version(&self) -> Option<RuntimeVersion> {
            Some(RuntimeVersion {
                version: "8.3.6".into(),
                int_size_bytes: 8,
            })
        }

        fn memory_limit(&self) -> Option<String> {
            None
        }
    }

    struct CountingDb {
        queries: AtomicUsize,
    }

    impl DatabaseHandle for CountingDb {
        fn driver(&self) -> Option<String> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Some("mysqli".into())
        }

        fn server_version(&self) -> Option<String> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Some("8.0.36".into())
        }

        fn client_version(&self) -> Option<String> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            None
        }
    }

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                listen_addr: "127.0.0.1:0".parse().unwrap(),
                server_admin: None,
                gateway_interface: None,
            },
            database: DatabaseConfig {
                host: None,
                user: None,
                name: None,
                prefix: "wp_".into(),
                charset: "utf8mb4".into(),
                collate: String::new(),
                mysql_bin: "mysql".into(),
            },
            app: AppConfig {
                php_bin: "php".into(),
                modules_dir: "/nonexistent/modules".into(),
                site_state: "/nonexistent/site.json".into(),
                memory_limit: "40M".into(),
                max_memory_limit: "256M".into(),
                debug: false,
            },
            logging: LoggingConfig {
                filter: "hostinfo=info".into(),
                json: false,
                service_name: "hostinfo".into(),
            },
        }
    }

    fn test_state(database: Option<Arc<dyn DatabaseHandle>>) -> Arc<AdminState> {
        let config = test_config();
        let registry = FileRegistry::load(&config.app.modules_dir, &config.app.site_state);
        let collector = Collector::new(
            Arc::new(StubHost),
            Arc::new(StubRuntime),
            database,
            Arc::new(registry),
            ReportSettings::from_config(&config),
        );

        Arc::new(AdminState {
            collector: Arc::new(collector),
            config: Arc::new(config),
        })
    }

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_page_escapes_title() {
        let html = page("<Admin>", "<p>ok</p>");
        assert!(html.contains("<title>&lt;Admin&gt;</title>"));
        assert!(html.contains("<p>ok</p>"));
    }

    #[tokio::test]
    async fn test_healthz_reports_ok() {
        let state = test_state(None);
        let req = Request::builder().uri("/healthz").body(()).unwrap();

        let response = handle_request(req, None, state).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Type"], "application/json");

        let body = body_string(response).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let state = test_state(None);
        let req = Request::builder().uri("/metrics").body(()).unwrap();

        let response = handle_request(req, None, state).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dashboard_widget_never_queries_database() {
        let db = Arc::new(CountingDb {
            queries: AtomicUsize::new(0),
        });
        let state = test_state(Some(db.clone() as Arc<dyn DatabaseHandle>));
        let req = Request::builder().uri("/").body(()).unwrap();

        let response = handle_request(req, None, state).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("View More Information"));
        assert!(html.contains("PHP version"));
        assert_eq!(db.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_full_page_includes_database_group() {
        let db = Arc::new(CountingDb {
            queries: AtomicUsize::new(0),
        });
        let state = test_state(Some(db.clone() as Arc<dyn DatabaseHandle>));
        let req = Request::builder().uri("/server-info").body(()).unwrap();

        let response = handle_request(req, None, state).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("<h3>Database</h3>"));
        assert!(html.contains("8.0.36"));
        assert!(db.queries.load(Ordering::SeqCst) > 0);
    }
}
