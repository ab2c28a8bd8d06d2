use std::sync::Arc;

use tracing::info;

use hostinfo::config::Config;
use hostinfo::server::{run_admin_server, AdminState};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;
    hostinfo::logging::init(&config.logging);

    info!("Starting hostinfo {}...", hostinfo::VERSION);
    config.log_summary();

    let listen_addr = config.server.listen_addr;
    let config = Arc::new(config);
    let collector = Arc::new(hostinfo::build_collector(&config));
    let state = Arc::new(AdminState { collector, config });

    // Collection is a handful of cheap probes per page view; a
    // single-threaded runtime is plenty.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(listen_addr, state))
}

async fn async_main(
    addr: std::net::SocketAddr,
    state: Arc<AdminState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tokio::select! {
        result = run_admin_server(addr, state) => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    Ok(())
}
