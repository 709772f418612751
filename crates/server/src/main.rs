//! Farm game HTTP server.
//!
//! ```bash
//! PORT=3001 RUST_LOG=farm_server=debug,info cargo run -p farm-server
//! ```

use anyhow::{Context, Result};
use farm_runtime::Runtime;
use farm_server::{AppState, ServerConfig, build_router, logging};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = ServerConfig::from_env();
    let runtime = Runtime::builder()
        .config(config.runtime.clone())
        .build()
        .context("failed to start runtime")?;

    let app = build_router(AppState::new(runtime.handle()));
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "farm server listening");
    info!("health check: http://{addr}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    runtime.shutdown().await.context("runtime shutdown failed")?;
    info!("farm server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
