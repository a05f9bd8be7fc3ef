//! IAS Adapter - UCL tenant mapping webhook
//!
//! Main entry point for the HTTP service.

use std::net::SocketAddr;
use std::sync::Arc;

use ias_adapter::{router, AppContext};
use ias_adapter_domain::{IasAdapterError, Result};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "ias_adapter=info,tower_http=info";

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        error!(error_type = err.label(), error = %err, "ias adapter stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = ias_adapter_infra::config::load()?;
    let port = config.server.port;

    let context = Arc::new(AppContext::new(config).await?);
    let app = router(Arc::clone(&context));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| IasAdapterError::Config(format!("failed to bind {addr}: {err}")))?;

    info!(%addr, "ias adapter listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| IasAdapterError::Internal(format!("server error: {err}")))?;

    // Each background task is bounded by the processing timeout plus one callback.
    let grace = context.processing_timeout() * 2;
    if tokio::time::timeout(grace, context.drain_background_tasks()).await.is_err() {
        warn!(pending = context.tasks.len(), "background tasks still running at shutdown");
    }
    Ok(())
}

/// `IAS_ADAPTER_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("IAS_ADAPTER_LOG_FORMAT").is_ok_and(|format| format == "json");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
