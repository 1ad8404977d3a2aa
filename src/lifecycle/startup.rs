//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the gateway client and server from validated configuration
//! - Start the metrics exporter when enabled
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::gateway::GatewayError;
use crate::http::{HttpServer, WS_PATH};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Fatal errors while bringing the relay up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("email gateway: {0}")]
    Gateway(#[from] GatewayError),

    #[error("metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Bring the relay up and serve until `shutdown` fires.
pub async fn start(config: RelayConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let server = HttpServer::new(config)?;

    let observability = server.config().observability.clone();
    if observability.metrics_enabled {
        match observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = server.config().listener.bind_address();
    let listener = TcpListener::bind(&bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!("HTTP server listening on http://{}", local_addr);
    tracing::info!("WebSocket available on ws://{}{}", local_addr, WS_PATH);

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
