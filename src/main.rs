//! Mail relay
//!
//! Forwards contact-form submissions to SendGrid and observes WebSocket
//! connections, all on one listener.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ── POST /public/send_grid/from_my_bulb ──▶ security ──▶ dispatch ──▶ gateway ──▶ SendGrid
//!        ▲                                                              │
//!        └──────────────── {data} | {error} ◀──────────────────────────┘
//!
//!     Client ── GET /ws (upgrade) ──▶ net::connection registry ──▶ lifecycle logs
//! ```

use std::path::PathBuf;

use clap::Parser;

use mail_relay::config::{load_config, ObservabilityConfig};
use mail_relay::lifecycle::{self, signals, Shutdown};
use mail_relay::observability::logging;

#[derive(Parser)]
#[command(name = "mail-relay")]
#[command(about = "Relay contact-form submissions to SendGrid", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; environment variables take precedence.
    #[arg(short, long, env = "MAIL_RELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Configuration rejected, refusing to start");
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability);

    tracing::info!("mail-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        port = config.listener.port,
        recipient_mode = ?config.email.recipient_mode,
        origin_match = ?config.cors.match_mode,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    lifecycle::start(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
