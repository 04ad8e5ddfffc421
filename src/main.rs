//! coi-serve: a static file server for cross-origin isolated pages.
//!
//! ```text
//!     Client Request                ┌──────────────────────────────────────────┐
//!     ──────────────────────────────┼─▶ net::listener (bounded accept)          │
//!                                   │     → hyper HTTP/1.x connection           │
//!                                   │     → request id → access log             │
//!                                   │     → response hook → timeout             │
//!                                   │     → ServeDir (files under root)         │
//!     Client Response               │                                          │
//!     ◀─────────────────────────────┼── headers + COEP/COOP, then file body     │
//!                                   └──────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

use coi_serve::cli::Cli;
use coi_serve::lifecycle;
use coi_serve::observability::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            init_logging(&Default::default());
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "coi-serve starting");

    match lifecycle::start(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
