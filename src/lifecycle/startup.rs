//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Bind the listener and build the server
//! - Run until a stop signal, then drain
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds before the server is built, so a busy port is reported
//!   before anything else happens
//! - Signal handlers exist before the listener does

use std::future::Future;

use crate::config::{validate_config, ConfigError, ServeConfig};
use crate::error::ServeError;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::Signals;
use crate::net::Listener;

/// Serve until SIGINT or SIGTERM.
pub async fn start(config: ServeConfig) -> Result<(), ServeError> {
    // Registered before the banner is printed.
    let signals = Signals::install()?;
    serve_until(config, async move {
        let signal = signals.recv().await;
        tracing::info!(signal = %signal, "Shutdown signal received, exiting");
    })
    .await
}

/// Serve until `stop` resolves, then drain open connections and return.
pub async fn serve_until<F>(config: ServeConfig, stop: F) -> Result<(), ServeError>
where
    F: Future<Output = ()>,
{
    validate_config(&config).map_err(ConfigError::Validation)?;

    let listener = Listener::bind(&config.listener).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        "Serving HTTP on {} port {} (http://{}/) ...",
        local_addr.ip(),
        local_addr.port(),
        local_addr
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let running = server.run(listener, shutdown.subscribe());
    tokio::pin!(running);

    tokio::select! {
        result = &mut running => return result,
        _ = stop => shutdown.trigger(),
    }

    running.await
}
