//! HTTP server setup and connection handling.
//!
//! # Responsibilities
//! - Build the Axum router around the static file service
//! - Wire up middleware (request ID, access log, header hook, timeout)
//! - Accept connections and serve HTTP/1.x on each
//! - Drain open connections on shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request},
    middleware, Router,
};
use hyper::{body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tower::ServiceExt;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServeConfig;
use crate::error::ServeError;
use crate::http::request::request_id_layer;
use crate::http::response::{finalize_headers, SharedHook};
use crate::http::static_files;
use crate::net::{ConnectionPermit, ConnectionTracker, Listener};
use crate::observability::access_log_layer;
use crate::security::CrossOriginIsolation;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Static file server that runs a response hook on every exchange.
pub struct HttpServer {
    router: Router,
    config: ServeConfig,
    tracker: ConnectionTracker,
}

impl HttpServer {
    /// Create a server that adds the cross-origin isolation headers.
    pub fn new(config: ServeConfig) -> Self {
        Self::with_hook(config, Arc::new(CrossOriginIsolation))
    }

    /// Create a server with a custom response hook.
    pub fn with_hook(config: ServeConfig, hook: SharedHook) -> Self {
        let router = build_router(&config, hook);
        Self {
            router,
            config,
            tracker: ConnectionTracker::new(),
        }
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServeError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.config.files.root.display(),
            "HTTP server starting"
        );

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => self.spawn_connection(stream, peer, permit),
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
                _ = shutdown.recv() => break,
            }
        }

        drop(listener);
        self.tracker.begin_drain();

        let grace = Duration::from_secs(self.config.timeouts.shutdown_secs);
        if tokio::time::timeout(grace, self.tracker.wait_for_shutdown())
            .await
            .is_err()
        {
            tracing::warn!(
                open_connections = self.tracker.active_count(),
                "Drain deadline reached, abandoning open connections"
            );
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router serving each request, for driving the stack without sockets.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServeConfig {
        &self.config
    }

    /// Number of connections currently open.
    pub fn open_connections(&self) -> u64 {
        self.tracker.active_count()
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr, permit: ConnectionPermit) {
        let router = self.router.clone();
        let guard = self.tracker.track();
        let mut drain = self.tracker.drain_receiver();

        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(peer = %peer, error = %e, "Failed to set TCP_NODELAY");
        }

        tokio::spawn(async move {
            let _permit = permit;
            let service = service_fn(move |mut request: Request<Incoming>| {
                request.extensions_mut().insert(ConnectInfo(peer));
                router.clone().oneshot(request)
            });

            // Title case keeps header names byte-identical to the usual spelling,
            // e.g. `Cross-Origin-Embedder-Policy`. `Date` comes from `finalize_headers`.
            let conn = http1::Builder::new()
                .title_case_headers(true)
                .auto_date_header(false)
                .serve_connection(TokioIo::new(stream), service);
            tokio::pin!(conn);

            let mut draining = false;
            let result = loop {
                tokio::select! {
                    result = conn.as_mut() => break result,
                    _ = drain.changed(), if !draining => {
                        draining = true;
                        conn.as_mut().graceful_shutdown();
                    }
                }
            };

            if let Err(e) = result {
                tracing::debug!(
                    connection_id = %guard.id(),
                    peer = %peer,
                    error = %e,
                    "Connection closed with error"
                );
            }
        });
    }
}

/// Build the router: static files wrapped by timeout, header hook, access log, request ID.
///
/// Layers added later run first, so the hook also sees timeout responses.
#[allow(deprecated)]
pub fn build_router(config: &ServeConfig, hook: SharedHook) -> Router {
    let mut router = Router::new()
        .fallback_service(static_files::serve_dir(&config.files))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.timeouts.request_secs,
        )))
        .layer(middleware::from_fn_with_state(hook, finalize_headers));

    if config.observability.access_log {
        router = router.layer(access_log_layer());
    }

    router.layer(request_id_layer())
}
