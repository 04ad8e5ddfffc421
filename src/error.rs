//! Top-level error type.

use crate::config::ConfigError;
use crate::net::listener::ListenerError;

/// Errors that stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// The configuration could not be read or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The listening socket could not be bound.
    #[error(transparent)]
    Bind(#[from] ListenerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
