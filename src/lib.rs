//! Static file server that appends cross-origin isolation headers.
//!
//! Every response carries `Cross-Origin-Embedder-Policy: require-corp` and
//! `Cross-Origin-Opener-Policy: same-origin`, whatever its status code.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;

// Cross-cutting concerns
pub mod cli;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ServeConfig;
pub use error::ServeError;
pub use http::{HttpServer, ResponseHook};
pub use lifecycle::Shutdown;
pub use security::CrossOriginIsolation;
