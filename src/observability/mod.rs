//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (subscriber setup, filter directives)
//!     → tracing.rs (per-request spans with request IDs, access log)
//!
//! Consumers:
//!     → stderr/stdout via tracing-subscriber fmt layer
//! ```

pub mod logging;
pub mod tracing;

pub use logging::init_logging;
pub use self::tracing::access_log_layer;
