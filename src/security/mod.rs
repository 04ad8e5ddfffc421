//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing response:
//!     → static file service builds status and headers
//!     → headers.rs (append cross-origin isolation headers)
//!     → hyper writes the header block
//! ```

pub mod headers;

pub use headers::CrossOriginIsolation;
