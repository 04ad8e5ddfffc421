//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper HTTP/1.x connection, Axum router)
//!     → request.rs (add request ID)
//!     → static_files.rs (resolve path under root, build response)
//!     → response.rs (run response hook on the finished headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use request::{RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use response::{finalize_headers, ResponseHook, SharedHook};
pub use server::{build_router, HttpServer};
