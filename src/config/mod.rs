//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → CLI overrides (cli.rs)
//!     → validation.rs (semantic checks)
//!     → ServeConfig (validated, owned by HttpServer)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server starts
//! - All fields have defaults so no file is required
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config, ConfigError};
pub use schema::{FilesConfig, ListenerConfig, ObservabilityConfig, ServeConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
