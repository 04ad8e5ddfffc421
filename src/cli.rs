//! Command line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{read_config, validate_config, ConfigError, ServeConfig};

#[derive(Debug, Parser)]
#[command(name = "coi-serve")]
#[command(
    version,
    about = "Serve a directory over HTTP with cross-origin isolation headers",
    long_about = "Serve a directory over HTTP. Every response carries \
                  `Cross-Origin-Embedder-Policy: require-corp` and \
                  `Cross-Origin-Opener-Policy: same-origin`, so pages can use \
                  SharedArrayBuffer during development."
)]
pub struct Cli {
    /// Port to listen on [default: 8000]
    pub port: Option<u16>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(short, long, value_name = "ADDRESS")]
    pub bind: Option<String>,

    /// Directory to serve [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// TOML configuration file; command line flags take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seconds allowed to produce response headers
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Disable the per-request access log
    #[arg(long)]
    pub quiet: bool,
}

impl Cli {
    /// Resolve defaults, the optional config file, and flags into a validated config.
    pub fn into_config(self) -> Result<ServeConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ServeConfig::default(),
        };

        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(bind) = self.bind {
            config.listener.host = bind;
        }
        if let Some(directory) = self.directory {
            config.files.root = directory;
        }
        if let Some(secs) = self.timeout {
            config.timeouts.request_secs = secs;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if self.quiet {
            config.observability.access_log = false;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}
