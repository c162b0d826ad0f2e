//! Configuration parsing and validation for the relay server
//!
//! This module handles command-line argument parsing and validation using clap.
//! It defines the main configuration structure used throughout the application.
use anyhow::anyhow;
use clap::Parser;
use url::Url;

#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The port on which the relay server will listen.
    #[arg(short = 'p', long, default_value_t = 8080)]
    pub port: u16,

    /// Base URL of the model inference backend.
    #[arg(short = 'b', long, env = "CONDUIT_BACKEND_URL")]
    pub backend: Url,

    /// Path of the backend invocation endpoint, relative to the base URL.
    #[arg(long, default_value = "invocations")]
    pub invocation_path: String,

    /// Whether to enable the metrics endpoint.
    #[arg(short = 'm', long, default_value_t = true)]
    pub metrics: bool,

    /// The port on which the metrics server will listen.
    #[arg(long, default_value_t = 9090)]
    pub metrics_port: u16,

    /// The prefix to use for metrics.
    #[arg(long, default_value = "conduit")]
    pub metrics_prefix: String,

    /// Maximum number of idle HTTP connections to keep alive to the backend.
    #[arg(long, default_value_t = 100)]
    pub pool_max_idle_per_host: usize,

    /// How long (in seconds) to keep idle HTTP connections alive.
    #[arg(long, default_value_t = 90)]
    pub pool_idle_timeout_secs: u64,
}

impl Config {
    pub fn validate(self) -> Result<Self, anyhow::Error> {
        if self.backend.cannot_be_a_base() {
            return Err(anyhow!(
                "Backend URL '{}' cannot be used as a base",
                self.backend
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_backend_url_passes_validation() {
        let config = Config::parse_from(["conduit", "--backend", "http://model-server:8501"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_base_backend_url_is_rejected() {
        let config = Config::parse_from(["conduit", "--backend", "data:text/plain,nope"]);
        assert!(config.validate().is_err());
    }
}
