//! Logging configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Logging environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset
    pub log_filter: String,
    pub ansi: bool,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            ansi: true,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_filter: env::var("LOG_FILTER").unwrap_or_else(|_| "info".to_string()),
            ansi: env::var("LOG_ANSI")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .context("Failed to parse LOG_ANSI")?,
        })
    }

    /// Installs the global `tracing` subscriber. `RUST_LOG` wins over `log_filter`.
    pub fn init_tracing(&self) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.log_filter));
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_ansi(self.ansi)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}
