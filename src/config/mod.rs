//! Configuration module for Streakwise.
//!
//! Structured configuration loading from environment variables, organized by
//! concern: Model lifecycle, Feature extraction, and Observability.

mod feature_config;
mod model_config;
mod observability_config;

pub use feature_config::{DEFAULT_UTC_OFFSET_HOURS, FeatureEnvConfig};
pub use model_config::{DEFAULT_MODEL_PATH, DEFAULT_SYNTHETIC_SAMPLES, ModelEnvConfig};
pub use observability_config::ObservabilityEnvConfig;

use anyhow::{Context, Result};

/// Main configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub model: ModelEnvConfig,
    pub features: FeatureEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Reads `.env` if present, then the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            model: ModelEnvConfig::from_env().context("Failed to load model config")?,
            features: FeatureEnvConfig::from_env().context("Failed to load feature config")?,
            observability: ObservabilityEnvConfig::from_env()
                .context("Failed to load observability config")?,
        })
    }
}
