//! Model lifecycle configuration parsing from environment variables.
//!
//! Where the active model is stored and how the synthetic bootstrap set is drawn.

use anyhow::{Context, Result, ensure};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "data/ml/streak_model.json";
pub const DEFAULT_SYNTHETIC_SAMPLES: usize = 500;

#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub model_path: PathBuf,
    pub synthetic_samples: usize,
    /// `None` seeds the generator from OS entropy
    pub synthetic_seed: Option<u64>,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            synthetic_samples: DEFAULT_SYNTHETIC_SAMPLES,
            synthetic_seed: None,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Result<Self> {
        let model_path = env::var("STREAK_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH));

        let synthetic_samples = env::var("SYNTHETIC_TRAINING_SAMPLES")
            .unwrap_or_else(|_| DEFAULT_SYNTHETIC_SAMPLES.to_string())
            .parse::<usize>()
            .context("Failed to parse SYNTHETIC_TRAINING_SAMPLES")?;
        ensure!(
            synthetic_samples > 0,
            "SYNTHETIC_TRAINING_SAMPLES must be greater than 0"
        );

        let synthetic_seed = match env::var("SYNTHETIC_TRAINING_SEED") {
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .context("Failed to parse SYNTHETIC_TRAINING_SEED")?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            model_path,
            synthetic_samples,
            synthetic_seed,
        })
    }
}
