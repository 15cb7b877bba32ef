//! Feature extraction configuration parsing from environment variables.

use crate::application::ml::FeatureExtractor;
use crate::application::ml::feature_extractor::{DEFAULT_ACTIVITY_LIMIT, DEFAULT_ORDER_LIMIT};
use anyhow::{Context, Result, ensure};
use chrono::{FixedOffset, Offset, Utc};
use std::env;

/// Vietnam (UTC+7), where the storefront's users are
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 7;

#[derive(Debug, Clone)]
pub struct FeatureEnvConfig {
    pub activity_lookback: usize,
    pub order_lookback: usize,
    /// Offset for calendar days, weekends, evenings and the seasonal month
    pub utc_offset_hours: i32,
}

impl Default for FeatureEnvConfig {
    fn default() -> Self {
        Self {
            activity_lookback: DEFAULT_ACTIVITY_LIMIT,
            order_lookback: DEFAULT_ORDER_LIMIT,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }
}

impl FeatureEnvConfig {
    pub fn from_env() -> Result<Self> {
        let activity_lookback = Self::parse_usize("ACTIVITY_LOOKBACK", DEFAULT_ACTIVITY_LIMIT)?;
        ensure!(activity_lookback > 0, "ACTIVITY_LOOKBACK must be greater than 0");

        let order_lookback = Self::parse_usize("ORDER_LOOKBACK", DEFAULT_ORDER_LIMIT)?;
        ensure!(order_lookback > 0, "ORDER_LOOKBACK must be greater than 0");

        let utc_offset_hours = env::var("LOCAL_UTC_OFFSET_HOURS")
            .unwrap_or_else(|_| DEFAULT_UTC_OFFSET_HOURS.to_string())
            .parse::<i32>()
            .context("Failed to parse LOCAL_UTC_OFFSET_HOURS")?;
        ensure!(
            (-12..=14).contains(&utc_offset_hours),
            "LOCAL_UTC_OFFSET_HOURS must be between -12 and 14, got {}",
            utc_offset_hours
        );

        Ok(Self {
            activity_lookback,
            order_lookback,
            utc_offset_hours,
        })
    }

    pub fn local_offset(&self) -> FixedOffset {
        // Range is checked in from_env; anything else falls back to UTC
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    pub fn extractor(&self) -> FeatureExtractor {
        FeatureExtractor::new(self.local_offset())
            .with_limits(self.activity_lookback, self.order_lookback)
    }

    fn parse_usize(key: &str, default: usize) -> Result<usize> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<usize>()
            .context(format!("Failed to parse {}", key))
    }
}
