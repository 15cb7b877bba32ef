use crate::domain::ml::FeatureVector;
use crate::domain::prediction::RiskTier;

/// Lower bounds (inclusive) of each tier above `Low`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            critical: 0.90,
            high: 0.80,
            medium: 0.60,
        }
    }
}

/// Maps a lapse probability to a risk tier and a days-to-drop horizon
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskClassifier {
    thresholds: RiskThresholds,
}

impl RiskClassifier {
    pub fn new() -> Self {
        Self::with_thresholds(RiskThresholds::default())
    }

    pub fn with_thresholds(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> RiskThresholds {
        self.thresholds
    }

    /// Checked from the highest threshold down, so a boundary value lands in the higher tier
    pub fn classify(&self, probability: f64) -> RiskTier {
        let t = &self.thresholds;
        if probability >= t.critical {
            RiskTier::Critical
        } else if probability >= t.high {
            RiskTier::High
        } else if probability >= t.medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Estimated days until the streak lapses, scaled down from the current
    /// streak length as risk grows. Always at least 1.
    pub fn predicted_days_to_drop(&self, features: &FeatureVector, probability: f64) -> u32 {
        let base = features.current_streak_length;
        if probability > 0.8 {
            (base / 4).max(1)
        } else if probability > 0.6 {
            (base / 3).max(2)
        } else if probability > 0.4 {
            (base / 2).max(3)
        } else {
            base.max(7)
        }
    }
}
