use crate::domain::ml::FeatureVector;

pub const BASE_CONFIDENCE: f64 = 0.70;
pub const MAX_CONFIDENCE: f64 = 0.95;
const DATA_BONUS: f64 = 0.10;

/// Heuristic confidence from how much history backs the features.
///
/// 0.70 base, +0.10 each for more than 10 activities, more than 3 orders and
/// an account older than 30 days, capped at 0.95.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceEstimator;

impl ConfidenceEstimator {
    pub fn estimate(&self, features: &FeatureVector) -> f64 {
        let mut confidence = BASE_CONFIDENCE;

        if features.total_activities > 10 {
            confidence += DATA_BONUS;
        }
        if features.total_orders > 3 {
            confidence += DATA_BONUS;
        }
        if features.days_since_registration > 30 {
            confidence += DATA_BONUS;
        }

        confidence.min(MAX_CONFIDENCE)
    }
}
