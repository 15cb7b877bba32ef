use crate::domain::ml::FeatureVector;

/// Probability returned when no trained model is available
pub const NEUTRAL_PROBABILITY: f64 = 0.5;

/// Interface for streak-lapse scoring models
pub trait StreakPredictor: Send + Sync {
    /// Probability that the user's streak lapses, strictly inside (0, 1).
    /// Returns [`NEUTRAL_PROBABILITY`] when not ready.
    fn predict(&self, features: &FeatureVector) -> f64;

    /// False while the predictor would only return the neutral probability
    fn is_ready(&self) -> bool;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version, `None` when no model is loaded
    fn version(&self) -> Option<&str>;
}
