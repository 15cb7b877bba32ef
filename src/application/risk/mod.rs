pub mod action_recommender;
pub mod confidence;
pub mod risk_classifier;

pub use action_recommender::ActionRecommender;
pub use confidence::ConfidenceEstimator;
pub use risk_classifier::{RiskClassifier, RiskThresholds};
