use crate::domain::engagement::UserId;
use thiserror::Error;

/// Errors raised by the streak-risk pipeline (training and inference)
#[derive(Debug, Error)]
pub enum StreakError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Data unavailable for user {user_id}: {resource} lookup failed: {reason}")]
    DataUnavailable {
        user_id: UserId,
        resource: &'static str,
        reason: String,
    },

    #[error("Training cancelled after {completed_epochs}/{total_epochs} epochs")]
    TrainingCancelled {
        completed_epochs: usize,
        total_epochs: usize,
    },

    #[error("Training example {index} has {feature} = {value}, outside its domain")]
    InvalidTrainingExample {
        index: usize,
        feature: &'static str,
        value: f64,
    },

    #[error("Training diverged at epoch {epoch}: {feature} weight is not finite")]
    TrainingDiverged { epoch: usize, feature: &'static str },

    #[error("Training data unavailable from {source_name}: {reason}")]
    TrainingDataUnavailable { source_name: String, reason: String },

    #[error("Training task aborted: {0}")]
    TrainingAborted(String),
}

/// Errors raised when a model record does not match the feature registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelValidationError {
    #[error("Missing weight for feature '{feature}'")]
    MissingWeight { feature: String },

    #[error("Unknown weight '{name}' (not a model feature)")]
    UnknownWeight { name: String },

    #[error("Unknown feature '{name}' in feature names")]
    UnknownFeature { name: String },

    #[error("Feature '{feature}' listed more than once")]
    DuplicateFeature { feature: String },

    #[error("Feature names mismatch: expected {expected} names, got {actual}")]
    FeatureNamesMismatch { expected: usize, actual: usize },

    #[error("Unsupported model type '{model_type}'")]
    UnsupportedModelType { model_type: String },
}
