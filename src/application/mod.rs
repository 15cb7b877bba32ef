// Feature extraction, scoring and training data
pub mod ml;

// Risk tiers, confidence and interventions
pub mod risk;

// Prediction assembly (serving path)
pub mod prediction_service;

// Retrain-and-publish (offline path)
pub mod training_service;
