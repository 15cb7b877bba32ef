// Engagement records (streaks, activities, orders, profiles)
pub mod engagement;

// Domain-specific error types
pub mod errors;

// Feature registry, weights and the trained model
pub mod ml;

// Port interfaces
pub mod ports;

// Prediction records, risk tiers and interventions
pub mod prediction;

// Repository traits
pub mod repositories;
