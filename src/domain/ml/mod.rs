pub mod feature_registry;
pub mod model;

pub use feature_registry::{FeatureVector, ModelFeature};
pub use model::{StreakModel, TrainingExample, TrainingParameters, Weights};
