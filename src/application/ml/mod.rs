pub mod feature_extractor;
pub mod logistic_scorer;
pub mod model_registry;
pub mod predictor;
pub mod training_data;

pub use feature_extractor::{FeatureExtractor, UserSnapshot};
pub use logistic_scorer::LogisticScorer;
pub use model_registry::ModelRegistry;
pub use predictor::{NEUTRAL_PROBABILITY, StreakPredictor};
pub use training_data::{SyntheticTrainingSet, TrainingSource};
