pub mod mock;
pub mod persistence;
pub mod repositories;
pub mod sample_data;
pub mod training_csv;

pub use mock::{EngagementLookup, InMemoryEngagementStore};
pub use persistence::JsonFileModelRepository;
pub use repositories::{InMemoryModelRepository, InMemoryPredictionRepository};
pub use training_csv::CsvTrainingSource;
