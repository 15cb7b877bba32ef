//! Repository Pattern Abstractions
//!
//! Persistence of trained models and prediction records. Callers treat every
//! write here as best-effort: a failed save is reported, never fatal to the
//! scoring path.
//!
//! # Current Implementation
//!
//! - `InMemoryModelRepository` / `InMemoryPredictionRepository`: thread-safe,
//!   in-memory storage using `Arc<RwLock>`
//! - `JsonFileModelRepository`: active model stored as a JSON document
//!
//! # Example
//!
//! ```rust,no_run
//! use streakwise::domain::repositories::PredictionRepository;
//! use streakwise::infrastructure::InMemoryPredictionRepository;
//!
//! # async {
//! let repo = InMemoryPredictionRepository::new();
//! let history = repo.find_recent(101, 5).await;
//! # };
//! ```

use crate::domain::engagement::UserId;
use crate::domain::ml::StreakModel;
use crate::domain::prediction::Prediction;
use anyhow::Result;
use async_trait::async_trait;

/// Repository for trained model records
#[async_trait]
pub trait ModelRepository: Send + Sync {
    /// Store a model and mark it as the active one
    async fn save(&self, model: &StreakModel) -> Result<()>;

    /// Load the active model, `None` if nothing was ever saved
    async fn load_active(&self) -> Result<Option<StreakModel>>;
}

/// Repository for prediction records
#[async_trait]
pub trait PredictionRepository: Send + Sync {
    async fn save(&self, prediction: &Prediction) -> Result<()>;

    /// Most recent predictions for a user, newest first
    async fn find_recent(&self, user_id: UserId, limit: usize) -> Result<Vec<Prediction>>;
}
