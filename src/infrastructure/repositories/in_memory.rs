//! In-Memory Repository Implementations
//!
//! Thread-safe, in-memory implementations of the repository traits defined in
//! `domain::repositories`.
//!
//! # Features
//!
//! - **Thread-safe**: Uses `Arc<RwLock>` for concurrent access
//! - **Testing**: Ideal for unit tests and the demo binary
//!
//! # Limitations
//!
//! - Data is lost on application restart
//! - No persistence across multiple instances

use crate::domain::engagement::UserId;
use crate::domain::ml::StreakModel;
use crate::domain::prediction::Prediction;
use crate::domain::repositories::{ModelRepository, PredictionRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps every saved model; the last one saved is the active one
pub struct InMemoryModelRepository {
    models: Arc<RwLock<Vec<StreakModel>>>,
}

impl InMemoryModelRepository {
    pub fn new() -> Self {
        Self {
            models: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn count(&self) -> usize {
        self.models.read().await.len()
    }
}

impl Default for InMemoryModelRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelRepository for InMemoryModelRepository {
    async fn save(&self, model: &StreakModel) -> Result<()> {
        self.models.write().await.push(model.clone());
        Ok(())
    }

    async fn load_active(&self) -> Result<Option<StreakModel>> {
        Ok(self.models.read().await.last().cloned())
    }
}

pub struct InMemoryPredictionRepository {
    predictions: Arc<RwLock<Vec<Prediction>>>,
}

impl InMemoryPredictionRepository {
    pub fn new() -> Self {
        Self {
            predictions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn count(&self) -> usize {
        self.predictions.read().await.len()
    }
}

impl Default for InMemoryPredictionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionRepository for InMemoryPredictionRepository {
    async fn save(&self, prediction: &Prediction) -> Result<()> {
        self.predictions.write().await.push(prediction.clone());
        Ok(())
    }

    async fn find_recent(&self, user_id: UserId, limit: usize) -> Result<Vec<Prediction>> {
        let predictions = self.predictions.read().await;
        let mut matching: Vec<Prediction> = predictions
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps, so reverse after
        matching.sort_by(|a, b| a.predicted_at.cmp(&b.predicted_at));
        matching.reverse();
        matching.truncate(limit);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::FeatureVector;
    use crate::domain::prediction::RiskTier;
    use chrono::{Duration, Utc};

    fn prediction(user_id: UserId, minutes_ago: i64) -> Prediction {
        Prediction {
            user_id,
            probability: 0.5,
            predicted_days_to_drop: 3,
            risk_tier: RiskTier::Low,
            confidence: 0.7,
            recommended_actions: Vec::new(),
            features: FeatureVector::default(),
            model_version: None,
            predicted_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_find_recent_newest_first() {
        let repo = InMemoryPredictionRepository::new();
        repo.save(&prediction(1, 30)).await.unwrap();
        repo.save(&prediction(1, 10)).await.unwrap();
        repo.save(&prediction(2, 5)).await.unwrap();
        repo.save(&prediction(1, 20)).await.unwrap();

        let recent = repo.find_recent(1, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].predicted_at > recent[1].predicted_at);
        assert!(recent.iter().all(|p| p.user_id == 1));
        assert_eq!(repo.count().await, 4);
    }

    #[tokio::test]
    async fn test_empty_model_repository() {
        let repo = InMemoryModelRepository::new();
        assert!(repo.load_active().await.unwrap().is_none());
        assert_eq!(repo.count().await, 0);
    }
}
