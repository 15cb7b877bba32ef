//! Active-model holder shared between the training and serving paths.
//!
//! Readers take an `Arc` snapshot and score against it for the whole request;
//! a retrain publishes a new `Arc` in one swap, so no reader ever sees a
//! half-updated weight set.

use super::logistic_scorer::LogisticScorer;
use crate::domain::ml::StreakModel;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

#[derive(Debug, Default)]
pub struct ModelRegistry {
    active: RwLock<Option<Arc<StreakModel>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: StreakModel) -> Self {
        Self {
            active: RwLock::new(Some(Arc::new(model))),
        }
    }

    /// Replace the active model, returning the superseded one
    pub fn publish(&self, model: Arc<StreakModel>) -> Option<Arc<StreakModel>> {
        info!(
            version = model.version(),
            trained_at = %model.trained_at(),
            "Publishing streak model"
        );
        let mut guard = self.active.write().unwrap_or_else(PoisonError::into_inner);
        guard.replace(model)
    }

    pub fn current(&self) -> Option<Arc<StreakModel>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Scorer bound to the model active right now
    pub fn scorer(&self) -> LogisticScorer {
        match self.current() {
            Some(model) => LogisticScorer::from_model(model),
            None => LogisticScorer::untrained(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.current().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::predictor::StreakPredictor;
    use crate::domain::ml::{FeatureVector, TrainingExample};

    fn trained_model(label: bool) -> StreakModel {
        let example = TrainingExample::new(
            FeatureVector {
                days_since_last_activity: 10,
                ..Default::default()
            },
            label,
        );
        LogisticScorer::train(&[example]).unwrap()
    }

    #[test]
    fn test_empty_registry_is_neutral() {
        let registry = ModelRegistry::new();
        assert!(!registry.is_ready());
        assert!(!registry.scorer().is_ready());
    }

    #[test]
    fn test_publish_returns_previous() {
        let registry = ModelRegistry::new();
        let first = Arc::new(trained_model(true));
        let second = Arc::new(trained_model(false));

        assert!(registry.publish(first.clone()).is_none());
        let previous = registry.publish(second.clone()).unwrap();

        assert!(Arc::ptr_eq(&previous, &first));
        assert!(Arc::ptr_eq(&registry.current().unwrap(), &second));
    }

    #[test]
    fn test_snapshot_survives_publish() {
        let registry = ModelRegistry::with_model(trained_model(true));
        let snapshot = registry.scorer();
        let before = snapshot.model().unwrap().weights().to_owned();

        registry.publish(Arc::new(trained_model(false)));

        assert_eq!(snapshot.model().unwrap().weights(), &before);
        assert_ne!(registry.current().unwrap().weights(), &before);
    }
}
