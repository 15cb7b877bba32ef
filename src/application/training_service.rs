use crate::application::ml::logistic_scorer::LogisticScorer;
use crate::application::ml::model_registry::ModelRegistry;
use crate::application::ml::training_data::TrainingSource;
use crate::domain::errors::StreakError;
use crate::domain::ml::{StreakModel, TrainingExample};
use crate::domain::repositories::ModelRepository;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Offline side of the pipeline: trains off the request path, publishes the
/// result to the [`ModelRegistry`] and stores it best-effort.
///
/// Each run gets its own token, a child of the service's shutdown token.
/// [`cancel_training`](Self::cancel_training) stops only the run in flight;
/// cancelling the shutdown token also refuses every later run.
pub struct ModelTrainingService {
    models: Arc<ModelRegistry>,
    repository: Arc<dyn ModelRepository>,
    shutdown: CancellationToken,
    current_run: Mutex<CancellationToken>,
}

impl ModelTrainingService {
    pub fn new(models: Arc<ModelRegistry>, repository: Arc<dyn ModelRepository>) -> Self {
        let shutdown = CancellationToken::new();
        let current_run = Mutex::new(shutdown.child_token());
        Self {
            models,
            repository,
            shutdown,
            current_run,
        }
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stops the running training at its next epoch. Later runs are unaffected.
    pub fn cancel_training(&self) {
        self.current_run
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    fn start_run(&self) -> CancellationToken {
        let token = self.shutdown.child_token();
        *self
            .current_run
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = token.clone();
        token
    }

    /// Train on a blocking worker, then publish and persist the new model.
    /// On failure the active model is left as it was.
    pub async fn retrain(
        &self,
        examples: Vec<TrainingExample>,
    ) -> Result<Arc<StreakModel>, StreakError> {
        if examples.is_empty() {
            return Err(StreakError::EmptyTrainingSet);
        }

        let token = self.start_run();
        let model = tokio::task::spawn_blocking(move || {
            LogisticScorer::train_cancellable(&examples, &token)
        })
        .await
        .map_err(|e| {
            error!("Training worker failed: {}", e);
            StreakError::TrainingAborted(e.to_string())
        })??;

        let model = Arc::new(model);
        self.models.publish(model.clone());

        if let Err(e) = self.repository.save(&model).await {
            warn!("Could not persist trained streak model: {:#}", e);
        }

        Ok(model)
    }

    pub async fn retrain_from(
        &self,
        source: &mut dyn TrainingSource,
    ) -> Result<Arc<StreakModel>, StreakError> {
        let examples =
            source
                .training_examples()
                .map_err(|e| StreakError::TrainingDataUnavailable {
                    source_name: source.name().to_string(),
                    reason: format!("{:#}", e),
                })?;

        info!(
            source = source.name(),
            samples = examples.len(),
            "Loaded training examples"
        );
        self.retrain(examples).await
    }

    /// Activate the persisted model if there is one, otherwise train from `source`
    pub async fn bootstrap(
        &self,
        source: &mut dyn TrainingSource,
    ) -> Result<Arc<StreakModel>, StreakError> {
        match self.repository.load_active().await {
            Ok(Some(model)) => {
                info!(
                    version = model.version(),
                    trained_at = %model.trained_at(),
                    "Loaded persisted streak model"
                );
                let model = Arc::new(model);
                self.models.publish(model.clone());
                return Ok(model);
            }
            Ok(None) => info!(
                "No persisted streak model, training from {} data",
                source.name()
            ),
            Err(e) => warn!("Could not load persisted streak model, retraining: {:#}", e),
        }

        self.retrain_from(source).await
    }
}
