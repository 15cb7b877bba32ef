use crate::application::ml::feature_extractor::FeatureExtractor;
use crate::application::ml::model_registry::ModelRegistry;
use crate::application::ml::predictor::StreakPredictor;
use crate::application::risk::{ActionRecommender, ConfidenceEstimator, RiskClassifier};
use crate::domain::engagement::UserId;
use crate::domain::errors::StreakError;
use crate::domain::ml::FeatureVector;
use crate::domain::ports::EngagementDataSource;
use crate::domain::prediction::Prediction;
use crate::domain::repositories::PredictionRepository;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{info, warn};

/// Assembles streak-lapse predictions: extraction, scoring, tiering,
/// confidence and recommendations, bundled into one [`Prediction`].
pub struct StreakPredictionService {
    extractor: FeatureExtractor,
    classifier: RiskClassifier,
    confidence: ConfidenceEstimator,
    recommender: ActionRecommender,
    data_source: Arc<dyn EngagementDataSource>,
    models: Arc<ModelRegistry>,
    predictions: Arc<dyn PredictionRepository>,
}

impl StreakPredictionService {
    pub fn new(
        extractor: FeatureExtractor,
        data_source: Arc<dyn EngagementDataSource>,
        models: Arc<ModelRegistry>,
        predictions: Arc<dyn PredictionRepository>,
    ) -> Self {
        Self {
            extractor,
            classifier: RiskClassifier::new(),
            confidence: ConfidenceEstimator,
            recommender: ActionRecommender,
            data_source,
            models,
            predictions,
        }
    }

    /// Replaces the default tier cut-offs
    pub fn with_classifier(mut self, classifier: RiskClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub async fn predict_for_user(&self, user_id: UserId) -> Result<Prediction, StreakError> {
        self.predict_for_user_at(user_id, Utc::now()).await
    }

    /// Predicts as of `now`. A failed data lookup aborts the prediction; a
    /// failed save of the finished prediction is only logged.
    pub async fn predict_for_user_at(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Prediction, StreakError> {
        let features = self
            .extractor
            .extract_for_user(self.data_source.as_ref(), user_id, now)
            .await?;

        let scorer = self.models.scorer();
        if !scorer.is_ready() {
            warn!(user_id, "No trained streak model, using neutral probability");
        }

        let prediction = self.assemble(user_id, features, &scorer, now);

        info!(
            user_id,
            probability = prediction.probability,
            risk_tier = %prediction.risk_tier,
            days_to_drop = prediction.predicted_days_to_drop,
            "Streak prediction ready"
        );

        if let Err(e) = self.predictions.save(&prediction).await {
            warn!(user_id, "Could not save streak prediction: {:#}", e);
        }

        Ok(prediction)
    }

    /// Pure assembly from an extracted feature vector
    pub fn assemble(
        &self,
        user_id: UserId,
        features: FeatureVector,
        predictor: &dyn StreakPredictor,
        now: DateTime<Utc>,
    ) -> Prediction {
        let probability = predictor.predict(&features);
        let risk_tier = self.classifier.classify(probability);

        Prediction {
            user_id,
            probability,
            predicted_days_to_drop: self.classifier.predicted_days_to_drop(&features, probability),
            risk_tier,
            confidence: self.confidence.estimate(&features),
            recommended_actions: self.recommender.recommend(risk_tier, &features),
            model_version: predictor.version().map(str::to_string),
            features,
            predicted_at: now,
        }
    }

    /// Scores pre-extracted features in parallel against one model snapshot.
    /// Results are not persisted.
    pub fn assemble_batch(
        &self,
        batch: Vec<(UserId, FeatureVector)>,
        now: DateTime<Utc>,
    ) -> Vec<Prediction> {
        let scorer = self.models.scorer();
        batch
            .into_par_iter()
            .map(|(user_id, features)| self.assemble(user_id, features, &scorer, now))
            .collect()
    }

    pub async fn recent_predictions(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> anyhow::Result<Vec<Prediction>> {
        self.predictions.find_recent(user_id, limit).await
    }
}
