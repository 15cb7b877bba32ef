use super::predictor::{NEUTRAL_PROBABILITY, StreakPredictor};
use crate::domain::errors::StreakError;
use crate::domain::ml::model::sigmoid;
use crate::domain::ml::{FeatureVector, StreakModel, TrainingExample, TrainingParameters, Weights};
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const LEARNING_RATE: f64 = 0.01;
pub const EPOCHS: usize = 100;

const LOSS_EPSILON: f64 = 1e-15;
const LOG_EVERY_EPOCHS: usize = 20;

/// Logistic scorer over the ten model features.
///
/// Holds an immutable model snapshot (or none). Training never touches the
/// snapshot: it produces a fresh [`StreakModel`] that the caller publishes.
#[derive(Debug, Clone, Default)]
pub struct LogisticScorer {
    model: Option<Arc<StreakModel>>,
}

impl LogisticScorer {
    pub fn untrained() -> Self {
        Self { model: None }
    }

    pub fn from_model(model: Arc<StreakModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn model(&self) -> Option<&Arc<StreakModel>> {
        self.model.as_ref()
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Runs the fixed training procedure: weights start at [`Weights::prior`],
    /// then [`EPOCHS`] passes of per-example gradient steps at [`LEARNING_RATE`].
    pub fn train(examples: &[TrainingExample]) -> Result<StreakModel, StreakError> {
        Self::train_cancellable(examples, &CancellationToken::new())
    }

    /// Same as [`LogisticScorer::train`], checking `cancel` before every epoch
    pub fn train_cancellable(
        examples: &[TrainingExample],
        cancel: &CancellationToken,
    ) -> Result<StreakModel, StreakError> {
        if examples.is_empty() {
            return Err(StreakError::EmptyTrainingSet);
        }
        validate_examples(examples)?;

        info!(
            samples = examples.len(),
            epochs = EPOCHS,
            learning_rate = LEARNING_RATE,
            "Training streak model"
        );

        let mut weights = Weights::prior();
        let mut loss_history = Vec::with_capacity(EPOCHS);

        for epoch in 0..EPOCHS {
            if cancel.is_cancelled() {
                info!(epoch, "Training cancelled");
                return Err(StreakError::TrainingCancelled {
                    completed_epochs: epoch,
                    total_epochs: EPOCHS,
                });
            }

            let mut total_loss = 0.0;
            for example in examples {
                let inputs = example.features.model_inputs();
                let predicted = sigmoid(weights.dot(&inputs));
                let actual = label_value(example.label);

                total_loss += cross_entropy(predicted, actual);

                let error = predicted - actual;
                for (weight, x) in weights.as_mut_array().iter_mut().zip(inputs.iter()) {
                    *weight -= LEARNING_RATE * error * x;
                }
            }

            if let Some(feature) = weights.iter().find(|(_, w)| !w.is_finite()).map(|(f, _)| f) {
                return Err(StreakError::TrainingDiverged {
                    epoch,
                    feature: feature.name(),
                });
            }

            let average_loss = total_loss / examples.len() as f64;
            loss_history.push(average_loss);

            if epoch % LOG_EVERY_EPOCHS == 0 {
                info!("Epoch {}, Average Loss: {:.4}", epoch, average_loss);
            } else {
                debug!("Epoch {}, Average Loss: {:.4}", epoch, average_loss);
            }
        }

        let in_sample_accuracy = accuracy(&weights, examples);
        let parameters = TrainingParameters {
            learning_rate: LEARNING_RATE,
            epochs: EPOCHS,
            samples: examples.len(),
            loss_history,
            in_sample_accuracy,
        };

        info!(
            final_loss = parameters.final_loss().unwrap_or_default(),
            in_sample_accuracy, "Streak model trained"
        );

        Ok(StreakModel::trained(weights, parameters, Utc::now()))
    }
}

impl StreakPredictor for LogisticScorer {
    fn predict(&self, features: &FeatureVector) -> f64 {
        match &self.model {
            Some(model) => model.predict(features),
            None => NEUTRAL_PROBABILITY,
        }
    }

    fn is_ready(&self) -> bool {
        self.is_trained()
    }

    fn name(&self) -> &str {
        "Logistic Streak Scorer"
    }

    fn version(&self) -> Option<&str> {
        self.model.as_deref().map(StreakModel::version)
    }
}

/// Rejects the first example with a non-finite or out-of-range feature
fn validate_examples(examples: &[TrainingExample]) -> Result<(), StreakError> {
    for (index, example) in examples.iter().enumerate() {
        if let Some((feature, value)) = example.features.out_of_domain() {
            return Err(StreakError::InvalidTrainingExample {
                index,
                feature,
                value,
            });
        }
    }
    Ok(())
}

fn label_value(label: bool) -> f64 {
    if label { 1.0 } else { 0.0 }
}

/// Binary cross-entropy with an epsilon inside each log
fn cross_entropy(predicted: f64, actual: f64) -> f64 {
    -(actual * (predicted + LOSS_EPSILON).ln()
        + (1.0 - actual) * (1.0 - predicted + LOSS_EPSILON).ln())
}

fn accuracy(weights: &Weights, examples: &[TrainingExample]) -> f64 {
    let correct = examples
        .iter()
        .filter(|e| (sigmoid(weights.dot(&e.features.model_inputs())) >= 0.5) == e.label)
        .count();
    correct as f64 / examples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positive() -> TrainingExample {
        TrainingExample::new(
            FeatureVector {
                days_since_last_activity: 20,
                churn_risk: 0.9,
                seasonal_factor: 1.0,
                ..Default::default()
            },
            true,
        )
    }

    fn negative() -> TrainingExample {
        TrainingExample::new(
            FeatureVector {
                seasonal_factor: 1.0,
                ..Default::default()
            },
            false,
        )
    }

    #[test]
    fn test_empty_training_set_rejected() {
        let result = LogisticScorer::train(&[]);
        assert!(matches!(result, Err(StreakError::EmptyTrainingSet)));
    }

    #[test]
    fn test_non_finite_feature_rejected_before_training() {
        let mut examples: Vec<TrainingExample> = (0..10)
            .map(|i| if i % 2 == 0 { positive() } else { negative() })
            .collect();
        examples[6].features.average_streak_length = f64::INFINITY;

        let result = LogisticScorer::train(&examples);

        assert!(matches!(
            result,
            Err(StreakError::InvalidTrainingExample {
                index: 6,
                feature: "average_streak_length",
                ..
            })
        ));
    }

    #[test]
    fn test_out_of_range_ratio_rejected() {
        let mut churned = positive();
        churned.features.churn_risk = 1.2;
        let mut nan = negative();
        nan.features.evening_activity_ratio = f64::NAN;

        assert!(matches!(
            LogisticScorer::train(&[negative(), churned]),
            Err(StreakError::InvalidTrainingExample {
                index: 1,
                feature: "churn_risk",
                ..
            })
        ));
        assert!(matches!(
            LogisticScorer::train(&[nan]),
            Err(StreakError::InvalidTrainingExample {
                index: 0,
                feature: "evening_activity_ratio",
                ..
            })
        ));
    }

    #[test]
    fn test_trained_model_survives_json() {
        let model = LogisticScorer::train(&[positive(), negative()]).unwrap();
        assert!(model.weights().iter().all(|(_, w)| w.is_finite()));

        let json = serde_json::to_string(&model).unwrap();
        let restored: StreakModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.weights(), model.weights());
    }

    #[test]
    fn test_untrained_scorer_is_neutral() {
        let scorer = LogisticScorer::untrained();
        assert!(!scorer.is_ready());
        assert_eq!(scorer.predict(&positive().features), NEUTRAL_PROBABILITY);
        assert_eq!(scorer.version(), None);
    }

    #[test]
    fn test_training_reduces_loss_and_separates_classes() {
        let model = LogisticScorer::train(&[positive(), negative()]).unwrap();

        let params = model.parameters();
        assert_eq!(params.loss_history.len(), EPOCHS);
        assert_eq!(params.samples, 2);
        assert!(params.final_loss().unwrap() < params.loss_history[0]);
        assert_eq!(params.in_sample_accuracy, 1.0);

        let scorer = LogisticScorer::from_model(Arc::new(model));
        assert!(scorer.predict(&positive().features) > 0.5);
        assert!(scorer.predict(&negative().features) < 0.5);
    }

    #[test]
    fn test_training_is_deterministic() {
        let examples = vec![positive(), negative(), positive()];
        let a = LogisticScorer::train(&examples).unwrap();
        let b = LogisticScorer::train(&examples).unwrap();
        assert_eq!(a.weights(), b.weights());
    }

    #[test]
    fn test_cancelled_before_first_epoch() {
        let token = CancellationToken::new();
        token.cancel();

        let result = LogisticScorer::train_cancellable(&[positive()], &token);
        assert!(matches!(
            result,
            Err(StreakError::TrainingCancelled {
                completed_epochs: 0,
                total_epochs: EPOCHS
            })
        ));
    }

    #[test]
    fn test_gradient_step_matches_update_rule() {
        // A single all-zero example leaves every weight where the prior put it
        let zero = TrainingExample::new(FeatureVector::default(), false);
        let model = LogisticScorer::train(&[zero]).unwrap();
        assert_eq!(model.weights(), &Weights::prior());
        // sigmoid(0) = 0.5 against label 0
        assert!((model.parameters().loss_history[0] - 2f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_cross_entropy_is_finite_at_extremes() {
        assert!(cross_entropy(1.0, 0.0).is_finite());
        assert!(cross_entropy(0.0, 1.0).is_finite());
        assert!(cross_entropy(0.5, 1.0) > 0.0);
    }
}
