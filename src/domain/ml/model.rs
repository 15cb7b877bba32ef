//! Trained model records.
//!
//! A [`StreakModel`] is produced by a completed training run and never mutated
//! afterwards. Retraining yields a new instance which the caller publishes.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "model_type": "LogisticRegression",
//!   "version": "1.0",
//!   "trained_at": "2026-10-18T08:00:00Z",
//!   "accuracy": 0.85,
//!   "parameters": { "learning_rate": 0.01, "epochs": 100, ... },
//!   "weights": { "churn_risk": 0.1, "days_since_last_activity": 0.25, ... },
//!   "feature_names": ["days_since_last_activity", ...]
//! }
//! ```

use super::feature_registry::{FeatureVector, ModelFeature};
use crate::domain::errors::ModelValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const MODEL_TYPE: &str = "LogisticRegression";
pub const MODEL_VERSION: &str = "1.0";

/// Reported accuracy of every trained model.
///
/// Not measured: training has no held-out split, so this stays a fixed
/// placeholder. See `TrainingParameters::in_sample_accuracy` for a measured value.
pub const PLACEHOLDER_ACCURACY: f64 = 0.85;

const PROBABILITY_FLOOR: f64 = 1e-12;

/// Logistic function, clamped so the result stays strictly inside (0, 1)
pub fn sigmoid(x: f64) -> f64 {
    let p = 1.0 / (1.0 + (-x).exp());
    if p.is_nan() {
        return 0.5;
    }
    p.clamp(PROBABILITY_FLOOR, 1.0 - PROBABILITY_FLOOR)
}

/// One coefficient per [`ModelFeature`].
///
/// Serialized as a `name -> coefficient` map; deserialization rejects missing
/// or unknown names instead of defaulting them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct Weights([f64; ModelFeature::COUNT]);

impl Weights {
    pub fn new(values: [f64; ModelFeature::COUNT]) -> Self {
        Self(values)
    }

    /// Starting coefficients for training, reflecting assumed feature importance
    pub fn prior() -> Self {
        let mut w = [0.0; ModelFeature::COUNT];
        w[ModelFeature::DaysSinceLastActivity.index()] = 0.25;
        w[ModelFeature::CurrentStreakLength.index()] = 0.20;
        w[ModelFeature::AverageStreakLength.index()] = 0.15;
        w[ModelFeature::StreakBreakFrequency.index()] = 0.15;
        w[ModelFeature::ChurnRisk.index()] = 0.10;
        w[ModelFeature::LastOrderDaysAgo.index()] = 0.05;
        w[ModelFeature::SeasonalFactor.index()] = 0.03;
        w[ModelFeature::WeekendActivityRatio.index()] = 0.03;
        w[ModelFeature::EveningActivityRatio.index()] = 0.02;
        w[ModelFeature::PreferredCategoriesCount.index()] = 0.02;
        Self(w)
    }

    pub fn get(&self, feature: ModelFeature) -> f64 {
        self.0[feature.index()]
    }

    pub fn as_array(&self) -> &[f64; ModelFeature::COUNT] {
        &self.0
    }

    pub(crate) fn as_mut_array(&mut self) -> &mut [f64; ModelFeature::COUNT] {
        &mut self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelFeature, f64)> + '_ {
        ModelFeature::ALL
            .into_iter()
            .map(move |f| (f, self.0[f.index()]))
    }

    /// Weighted sum over scorer inputs
    pub fn dot(&self, inputs: &[f64; ModelFeature::COUNT]) -> f64 {
        self.0.iter().zip(inputs.iter()).map(|(w, x)| w * x).sum()
    }
}

impl From<Weights> for BTreeMap<String, f64> {
    fn from(weights: Weights) -> Self {
        weights
            .iter()
            .map(|(f, w)| (f.name().to_string(), w))
            .collect()
    }
}

impl TryFrom<BTreeMap<String, f64>> for Weights {
    type Error = ModelValidationError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut values = [0.0; ModelFeature::COUNT];
        let mut seen = [false; ModelFeature::COUNT];

        for (name, weight) in map {
            let feature = name
                .parse::<ModelFeature>()
                .map_err(|_| ModelValidationError::UnknownWeight { name })?;
            values[feature.index()] = weight;
            seen[feature.index()] = true;
        }

        if let Some(missing) = ModelFeature::ALL.iter().find(|f| !seen[f.index()]) {
            return Err(ModelValidationError::MissingWeight {
                feature: missing.name().to_string(),
            });
        }

        Ok(Self(values))
    }
}

/// Hyperparameters and diagnostics of the run that produced a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParameters {
    pub learning_rate: f64,
    pub epochs: usize,
    pub samples: usize,
    /// Average cross-entropy loss per epoch
    pub loss_history: Vec<f64>,
    /// Fraction of training examples classified correctly at p >= 0.5
    pub in_sample_accuracy: f64,
}

impl TrainingParameters {
    pub fn final_loss(&self) -> Option<f64> {
        self.loss_history.last().copied()
    }
}

/// Labeled example: `label` is true when the streak broke within the prediction window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub features: FeatureVector,
    pub label: bool,
}

impl TrainingExample {
    pub fn new(features: FeatureVector, label: bool) -> Self {
        Self { features, label }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StreakModelRecord")]
pub struct StreakModel {
    model_type: String,
    version: String,
    trained_at: DateTime<Utc>,
    accuracy: f64,
    parameters: TrainingParameters,
    weights: Weights,
    feature_names: Vec<String>,
}

impl StreakModel {
    pub(crate) fn trained(
        weights: Weights,
        parameters: TrainingParameters,
        trained_at: DateTime<Utc>,
    ) -> Self {
        Self {
            model_type: MODEL_TYPE.to_string(),
            version: MODEL_VERSION.to_string(),
            trained_at,
            accuracy: PLACEHOLDER_ACCURACY,
            parameters,
            weights,
            feature_names: ModelFeature::names(),
        }
    }

    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn parameters(&self) -> &TrainingParameters {
        &self.parameters
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Probability that the streak lapses, strictly inside (0, 1)
    pub fn predict(&self, features: &FeatureVector) -> f64 {
        sigmoid(self.weights.dot(&features.model_inputs()))
    }
}

/// Wire shape of a persisted model, validated into [`StreakModel`]
#[derive(Debug, Deserialize)]
struct StreakModelRecord {
    model_type: String,
    version: String,
    trained_at: DateTime<Utc>,
    accuracy: f64,
    parameters: TrainingParameters,
    weights: Weights,
    feature_names: Vec<String>,
}

impl TryFrom<StreakModelRecord> for StreakModel {
    type Error = ModelValidationError;

    fn try_from(record: StreakModelRecord) -> Result<Self, Self::Error> {
        if record.model_type != MODEL_TYPE {
            return Err(ModelValidationError::UnsupportedModelType {
                model_type: record.model_type,
            });
        }

        if record.feature_names.len() != ModelFeature::COUNT {
            return Err(ModelValidationError::FeatureNamesMismatch {
                expected: ModelFeature::COUNT,
                actual: record.feature_names.len(),
            });
        }

        let mut seen = HashSet::new();
        for name in &record.feature_names {
            let feature = name
                .parse::<ModelFeature>()
                .map_err(|_| ModelValidationError::UnknownFeature { name: name.clone() })?;
            if !seen.insert(feature) {
                return Err(ModelValidationError::DuplicateFeature {
                    feature: name.clone(),
                });
            }
        }

        Ok(Self {
            model_type: record.model_type,
            version: record.version,
            trained_at: record.trained_at,
            accuracy: record.accuracy,
            parameters: record.parameters,
            weights: record.weights,
            feature_names: record.feature_names,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_features() -> FeatureVector {
        FeatureVector {
            days_since_last_activity: 8,
            current_streak_length: 3,
            average_streak_length: 7.5,
            streak_break_frequency: 0.3,
            churn_risk: 0.75,
            last_order_days_ago: 5,
            seasonal_factor: 1.0,
            weekend_activity_ratio: 0.4,
            evening_activity_ratio: 0.6,
            preferred_categories_count: 2,
            ..Default::default()
        }
    }

    fn sample_parameters() -> TrainingParameters {
        TrainingParameters {
            learning_rate: 0.01,
            epochs: 100,
            samples: 1,
            loss_history: vec![0.7, 0.5],
            in_sample_accuracy: 1.0,
        }
    }

    #[test]
    fn test_prior_weighted_sum() {
        let sum = Weights::prior().dot(&demo_features().model_inputs());
        assert!((sum - 4.189).abs() < 1e-9);
        assert!((sigmoid(sum) - 0.985).abs() < 0.001);
    }

    #[test]
    fn test_sigmoid_stays_open_interval() {
        assert!(sigmoid(1e6) < 1.0);
        assert!(sigmoid(-1e6) > 0.0);
        assert_eq!(sigmoid(0.0), 0.5);
        assert_eq!(sigmoid(f64::NAN), 0.5);
    }

    #[test]
    fn test_model_json_round_trip() {
        let model = StreakModel::trained(Weights::prior(), sample_parameters(), Utc::now());

        let json = serde_json::to_string(&model).unwrap();
        let restored: StreakModel = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.weights(), model.weights());
        assert_eq!(restored.feature_names(), model.feature_names());
        assert_eq!(restored, model);
    }

    #[test]
    fn test_missing_weight_rejected() {
        let mut map: BTreeMap<String, f64> = Weights::prior().into();
        map.remove("churn_risk");

        let err = Weights::try_from(map).unwrap_err();
        assert_eq!(
            err,
            ModelValidationError::MissingWeight {
                feature: "churn_risk".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_weight_rejected() {
        let mut map: BTreeMap<String, f64> = Weights::prior().into();
        map.insert("total_orders".to_string(), 0.4);

        assert!(matches!(
            Weights::try_from(map),
            Err(ModelValidationError::UnknownWeight { .. })
        ));
    }

    #[test]
    fn test_feature_name_list_validated() {
        let model = StreakModel::trained(Weights::prior(), sample_parameters(), Utc::now());
        let mut value = serde_json::to_value(&model).unwrap();
        value["feature_names"] = serde_json::json!(["churn_risk"]);

        let result: Result<StreakModel, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_feature_name_reported_as_feature() {
        let model = StreakModel::trained(Weights::prior(), sample_parameters(), Utc::now());
        let mut names = ModelFeature::names();
        names[4] = "total_orders".to_string();

        let err = StreakModel::try_from(StreakModelRecord {
            model_type: MODEL_TYPE.to_string(),
            version: MODEL_VERSION.to_string(),
            trained_at: model.trained_at(),
            accuracy: model.accuracy(),
            parameters: model.parameters().clone(),
            weights: *model.weights(),
            feature_names: names,
        })
        .unwrap_err();

        assert_eq!(
            err,
            ModelValidationError::UnknownFeature {
                name: "total_orders".to_string()
            }
        );
        assert!(err.to_string().contains("feature names"));
    }

    #[test]
    fn test_trained_model_uses_placeholder_accuracy() {
        let model = StreakModel::trained(Weights::prior(), sample_parameters(), Utc::now());
        assert_eq!(model.accuracy(), PLACEHOLDER_ACCURACY);
        assert_eq!(model.model_type(), MODEL_TYPE);
        assert_eq!(model.parameters().final_loss(), Some(0.5));
    }
}
