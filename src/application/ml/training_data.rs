use crate::domain::ml::{FeatureVector, TrainingExample};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplier of labeled examples for a training run.
///
/// The synthetic generator below bootstraps a model when no history exists;
/// a historical export (see `CsvTrainingSource`) plugs in the same way.
pub trait TrainingSource: Send {
    fn name(&self) -> &str;

    fn training_examples(&mut self) -> anyhow::Result<Vec<TrainingExample>>;
}

/// Bootstrap labeling rule: the streak breaks when the user is idle for over a
/// week, churn is high, or the last order is over a month old
pub fn bootstrap_label(features: &FeatureVector) -> bool {
    features.days_since_last_activity > 7
        || features.churn_risk > 0.7
        || features.last_order_days_ago > 30
}

/// Draws each feature uniformly over its domain and labels it with [`bootstrap_label`]
pub struct SyntheticTrainingSet<R: Rng = StdRng> {
    rng: R,
    samples: usize,
}

impl SyntheticTrainingSet<StdRng> {
    /// Reproducible generator: same seed, same examples
    pub fn seeded(seed: u64, samples: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), samples)
    }

    pub fn from_entropy(samples: usize) -> Self {
        Self::with_rng(StdRng::from_os_rng(), samples)
    }
}

impl<R: Rng> SyntheticTrainingSet<R> {
    pub fn with_rng(rng: R, samples: usize) -> Self {
        Self { rng, samples }
    }

    pub fn generate(&mut self, count: usize) -> Vec<TrainingExample> {
        (0..count)
            .map(|_| {
                let features = self.sample_features();
                let label = bootstrap_label(&features);
                TrainingExample::new(features, label)
            })
            .collect()
    }

    fn sample_features(&mut self) -> FeatureVector {
        let rng = &mut self.rng;
        FeatureVector {
            days_since_last_activity: rng.random_range(0..30),
            current_streak_length: rng.random_range(0..20),
            average_streak_length: rng.random::<f64>() * 10.0,
            streak_break_frequency: rng.random::<f64>(),
            total_activities: rng.random_range(0..50),
            days_since_registration: rng.random_range(0..365),
            average_order_value: rng.random::<f64>() * 1_000_000.0,
            total_orders: rng.random_range(0..20),
            churn_risk: rng.random::<f64>(),
            preferred_categories_count: rng.random_range(0..5),
            last_order_days_ago: rng.random_range(0..60),
            seasonal_factor: rng.random_range(0.8..1.2),
            weekend_activity_ratio: rng.random::<f64>(),
            evening_activity_ratio: rng.random::<f64>(),
        }
    }
}

impl<R: Rng + Send> TrainingSource for SyntheticTrainingSet<R> {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn training_examples(&mut self) -> anyhow::Result<Vec<TrainingExample>> {
        let samples = self.samples;
        Ok(self.generate(samples))
    }
}
