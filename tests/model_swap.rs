use std::sync::Arc;
use std::thread;
use streakwise::application::ml::{
    LogisticScorer, ModelRegistry, StreakPredictor, SyntheticTrainingSet,
};
use streakwise::application::training_service::ModelTrainingService;
use streakwise::domain::errors::StreakError;
use streakwise::domain::ml::{FeatureVector, StreakModel};
use streakwise::infrastructure::InMemoryModelRepository;

fn model_from_seed(seed: u64) -> StreakModel {
    let examples = SyntheticTrainingSet::seeded(seed, 0).generate(100);
    LogisticScorer::train(&examples).unwrap()
}

fn sample_features() -> FeatureVector {
    FeatureVector {
        days_since_last_activity: 4,
        current_streak_length: 6,
        average_streak_length: 3.5,
        streak_break_frequency: 0.25,
        churn_risk: 0.4,
        last_order_days_ago: 20,
        seasonal_factor: 1.0,
        weekend_activity_ratio: 0.3,
        evening_activity_ratio: 0.5,
        preferred_categories_count: 2,
        ..Default::default()
    }
}

#[test]
fn test_readers_only_see_whole_models() {
    let first = model_from_seed(1);
    let second = model_from_seed(2);
    let p_first = first.predict(&sample_features());
    let p_second = second.predict(&sample_features());
    assert_ne!(p_first, p_second);

    let registry = Arc::new(ModelRegistry::with_model(first.clone()));
    let candidates = [Arc::new(first), Arc::new(second)];

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                for _ in 0..2_000 {
                    let p = registry.scorer().predict(&sample_features());
                    assert!(p == p_first || p == p_second, "torn read: {}", p);
                }
            })
        })
        .collect();

    for i in 0..500 {
        registry.publish(candidates[i % 2].clone());
    }

    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_publish_returns_superseded_model() {
    let registry = ModelRegistry::new();
    let first = Arc::new(model_from_seed(3));
    let second = Arc::new(model_from_seed(4));

    assert!(registry.publish(first.clone()).is_none());
    let previous = registry.publish(second.clone()).unwrap();

    assert!(Arc::ptr_eq(&previous, &first));
    assert!(Arc::ptr_eq(&registry.current().unwrap(), &second));
}

#[test]
fn test_snapshot_survives_swap() {
    let registry = ModelRegistry::with_model(model_from_seed(5));
    let scorer = registry.scorer();
    let before = scorer.predict(&sample_features());

    registry.publish(Arc::new(model_from_seed(6)));

    // A scorer taken before the swap keeps scoring with its own model
    assert_eq!(scorer.predict(&sample_features()), before);
    assert_ne!(registry.scorer().predict(&sample_features()), before);
}

#[tokio::test]
async fn test_empty_training_leaves_prior_model() {
    let registry = Arc::new(ModelRegistry::with_model(model_from_seed(7)));
    let before = registry.current().unwrap();
    let trainer =
        ModelTrainingService::new(registry.clone(), Arc::new(InMemoryModelRepository::new()));

    let result = trainer.retrain(Vec::new()).await;

    assert!(matches!(result, Err(StreakError::EmptyTrainingSet)));
    assert!(Arc::ptr_eq(&registry.current().unwrap(), &before));
    assert!(registry.scorer().is_ready());
}
