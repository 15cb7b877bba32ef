//! Streakwise demo - streak-lapse predictions for seeded users
//!
//! Seeds an in-memory engagement store, loads (or trains and saves) the active
//! model, then predicts for every seeded user and prints the records.
//!
//! # Usage
//! ```sh
//! SYNTHETIC_TRAINING_SEED=42 cargo run --bin streakwise
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use streakwise::application::ml::{ModelRegistry, SyntheticTrainingSet, TrainingSource};
use streakwise::application::prediction_service::StreakPredictionService;
use streakwise::application::training_service::ModelTrainingService;
use streakwise::config::Config;
use streakwise::domain::ml::StreakModel;
use streakwise::domain::prediction::Prediction;
use streakwise::infrastructure::sample_data::seed_demo_users;
use streakwise::infrastructure::{
    InMemoryEngagementStore, InMemoryPredictionRepository, JsonFileModelRepository,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    config.observability.init_tracing();

    info!("Streakwise {} starting...", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(InMemoryEngagementStore::new());
    seed_demo_users(&store, Utc::now()).await;

    let models = Arc::new(ModelRegistry::new());
    let trainer = ModelTrainingService::new(
        models.clone(),
        Arc::new(JsonFileModelRepository::new(&config.model.model_path)),
    );

    let mut source: Box<dyn TrainingSource> = match config.model.synthetic_seed {
        Some(seed) => Box::new(SyntheticTrainingSet::seeded(
            seed,
            config.model.synthetic_samples,
        )),
        None => Box::new(SyntheticTrainingSet::from_entropy(
            config.model.synthetic_samples,
        )),
    };

    // Ctrl+C while training stops it at the next epoch
    let shutdown = trainer.shutdown_token();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Shutdown signal received, cancelling training");
            shutdown.cancel();
        }
    });

    let bootstrapped = trainer.bootstrap(source.as_mut()).await;
    signal_task.abort();
    let model = bootstrapped.context("Failed to activate a streak model")?;
    print_model(&model);

    let predictions = Arc::new(InMemoryPredictionRepository::new());
    let service = StreakPredictionService::new(
        config.features.extractor(),
        store.clone(),
        models,
        predictions,
    );

    for user_id in store.user_ids().await {
        match service.predict_for_user(user_id).await {
            Ok(prediction) => print_prediction(&prediction),
            Err(e) => warn!(user_id, "Prediction failed: {}", e),
        }
    }

    for user_id in store.user_ids().await {
        let history = service.recent_predictions(user_id, 5).await?;
        info!(user_id, stored = history.len(), "Prediction history");
    }

    Ok(())
}

fn print_model(model: &StreakModel) {
    println!("=== MODEL ===");
    println!("Type: {} v{}", model.model_type(), model.version());
    println!("Trained: {}", model.trained_at().format("%Y-%m-%d %H:%M:%S"));
    println!("Accuracy: {:.1}%", model.accuracy() * 100.0);
    println!(
        "In-sample accuracy: {:.1}% over {} samples",
        model.parameters().in_sample_accuracy * 100.0,
        model.parameters().samples
    );
    println!("Weights:");
    for (feature, weight) in model.weights().iter() {
        println!("  • {}: {:.3}", feature, weight);
    }
}

fn print_prediction(prediction: &Prediction) {
    let f = &prediction.features;
    println!("\n=== USER {} ===", prediction.user_id);
    println!("Streak drop probability: {:.1}%", prediction.probability * 100.0);
    println!("Predicted days to drop: {}", prediction.predicted_days_to_drop);
    println!("Risk level: {}", prediction.risk_tier);
    println!("Confidence: {:.1}%", prediction.confidence * 100.0);
    println!("Days since last activity: {}", f.days_since_last_activity);
    println!("Current streak: {}", f.current_streak_length);
    println!("Average streak: {:.1}", f.average_streak_length);
    println!("Break frequency: {:.1}%", f.streak_break_frequency * 100.0);
    println!("Last order days ago: {}", f.last_order_days_ago);
    println!("Churn risk: {:.1}%", f.churn_risk * 100.0);
    println!("Recommended actions:");
    for (i, action) in prediction.recommended_actions.iter().enumerate() {
        println!("  {}. {}", i + 1, action);
    }
    match serde_json::to_string(prediction) {
        Ok(json) => println!("Record: {}", json),
        Err(e) => warn!("Could not serialize prediction: {}", e),
    }
}
