use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use streakwise::application::ml::LogisticScorer;
use streakwise::domain::ml::StreakModel;
use streakwise::domain::repositories::ModelRepository;
use streakwise::infrastructure::JsonFileModelRepository;
use streakwise::infrastructure::training_csv::read_training_csv;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the streak model from a CSV training set", long_about = None)]
struct Args {
    /// Path to training data CSV
    #[arg(long, default_value = "data/ml/streak_training.csv")]
    input: PathBuf,

    /// Path to output model file
    #[arg(long, default_value = "data/ml/streak_model.json")]
    output: PathBuf,

    /// Maximum number of rows to use (first N). 0 = use all.
    #[arg(long, default_value_t = 0)]
    max_rows: usize,
}

/// Prints the loss curve at the logged epochs plus the weight table
fn print_report(model: &StreakModel) {
    let params = model.parameters();

    println!("\n=== TRAINING REPORT ===");
    println!("Samples: {}", params.samples);
    println!("Epochs: {} @ lr {}", params.epochs, params.learning_rate);
    for (epoch, loss) in params.loss_history.iter().enumerate().step_by(20) {
        println!("  epoch {:>3}: loss {:.4}", epoch, loss);
    }
    if let Some(final_loss) = params.final_loss() {
        println!("  final    : loss {:.4}", final_loss);
    }
    println!(
        "In-sample accuracy: {:.1}%",
        params.in_sample_accuracy * 100.0
    );
    println!("Reported accuracy: {:.1}%", model.accuracy() * 100.0);

    println!("\nWeights:");
    for (feature, weight) in model.weights().iter() {
        println!("  {:<28} {:>8.4}", feature.name(), weight);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = Args::parse();

    println!("Loading training data from {:?}...", args.input);
    let mut examples = read_training_csv(&args.input)?;
    if args.max_rows > 0 && examples.len() > args.max_rows {
        examples.truncate(args.max_rows);
    }
    println!("Loaded {} examples", examples.len());

    let model = LogisticScorer::train(&examples).context("Training failed")?;
    print_report(&model);

    JsonFileModelRepository::new(&args.output)
        .save(&model)
        .await?;
    println!("\nModel saved to {:?}", args.output);
    Ok(())
}
