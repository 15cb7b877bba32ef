use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use streakwise::application::ml::SyntheticTrainingSet;
use streakwise::infrastructure::training_csv::write_training_csv;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Generate a synthetic streak training set", long_about = None)]
struct Cli {
    /// Number of labeled examples to generate
    #[arg(short, long, default_value_t = 500)]
    samples: usize,

    /// RNG seed; omit for a fresh random set
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(short, long, default_value = "data/ml/streak_training.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let cli = Cli::parse();
    anyhow::ensure!(cli.samples > 0, "--samples must be greater than 0");

    let mut generator = match cli.seed {
        Some(seed) => SyntheticTrainingSet::seeded(seed, cli.samples),
        None => SyntheticTrainingSet::from_entropy(cli.samples),
    };
    let examples = generator.generate(cli.samples);

    let positives = examples.iter().filter(|e| e.label).count();
    info!(
        "Generated {} examples ({} streak breaks, {:.1}%)",
        examples.len(),
        positives,
        positives as f64 / examples.len() as f64 * 100.0
    );

    write_training_csv(&cli.output, &examples)?;
    println!("Training set written to {}", cli.output.display());
    Ok(())
}
