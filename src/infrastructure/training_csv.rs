//! CSV import/export of labeled training examples.
//!
//! One row per example: the fourteen extracted features followed by the
//! `label` column (`true` when the streak broke).

use crate::application::ml::TrainingSource;
use crate::domain::ml::{FeatureVector, TrainingExample};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
struct TrainingRecord {
    days_since_last_activity: u32,
    current_streak_length: u32,
    average_streak_length: f64,
    streak_break_frequency: f64,
    total_activities: u32,
    days_since_registration: u32,
    average_order_value: f64,
    total_orders: u32,
    churn_risk: f64,
    preferred_categories_count: u32,
    last_order_days_ago: u32,
    seasonal_factor: f64,
    weekend_activity_ratio: f64,
    evening_activity_ratio: f64,
    label: bool,
}

impl From<&TrainingExample> for TrainingRecord {
    fn from(example: &TrainingExample) -> Self {
        let f = &example.features;
        Self {
            days_since_last_activity: f.days_since_last_activity,
            current_streak_length: f.current_streak_length,
            average_streak_length: f.average_streak_length,
            streak_break_frequency: f.streak_break_frequency,
            total_activities: f.total_activities,
            days_since_registration: f.days_since_registration,
            average_order_value: f.average_order_value,
            total_orders: f.total_orders,
            churn_risk: f.churn_risk,
            preferred_categories_count: f.preferred_categories_count,
            last_order_days_ago: f.last_order_days_ago,
            seasonal_factor: f.seasonal_factor,
            weekend_activity_ratio: f.weekend_activity_ratio,
            evening_activity_ratio: f.evening_activity_ratio,
            label: example.label,
        }
    }
}

impl From<TrainingRecord> for TrainingExample {
    fn from(r: TrainingRecord) -> Self {
        let features = FeatureVector {
            days_since_last_activity: r.days_since_last_activity,
            current_streak_length: r.current_streak_length,
            average_streak_length: r.average_streak_length,
            streak_break_frequency: r.streak_break_frequency,
            total_activities: r.total_activities,
            days_since_registration: r.days_since_registration,
            average_order_value: r.average_order_value,
            total_orders: r.total_orders,
            churn_risk: r.churn_risk,
            preferred_categories_count: r.preferred_categories_count,
            last_order_days_ago: r.last_order_days_ago,
            seasonal_factor: r.seasonal_factor,
            weekend_activity_ratio: r.weekend_activity_ratio,
            evening_activity_ratio: r.evening_activity_ratio,
        };
        TrainingExample::new(features, r.label)
    }
}

/// Writes `examples` to `path`, replacing any existing file
pub fn write_training_csv(path: &Path, examples: &[TrainingExample]) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {:?}", dir))?;
    }

    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create training file {:?}", path))?;
    for example in examples {
        wtr.serialize(TrainingRecord::from(example))
            .context("Failed to serialize training example")?;
    }
    wtr.flush().context("Failed to flush CSV writer")?;

    info!("Wrote {} training examples to {:?}", examples.len(), path);
    Ok(())
}

pub fn read_training_csv(path: &Path) -> Result<Vec<TrainingExample>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open training file {:?}", path))?;
    let mut rdr = csv::Reader::from_reader(BufReader::new(file));

    let mut examples = Vec::new();
    for (row, result) in rdr.deserialize::<TrainingRecord>().enumerate() {
        let record = result.with_context(|| format!("Malformed training row {}", row + 1))?;
        examples.push(record.into());
    }
    Ok(examples)
}

/// Historical training examples exported to CSV
pub struct CsvTrainingSource {
    path: PathBuf,
    name: String,
}

impl CsvTrainingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("csv:{}", path.display());
        Self { path, name }
    }
}

impl TrainingSource for CsvTrainingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn training_examples(&mut self) -> Result<Vec<TrainingExample>> {
        read_training_csv(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::{LogisticScorer, SyntheticTrainingSet};
    use crate::domain::errors::StreakError;

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training.csv");
        let examples = SyntheticTrainingSet::seeded(3, 0).generate(40);

        write_training_csv(&path, &examples).unwrap();
        let mut source = CsvTrainingSource::new(&path);
        let loaded = source.training_examples().unwrap();

        assert_eq!(loaded, examples);
        assert!(source.name().starts_with("csv:"));
    }

    #[test]
    fn test_non_finite_row_fails_training() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        let mut examples = SyntheticTrainingSet::seeded(8, 0).generate(5);
        examples[2].features.average_streak_length = f64::INFINITY;
        write_training_csv(&path, &examples).unwrap();

        let loaded = read_training_csv(&path).unwrap();
        assert!(loaded[2].features.average_streak_length.is_infinite());

        assert!(matches!(
            LogisticScorer::train(&loaded),
            Err(StreakError::InvalidTrainingExample { index: 2, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut source = CsvTrainingSource::new("/nonexistent/streaks.csv");
        assert!(source.training_examples().is_err());
    }

    #[test]
    fn test_malformed_row_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let examples = SyntheticTrainingSet::seeded(5, 0).generate(1);
        write_training_csv(&path, &examples).unwrap();

        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("not,a,valid,row\n");
        std::fs::write(&path, content).unwrap();

        let err = read_training_csv(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("row 2"));
    }
}
