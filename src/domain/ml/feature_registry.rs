use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inputs of the logistic scorer, in canonical order.
///
/// Weight storage, model records and training files all index by this enum, so
/// adding or renaming a feature is a breaking change for persisted models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFeature {
    DaysSinceLastActivity,
    CurrentStreakLength,
    AverageStreakLength,
    StreakBreakFrequency,
    ChurnRisk,
    LastOrderDaysAgo,
    SeasonalFactor,
    WeekendActivityRatio,
    EveningActivityRatio,
    PreferredCategoriesCount,
}

impl ModelFeature {
    pub const COUNT: usize = 10;

    pub const ALL: [ModelFeature; Self::COUNT] = [
        ModelFeature::DaysSinceLastActivity,
        ModelFeature::CurrentStreakLength,
        ModelFeature::AverageStreakLength,
        ModelFeature::StreakBreakFrequency,
        ModelFeature::ChurnRisk,
        ModelFeature::LastOrderDaysAgo,
        ModelFeature::SeasonalFactor,
        ModelFeature::WeekendActivityRatio,
        ModelFeature::EveningActivityRatio,
        ModelFeature::PreferredCategoriesCount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelFeature::DaysSinceLastActivity => "days_since_last_activity",
            ModelFeature::CurrentStreakLength => "current_streak_length",
            ModelFeature::AverageStreakLength => "average_streak_length",
            ModelFeature::StreakBreakFrequency => "streak_break_frequency",
            ModelFeature::ChurnRisk => "churn_risk",
            ModelFeature::LastOrderDaysAgo => "last_order_days_ago",
            ModelFeature::SeasonalFactor => "seasonal_factor",
            ModelFeature::WeekendActivityRatio => "weekend_activity_ratio",
            ModelFeature::EveningActivityRatio => "evening_activity_ratio",
            ModelFeature::PreferredCategoriesCount => "preferred_categories_count",
        }
    }

    /// Position of this feature in weight and input arrays
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|f| f.name().to_string()).collect()
    }
}

impl fmt::Display for ModelFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelFeature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("Unknown model feature: {}", s))
    }
}

/// Behavioral signals for one user at one point in time.
///
/// Sentinel 999 in `days_since_last_activity` / `last_order_days_ago` means
/// "no streak record" / "no orders".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub days_since_last_activity: u32,
    pub current_streak_length: u32,
    pub average_streak_length: f64,
    pub streak_break_frequency: f64,
    pub total_activities: u32,
    pub days_since_registration: u32,
    pub average_order_value: f64,
    pub total_orders: u32,
    pub churn_risk: f64,
    pub preferred_categories_count: u32,
    pub last_order_days_ago: u32,
    pub seasonal_factor: f64,
    pub weekend_activity_ratio: f64,
    pub evening_activity_ratio: f64,
}

impl FeatureVector {
    pub const UNKNOWN_DAYS: u32 = 999;

    pub fn value(&self, feature: ModelFeature) -> f64 {
        match feature {
            ModelFeature::DaysSinceLastActivity => f64::from(self.days_since_last_activity),
            ModelFeature::CurrentStreakLength => f64::from(self.current_streak_length),
            ModelFeature::AverageStreakLength => self.average_streak_length,
            ModelFeature::StreakBreakFrequency => self.streak_break_frequency,
            ModelFeature::ChurnRisk => self.churn_risk,
            ModelFeature::LastOrderDaysAgo => f64::from(self.last_order_days_ago),
            ModelFeature::SeasonalFactor => self.seasonal_factor,
            ModelFeature::WeekendActivityRatio => self.weekend_activity_ratio,
            ModelFeature::EveningActivityRatio => self.evening_activity_ratio,
            ModelFeature::PreferredCategoriesCount => f64::from(self.preferred_categories_count),
        }
    }

    /// Scorer inputs in `ModelFeature::ALL` order
    pub fn model_inputs(&self) -> [f64; ModelFeature::COUNT] {
        ModelFeature::ALL.map(|f| self.value(f))
    }

    /// First floating-point field outside its domain, as `(name, value)`.
    ///
    /// Every float must be finite and non-negative; the four ratios must also
    /// be at most 1.
    pub fn out_of_domain(&self) -> Option<(&'static str, f64)> {
        let unbounded = [
            ("average_streak_length", self.average_streak_length),
            ("average_order_value", self.average_order_value),
            ("seasonal_factor", self.seasonal_factor),
        ];
        let ratios = [
            ("streak_break_frequency", self.streak_break_frequency),
            ("churn_risk", self.churn_risk),
            ("weekend_activity_ratio", self.weekend_activity_ratio),
            ("evening_activity_ratio", self.evening_activity_ratio),
        ];

        unbounded
            .into_iter()
            .find(|&(_, v)| !v.is_finite() || v < 0.0)
            .or_else(|| {
                ratios
                    .into_iter()
                    .find(|&(_, v)| !(0.0..=1.0).contains(&v))
            })
    }
}
