//! Engagement records supplied by the storage collaborators.
//!
//! These are the raw inputs of feature extraction. They are fetched by an
//! [`EngagementDataSource`](crate::domain::ports::EngagementDataSource)
//! implementation and never written by the scoring core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type UserId = i64;

/// Stored streak state for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStreak {
    pub user_id: UserId,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_at: DateTime<Utc>,
    pub is_active: bool,
}

/// A single engagement event (login, browse, purchase, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub activity_type: String,
    pub occurred_at: DateTime<Utc>,
    pub value: f64,
}

impl ActivityEvent {
    pub fn new(activity_type: impl Into<String>, occurred_at: DateTime<Utc>, value: f64) -> Self {
        Self {
            activity_type: activity_type.into(),
            occurred_at,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub ordered_at: DateTime<Utc>,
    pub category: String,
}

impl OrderSummary {
    pub fn new(ordered_at: DateTime<Utc>, category: impl Into<String>) -> Self {
        Self {
            ordered_at,
            category: category.into(),
        }
    }
}

/// Account facts plus the externally computed churn score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub registered_at: DateTime<Utc>,
    /// Churn probability computed by another system, in [0, 1]
    pub churn_risk: f64,
    pub preferred_categories: Vec<String>,
}

/// Product categories with a fixed order-value proxy.
///
/// Order records only carry a category, so the average order value is
/// approximated from these per-category amounts (currency-neutral units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    WomensFashion,
    MensFashion,
    WomensShoes,
    Electronics,
    Other,
}

impl ProductCategory {
    /// Maps a storefront label (English or the Vietnamese catalogue labels) to a category
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "women's fashion" | "womens fashion" | "thời trang nữ" => ProductCategory::WomensFashion,
            "men's fashion" | "mens fashion" | "thời trang nam" => ProductCategory::MensFashion,
            "women's shoes" | "womens shoes" | "giày dép nữ" => ProductCategory::WomensShoes,
            "electronics" | "điện tử" => ProductCategory::Electronics,
            _ => ProductCategory::Other,
        }
    }

    pub fn price_proxy(self) -> f64 {
        match self {
            ProductCategory::WomensFashion => 500_000.0,
            ProductCategory::MensFashion => 400_000.0,
            ProductCategory::WomensShoes => 700_000.0,
            ProductCategory::Electronics => 1_200_000.0,
            ProductCategory::Other => 300_000.0,
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProductCategory::WomensFashion => "women's fashion",
            ProductCategory::MensFashion => "men's fashion",
            ProductCategory::WomensShoes => "women's shoes",
            ProductCategory::Electronics => "electronics",
            ProductCategory::Other => "other",
        };
        f.write_str(label)
    }
}
