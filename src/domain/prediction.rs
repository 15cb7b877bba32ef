use crate::domain::engagement::UserId;
use crate::domain::ml::FeatureVector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discretized severity of a streak-lapse probability, ordered low to critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Retention interventions, rendered as operator-facing text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intervention {
    ImmediatePersonalizedOffer,
    CustomerServiceOutreach,
    SmsReminder,
    FreeShippingOffer,
    TargetedEmailCampaign,
    LimitedTimeDiscount,
    CategoryRecommendations,
    GentleReminderEmail,
    PersonalizedHomepage,
    ContinueNormalEngagement,
    MonitorForChanges,
}

impl Intervention {
    pub fn description(self) -> &'static str {
        match self {
            Intervention::ImmediatePersonalizedOffer => "send immediate personalized offer",
            Intervention::CustomerServiceOutreach => "initiate customer-service outreach",
            Intervention::SmsReminder => "send SMS reminder",
            Intervention::FreeShippingOffer => "offer free shipping on next order",
            Intervention::TargetedEmailCampaign => "send targeted email campaign",
            Intervention::LimitedTimeDiscount => "offer limited-time discount",
            Intervention::CategoryRecommendations => "send category-specific recommendations",
            Intervention::GentleReminderEmail => "send gentle reminder email",
            Intervention::PersonalizedHomepage => "show personalized homepage content",
            Intervention::ContinueNormalEngagement => "continue normal engagement",
            Intervention::MonitorForChanges => "monitor for changes",
        }
    }
}

impl fmt::Display for Intervention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of one inference call. Built once, then handed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub user_id: UserId,
    pub probability: f64,
    pub predicted_days_to_drop: u32,
    pub risk_tier: RiskTier,
    pub confidence: f64,
    /// Most urgent first
    pub recommended_actions: Vec<Intervention>,
    pub features: FeatureVector,
    /// Version of the model that scored this user, `None` for the neutral fallback
    pub model_version: Option<String>,
    pub predicted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_tier_ordering() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::High < RiskTier::Critical);
        assert_eq!(RiskTier::Critical.to_string(), "critical");
    }

    #[test]
    fn test_risk_tier_serializes_lowercase() {
        let json = serde_json::to_string(&RiskTier::High).unwrap();
        assert_eq!(json, "\"high\"");
    }

    #[test]
    fn test_intervention_text() {
        assert_eq!(
            Intervention::CustomerServiceOutreach.to_string(),
            "initiate customer-service outreach"
        );
    }
}
