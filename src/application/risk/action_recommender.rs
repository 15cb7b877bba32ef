use crate::domain::ml::FeatureVector;
use crate::domain::prediction::{Intervention, RiskTier};

/// Retention playbook per risk tier, most urgent intervention first
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionRecommender;

impl ActionRecommender {
    pub fn recommend(&self, tier: RiskTier, features: &FeatureVector) -> Vec<Intervention> {
        match tier {
            RiskTier::Critical => {
                let mut actions = vec![
                    Intervention::ImmediatePersonalizedOffer,
                    Intervention::CustomerServiceOutreach,
                    Intervention::SmsReminder,
                ];
                if features.last_order_days_ago > 30 {
                    actions.push(Intervention::FreeShippingOffer);
                }
                actions
            }
            RiskTier::High => {
                let mut actions = vec![
                    Intervention::TargetedEmailCampaign,
                    Intervention::LimitedTimeDiscount,
                ];
                if features.preferred_categories_count > 0 {
                    actions.push(Intervention::CategoryRecommendations);
                }
                actions
            }
            RiskTier::Medium => vec![
                Intervention::GentleReminderEmail,
                Intervention::PersonalizedHomepage,
            ],
            RiskTier::Low => vec![
                Intervention::ContinueNormalEngagement,
                Intervention::MonitorForChanges,
            ],
        }
    }
}
