use crate::domain::engagement::{ActivityEvent, OrderSummary, UserId, UserProfile, UserStreak};
use anyhow::Result;
use async_trait::async_trait;

/// Read access to the engagement data owned by the storage layer.
///
/// Lists are returned most-recent-first and hold at most `limit` entries.
#[async_trait]
pub trait EngagementDataSource: Send + Sync {
    /// `Ok(None)` means the user has no streak record yet
    async fn fetch_streak(&self, user_id: UserId) -> Result<Option<UserStreak>>;

    async fn fetch_recent_activities(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<ActivityEvent>>;

    async fn fetch_recent_orders(&self, user_id: UserId, limit: usize)
    -> Result<Vec<OrderSummary>>;

    /// Registration date, churn score and preferred categories
    async fn fetch_profile(&self, user_id: UserId) -> Result<UserProfile>;
}
