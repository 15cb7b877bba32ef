use crate::domain::engagement::{ActivityEvent, OrderSummary, UserId, UserProfile, UserStreak};
use crate::domain::ports::EngagementDataSource;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// The four lookups feature extraction performs per user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngagementLookup {
    Streak,
    Activities,
    Orders,
    Profile,
}

#[derive(Default)]
struct UserRecords {
    profile: Option<UserProfile>,
    streak: Option<UserStreak>,
    activities: Vec<ActivityEvent>,
    orders: Vec<OrderSummary>,
}

/// In-memory engagement data for the demo binary and tests.
///
/// Lookups can be made to fail on demand with [`fail_lookup`](Self::fail_lookup)
/// to exercise the storage-outage paths.
#[derive(Clone, Default)]
pub struct InMemoryEngagementStore {
    users: Arc<RwLock<HashMap<UserId, UserRecords>>>,
    failing: Arc<RwLock<HashSet<EngagementLookup>>>,
}

impl InMemoryEngagementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert_profile(&self, profile: UserProfile) {
        let user_id = profile.user_id;
        let mut users = self.users.write().await;
        users.entry(user_id).or_default().profile = Some(profile);
    }

    pub async fn set_streak(&self, streak: UserStreak) {
        let user_id = streak.user_id;
        let mut users = self.users.write().await;
        users.entry(user_id).or_default().streak = Some(streak);
    }

    pub async fn record_activity(&self, user_id: UserId, activity: ActivityEvent) {
        let mut users = self.users.write().await;
        users.entry(user_id).or_default().activities.push(activity);
    }

    pub async fn record_order(&self, user_id: UserId, order: OrderSummary) {
        let mut users = self.users.write().await;
        users.entry(user_id).or_default().orders.push(order);
    }

    pub async fn fail_lookup(&self, lookup: EngagementLookup) {
        self.failing.write().await.insert(lookup);
    }

    pub async fn restore_lookups(&self) {
        self.failing.write().await.clear();
    }

    pub async fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.users.read().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    async fn check(&self, lookup: EngagementLookup) -> Result<()> {
        if self.failing.read().await.contains(&lookup) {
            return Err(anyhow!("{:?} store unreachable", lookup));
        }
        Ok(())
    }
}

#[async_trait]
impl EngagementDataSource for InMemoryEngagementStore {
    async fn fetch_streak(&self, user_id: UserId) -> Result<Option<UserStreak>> {
        self.check(EngagementLookup::Streak).await?;
        let users = self.users.read().await;
        Ok(users.get(&user_id).and_then(|u| u.streak.clone()))
    }

    async fn fetch_recent_activities(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<ActivityEvent>> {
        self.check(EngagementLookup::Activities).await?;
        let users = self.users.read().await;
        let mut activities = users
            .get(&user_id)
            .map(|u| u.activities.clone())
            .unwrap_or_default();
        activities.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        activities.truncate(limit);
        debug!(user_id, count = activities.len(), "Fetched activities");
        Ok(activities)
    }

    async fn fetch_recent_orders(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<OrderSummary>> {
        self.check(EngagementLookup::Orders).await?;
        let users = self.users.read().await;
        let mut orders = users
            .get(&user_id)
            .map(|u| u.orders.clone())
            .unwrap_or_default();
        orders.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at));
        orders.truncate(limit);
        Ok(orders)
    }

    async fn fetch_profile(&self, user_id: UserId) -> Result<UserProfile> {
        self.check(EngagementLookup::Profile).await?;
        let users = self.users.read().await;
        users
            .get(&user_id)
            .and_then(|u| u.profile.clone())
            .ok_or_else(|| anyhow!("No profile for user {}", user_id))
    }
}
