use crate::domain::engagement::{
    ActivityEvent, OrderSummary, ProductCategory, UserId, UserProfile, UserStreak,
};
use crate::domain::errors::StreakError;
use crate::domain::ml::FeatureVector;
use crate::domain::ports::EngagementDataSource;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc, Weekday};
use tracing::debug;

pub const DEFAULT_ACTIVITY_LIMIT: usize = 100;
pub const DEFAULT_ORDER_LIMIT: usize = 5;

/// Raw collaborator data for one user, as fetched before extraction
#[derive(Debug, Clone)]
pub struct UserSnapshot {
    pub profile: UserProfile,
    pub streak: Option<UserStreak>,
    pub activities: Vec<ActivityEvent>,
    pub orders: Vec<OrderSummary>,
}

/// Turns engagement records into a [`FeatureVector`].
///
/// Calendar-based signals (weekday, evening hour, month, day boundaries) are
/// evaluated in the configured local offset.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    local_offset: FixedOffset,
    activity_limit: usize,
    order_limit: usize,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl FeatureExtractor {
    pub fn new(local_offset: FixedOffset) -> Self {
        Self {
            local_offset,
            activity_limit: DEFAULT_ACTIVITY_LIMIT,
            order_limit: DEFAULT_ORDER_LIMIT,
        }
    }

    pub fn with_limits(mut self, activity_limit: usize, order_limit: usize) -> Self {
        self.activity_limit = activity_limit.max(1);
        self.order_limit = order_limit.max(1);
        self
    }

    pub fn local_offset(&self) -> FixedOffset {
        self.local_offset
    }

    /// Fetches everything extraction needs. Any failed lookup aborts the whole fetch.
    pub async fn fetch_snapshot(
        &self,
        source: &dyn EngagementDataSource,
        user_id: UserId,
    ) -> Result<UserSnapshot, StreakError> {
        let (streak, activities, orders, profile) = tokio::try_join!(
            async {
                source
                    .fetch_streak(user_id)
                    .await
                    .map_err(|e| unavailable(user_id, "streak", e))
            },
            async {
                source
                    .fetch_recent_activities(user_id, self.activity_limit)
                    .await
                    .map_err(|e| unavailable(user_id, "activities", e))
            },
            async {
                source
                    .fetch_recent_orders(user_id, self.order_limit)
                    .await
                    .map_err(|e| unavailable(user_id, "orders", e))
            },
            async {
                source
                    .fetch_profile(user_id)
                    .await
                    .map_err(|e| unavailable(user_id, "profile", e))
            },
        )?;

        Ok(UserSnapshot {
            profile,
            streak,
            activities,
            orders,
        })
    }

    pub async fn extract_for_user(
        &self,
        source: &dyn EngagementDataSource,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<FeatureVector, StreakError> {
        let snapshot = self.fetch_snapshot(source, user_id).await?;
        Ok(self.extract(&snapshot, now))
    }

    pub fn extract(&self, snapshot: &UserSnapshot, now: DateTime<Utc>) -> FeatureVector {
        let mut activities: Vec<&ActivityEvent> = snapshot.activities.iter().collect();
        activities.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        activities.truncate(self.activity_limit);

        let mut orders: Vec<&OrderSummary> = snapshot.orders.iter().collect();
        orders.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at));
        orders.truncate(self.order_limit);

        let (current_streak_length, days_since_last_activity) = match &snapshot.streak {
            Some(streak) => (
                streak.current_streak,
                whole_days_between(now, streak.last_activity_at),
            ),
            None => (0, FeatureVector::UNKNOWN_DAYS),
        };

        let day_gaps = self.day_gaps(&activities);

        let features = FeatureVector {
            days_since_last_activity,
            current_streak_length,
            average_streak_length: average_run_length(&day_gaps),
            streak_break_frequency: break_frequency(&day_gaps),
            total_activities: saturating_u32(activities.len()),
            days_since_registration: whole_days_between(now, snapshot.profile.registered_at),
            average_order_value: average_order_value(&orders),
            total_orders: saturating_u32(orders.len()),
            churn_risk: clamp_unit(snapshot.profile.churn_risk),
            preferred_categories_count: saturating_u32(
                snapshot.profile.preferred_categories.len(),
            ),
            last_order_days_ago: orders
                .first()
                .map(|o| whole_days_between(now, o.ordered_at))
                .unwrap_or(FeatureVector::UNKNOWN_DAYS),
            seasonal_factor: seasonal_factor(now.with_timezone(&self.local_offset).month()),
            weekend_activity_ratio: self.ratio(&activities, |local| {
                matches!(local.weekday(), Weekday::Sat | Weekday::Sun)
            }),
            evening_activity_ratio: self.ratio(&activities, |local| {
                (18..=23).contains(&local.hour())
            }),
        };

        debug!(
            user_id = snapshot.profile.user_id,
            activities = activities.len(),
            orders = orders.len(),
            "Extracted streak features"
        );

        features
    }

    fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.local_offset).date_naive()
    }

    /// Calendar-day gaps between adjacent activities (input is most-recent-first)
    fn day_gaps(&self, activities: &[&ActivityEvent]) -> Vec<i64> {
        activities
            .windows(2)
            .map(|pair| {
                (self.local_date(pair[0].occurred_at) - self.local_date(pair[1].occurred_at))
                    .num_days()
            })
            .collect()
    }

    fn ratio<F>(&self, activities: &[&ActivityEvent], predicate: F) -> f64
    where
        F: Fn(&DateTime<FixedOffset>) -> bool,
    {
        if activities.is_empty() {
            return 0.0;
        }
        let hits = activities
            .iter()
            .filter(|a| predicate(&a.occurred_at.with_timezone(&self.local_offset)))
            .count();
        hits as f64 / activities.len() as f64
    }
}

fn unavailable(user_id: UserId, resource: &'static str, err: anyhow::Error) -> StreakError {
    StreakError::DataUnavailable {
        user_id,
        resource,
        reason: format!("{:#}", err),
    }
}

/// Whole days elapsed from `earlier` to `later`, 0 if `earlier` lies in the future
fn whole_days_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> u32 {
    let days = (later - earlier).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Mean length of runs of consecutive days; single-day runs are ignored
fn average_run_length(day_gaps: &[i64]) -> f64 {
    let mut runs: Vec<u32> = Vec::new();
    let mut current = 1u32;

    for &gap in day_gaps {
        if gap == 1 {
            current += 1;
        } else {
            if current > 1 {
                runs.push(current);
            }
            current = 1;
        }
    }
    if current > 1 {
        runs.push(current);
    }

    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(|&r| f64::from(r)).sum::<f64>() / runs.len() as f64
}

fn break_frequency(day_gaps: &[i64]) -> f64 {
    if day_gaps.is_empty() {
        return 0.0;
    }
    let breaks = day_gaps.iter().filter(|&&gap| gap > 1).count();
    breaks as f64 / day_gaps.len() as f64
}

fn average_order_value(orders: &[&OrderSummary]) -> f64 {
    if orders.is_empty() {
        return 0.0;
    }
    let total: f64 = orders
        .iter()
        .map(|o| ProductCategory::from_label(&o.category).price_proxy())
        .sum();
    total / orders.len() as f64
}

/// Month multiplier: year-end holidays, Tet (February) and summer
fn seasonal_factor(month: u32) -> f64 {
    match month {
        12 | 1 => 1.2,
        2 => 1.3,
        7 | 8 => 1.1,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        // Tuesday
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile {
            user_id: 7,
            registered_at: now() - Duration::days(180),
            churn_risk: 0.4,
            preferred_categories: vec!["electronics".to_string()],
        }
    }

    fn snapshot(activities: Vec<ActivityEvent>) -> UserSnapshot {
        UserSnapshot {
            profile: profile(),
            streak: None,
            activities,
            orders: Vec::new(),
        }
    }

    fn activity_days_ago(days: i64) -> ActivityEvent {
        ActivityEvent::new("login", now() - Duration::days(days), 1.0)
    }

    #[test]
    fn test_no_streak_record_uses_sentinels() {
        let fv = FeatureExtractor::default().extract(&snapshot(Vec::new()), now());

        assert_eq!(fv.current_streak_length, 0);
        assert_eq!(fv.days_since_last_activity, 999);
        assert_eq!(fv.last_order_days_ago, 999);
        assert_eq!(fv.average_order_value, 0.0);
        assert_eq!(fv.average_streak_length, 0.0);
        assert_eq!(fv.streak_break_frequency, 0.0);
        assert_eq!(fv.weekend_activity_ratio, 0.0);
        assert_eq!(fv.days_since_registration, 180);
        assert_eq!(fv.preferred_categories_count, 1);
    }

    #[test]
    fn test_streak_record_fields() {
        let mut snap = snapshot(Vec::new());
        snap.streak = Some(UserStreak {
            user_id: 7,
            current_streak: 4,
            longest_streak: 9,
            last_activity_at: now() - Duration::hours(75),
            is_active: true,
        });

        let fv = FeatureExtractor::default().extract(&snap, now());
        assert_eq!(fv.current_streak_length, 4);
        assert_eq!(fv.days_since_last_activity, 3);
    }

    #[test]
    fn test_run_lengths_and_breaks() {
        // Days ago: 0,1,2 (run of 3), gap, 5,6 (run of 2), gap, 10 (single)
        let activities = [0, 1, 2, 5, 6, 10]
            .iter()
            .map(|&d| activity_days_ago(d))
            .collect();

        let fv = FeatureExtractor::default().extract(&snapshot(activities), now());

        assert!((fv.average_streak_length - 2.5).abs() < 1e-12);
        // Gaps: 1,1,3,1,4 -> two breaks out of five pairs
        assert!((fv.streak_break_frequency - 0.4).abs() < 1e-12);
        assert_eq!(fv.total_activities, 6);
    }

    #[test]
    fn test_unsorted_activities_are_ordered_first() {
        let activities = [2, 0, 1].iter().map(|&d| activity_days_ago(d)).collect();
        let fv = FeatureExtractor::default().extract(&snapshot(activities), now());

        assert!((fv.average_streak_length - 3.0).abs() < 1e-12);
        assert_eq!(fv.streak_break_frequency, 0.0);
    }

    #[test]
    fn test_same_day_activities_break_run() {
        let activities = vec![
            ActivityEvent::new("login", now(), 1.0),
            ActivityEvent::new("browse", now() - Duration::hours(1), 2.0),
        ];
        let fv = FeatureExtractor::default().extract(&snapshot(activities), now());

        assert_eq!(fv.average_streak_length, 0.0);
        assert_eq!(fv.streak_break_frequency, 0.0);
    }

    #[test]
    fn test_single_activity_has_no_pairs() {
        let fv = FeatureExtractor::default().extract(&snapshot(vec![activity_days_ago(3)]), now());
        assert_eq!(fv.streak_break_frequency, 0.0);
        assert_eq!(fv.average_streak_length, 0.0);
    }

    #[test]
    fn test_order_features() {
        let mut snap = snapshot(Vec::new());
        snap.orders = vec![
            OrderSummary::new(now() - Duration::days(30), "Giày dép nữ"),
            OrderSummary::new(now() - Duration::days(5), "Thời trang nữ"),
            OrderSummary::new(now() - Duration::days(15), "garden"),
        ];

        let fv = FeatureExtractor::default().extract(&snap, now());

        assert_eq!(fv.total_orders, 3);
        assert_eq!(fv.last_order_days_ago, 5);
        assert!((fv.average_order_value - 500_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_lookback_limits_applied() {
        let activities = (0..10).map(activity_days_ago).collect();
        let mut snap = snapshot(activities);
        snap.orders = (0..8)
            .map(|d| OrderSummary::new(now() - Duration::days(d), "electronics"))
            .collect();

        let fv = FeatureExtractor::default()
            .with_limits(4, 2)
            .extract(&snap, now());

        assert_eq!(fv.total_activities, 4);
        assert_eq!(fv.total_orders, 2);
        assert_eq!(fv.last_order_days_ago, 0);
    }

    #[test]
    fn test_weekend_and_evening_ratios_use_local_offset() {
        // 2026-03-07 is a Saturday. 11:30 UTC = 18:30 at UTC+7.
        let saturday = Utc.with_ymd_and_hms(2026, 3, 7, 11, 30, 0).unwrap();
        let tuesday_morning = Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap();
        let activities = vec![
            ActivityEvent::new("login", saturday, 1.0),
            ActivityEvent::new("login", tuesday_morning, 1.0),
        ];

        let utc = FeatureExtractor::default().extract(&snapshot(activities.clone()), now());
        assert_eq!(utc.weekend_activity_ratio, 0.5);
        assert_eq!(utc.evening_activity_ratio, 0.0);

        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let local = FeatureExtractor::new(offset).extract(&snapshot(activities), now());
        assert_eq!(local.weekend_activity_ratio, 0.5);
        assert_eq!(local.evening_activity_ratio, 0.5);
    }

    #[test]
    fn test_seasonal_lookup() {
        assert_eq!(seasonal_factor(12), 1.2);
        assert_eq!(seasonal_factor(1), 1.2);
        assert_eq!(seasonal_factor(2), 1.3);
        assert_eq!(seasonal_factor(7), 1.1);
        assert_eq!(seasonal_factor(8), 1.1);
        assert_eq!(seasonal_factor(3), 1.0);

        let fv = FeatureExtractor::default().extract(&snapshot(Vec::new()), now());
        assert_eq!(fv.seasonal_factor, 1.0);
    }

    #[test]
    fn test_churn_risk_clamped() {
        let mut snap = snapshot(Vec::new());
        snap.profile.churn_risk = 1.7;
        let fv = FeatureExtractor::default().extract(&snap, now());
        assert_eq!(fv.churn_risk, 1.0);
    }
}
