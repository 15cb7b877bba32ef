use crate::domain::engagement::{ActivityEvent, OrderSummary, UserId, UserProfile, UserStreak};
use crate::infrastructure::mock::InMemoryEngagementStore;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// Lapsing shopper: gappy month of activity, old orders, high churn score
pub const LAPSING_USER: UserId = 101;
/// Daily visitor with recent orders and a low churn score
pub const STEADY_USER: UserId = 102;
/// Registered but never active
pub const NEW_USER: UserId = 103;

const ACTIVITY_TYPES: [(&str, f64); 5] = [
    ("login", 1.0),
    ("browse", 2.0),
    ("add_to_cart", 5.0),
    ("purchase", 10.0),
    ("review", 3.0),
];

/// Days of the lapsing user's month with no activity
const SKIPPED_DAYS: [i64; 7] = [5, 6, 12, 13, 20, 21, 22];

/// Populates `store` with the three demo users, relative to `now`
pub async fn seed_demo_users(store: &InMemoryEngagementStore, now: DateTime<Utc>) {
    seed_lapsing_user(store, now).await;
    seed_steady_user(store, now).await;
    seed_new_user(store, now).await;
    info!("Seeded demo engagement data for users 101-103");
}

async fn seed_lapsing_user(store: &InMemoryEngagementStore, now: DateTime<Utc>) {
    store
        .upsert_profile(UserProfile {
            user_id: LAPSING_USER,
            registered_at: now - Duration::days(365),
            churn_risk: 0.85,
            preferred_categories: vec!["Thời trang nữ".to_string()],
        })
        .await;

    store
        .record_order(
            LAPSING_USER,
            OrderSummary::new(now - Duration::days(120), "Thời trang nữ"),
        )
        .await;
    store
        .record_order(
            LAPSING_USER,
            OrderSummary::new(now - Duration::days(110), "Thời trang nữ"),
        )
        .await;

    let base = now - Duration::days(30);
    for day in (0..30).filter(|d| !SKIPPED_DAYS.contains(d)) {
        let (kind, value) = ACTIVITY_TYPES[day as usize % ACTIVITY_TYPES.len()];
        store
            .record_activity(
                LAPSING_USER,
                ActivityEvent::new(kind, base + Duration::days(day), value),
            )
            .await;
    }

    store
        .set_streak(UserStreak {
            user_id: LAPSING_USER,
            current_streak: 3,
            longest_streak: 15,
            last_activity_at: now - Duration::days(3),
            is_active: true,
        })
        .await;
}

async fn seed_steady_user(store: &InMemoryEngagementStore, now: DateTime<Utc>) {
    store
        .upsert_profile(UserProfile {
            user_id: STEADY_USER,
            registered_at: now - Duration::days(200),
            churn_risk: 0.10,
            preferred_categories: vec!["Thời trang nam".to_string(), "Điện tử".to_string()],
        })
        .await;

    for (days_ago, category) in [(2, "Điện tử"), (9, "Thời trang nam"), (16, "Thời trang nam")] {
        store
            .record_order(
                STEADY_USER,
                OrderSummary::new(now - Duration::days(days_ago), category),
            )
            .await;
    }

    // One evening visit a day for three weeks
    for days_ago in 0..21 {
        let (kind, value) = ACTIVITY_TYPES[days_ago as usize % 2];
        store
            .record_activity(
                STEADY_USER,
                ActivityEvent::new(kind, now - Duration::days(days_ago) - Duration::hours(1), value),
            )
            .await;
    }

    store
        .set_streak(UserStreak {
            user_id: STEADY_USER,
            current_streak: 21,
            longest_streak: 21,
            last_activity_at: now - Duration::hours(1),
            is_active: true,
        })
        .await;
}

async fn seed_new_user(store: &InMemoryEngagementStore, now: DateTime<Utc>) {
    store
        .upsert_profile(UserProfile {
            user_id: NEW_USER,
            registered_at: now - Duration::days(2),
            churn_risk: 0.30,
            preferred_categories: Vec::new(),
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::EngagementDataSource;

    #[tokio::test]
    async fn test_lapsing_user_has_gappy_month() {
        let store = InMemoryEngagementStore::new();
        let now = Utc::now();
        seed_demo_users(&store, now).await;

        let activities = store.fetch_recent_activities(LAPSING_USER, 100).await.unwrap();
        assert_eq!(activities.len(), 23);
        assert_eq!(store.fetch_recent_orders(LAPSING_USER, 5).await.unwrap().len(), 2);
        assert_eq!(store.user_ids().await, vec![101, 102, 103]);
    }

    #[tokio::test]
    async fn test_new_user_has_profile_only() {
        let store = InMemoryEngagementStore::new();
        seed_demo_users(&store, Utc::now()).await;

        assert!(store.fetch_profile(NEW_USER).await.is_ok());
        assert!(store.fetch_streak(NEW_USER).await.unwrap().is_none());
        assert!(store.fetch_recent_activities(NEW_USER, 100).await.unwrap().is_empty());
    }
}
