//! Wait-Time Policy
//!
//! Maps elapsed minutes to a [`WaitTier`] using two persisted thresholds.
//! Thresholds live in the `settings` table; this policy caches them and is
//! swapped only after a successful write.

use std::sync::Arc;

use parking_lot::RwLock;
use shared::models::{Order, OrderView, ThresholdsUpdate, WaitTier, WaitTimeThresholds};
use shared::util::{MILLIS_PER_MINUTE, round1};
use sqlx::SqlitePool;

use crate::db::repository::settings;
use crate::utils::AppResult;

/// Unrounded minutes an order has been waiting at `now_ms`
///
/// Clamped at zero. Completed orders report 0.
pub fn elapsed_minutes(order: &Order, now_ms: i64) -> f64 {
    if !order.status.is_active() {
        return 0.0;
    }
    let elapsed = (now_ms - order.created_at).max(0);
    elapsed as f64 / MILLIS_PER_MINUTE as f64
}

/// [`elapsed_minutes`] rounded to one decimal for display
pub fn wait_time_minutes(order: &Order, now_ms: i64) -> f64 {
    round1(elapsed_minutes(order, now_ms))
}

/// Tier for `minutes` under `thresholds`
pub fn classify_with(thresholds: WaitTimeThresholds, minutes: f64) -> WaitTier {
    if minutes >= f64::from(thresholds.red) {
        WaitTier::Critical
    } else if minutes >= f64::from(thresholds.yellow) {
        WaitTier::Warning
    } else {
        WaitTier::Normal
    }
}

/// Tier comes from the unrounded wait: 4.96 min shows as 5.0 but stays below a 5 min threshold
fn view_with(thresholds: WaitTimeThresholds, order: Order, now_ms: i64) -> OrderView {
    let elapsed = elapsed_minutes(&order, now_ms);
    OrderView {
        wait_tier: classify_with(thresholds, elapsed),
        wait_time_minutes: round1(elapsed),
        order,
    }
}

/// Cached wait-time thresholds backed by the settings table
#[derive(Clone)]
pub struct WaitTimePolicy {
    pool: SqlitePool,
    thresholds: Arc<RwLock<WaitTimeThresholds>>,
}

impl std::fmt::Debug for WaitTimePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitTimePolicy")
            .field("thresholds", &*self.thresholds.read())
            .finish()
    }
}

impl WaitTimePolicy {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            thresholds: Arc::new(RwLock::new(WaitTimeThresholds::default())),
        }
    }

    /// Insert missing defaults, then load
    pub async fn warmup(&self) -> AppResult<()> {
        settings::ensure_defaults(&self.pool).await?;
        self.refresh().await
    }

    /// Reload thresholds from the store
    pub async fn refresh(&self) -> AppResult<()> {
        let loaded = settings::get_thresholds(&self.pool).await?;
        *self.thresholds.write() = loaded;
        tracing::debug!(yellow = loaded.yellow, red = loaded.red, "Wait-time thresholds loaded");
        Ok(())
    }

    pub fn thresholds(&self) -> WaitTimeThresholds {
        *self.thresholds.read()
    }

    pub fn classify(&self, minutes: f64) -> WaitTier {
        classify_with(self.thresholds(), minutes)
    }

    /// Attach read-time wait fields computed at `now_ms`
    pub fn view(&self, order: Order, now_ms: i64) -> OrderView {
        view_with(self.thresholds(), order, now_ms)
    }

    /// Same as [`Self::view`] with one threshold read for the whole list
    pub fn views(&self, orders: Vec<Order>, now_ms: i64) -> Vec<OrderView> {
        let thresholds = self.thresholds();
        orders
            .into_iter()
            .map(|order| view_with(thresholds, order, now_ms))
            .collect()
    }

    /// Validate and persist new thresholds. On rejection nothing is written
    /// and the previous values stay in effect.
    pub async fn update(&self, data: ThresholdsUpdate) -> AppResult<WaitTimeThresholds> {
        let thresholds = WaitTimeThresholds::try_new(data.yellow_threshold, data.red_threshold)?;
        settings::update_thresholds(&self.pool, thresholds).await?;
        self.refresh().await?;

        tracing::info!(
            yellow = thresholds.yellow,
            red = thresholds.red,
            "Wait-time thresholds updated"
        );
        Ok(self.thresholds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::error::ErrorCode;
    use shared::models::{OrderStatus, Temperature};

    fn order_at(created_at: i64, status: OrderStatus) -> Order {
        Order {
            id: 1,
            customer_name: "Ada".into(),
            drink: "Latte".into(),
            milk: "Whole".into(),
            syrup: None,
            foam: None,
            temperature: Temperature::Hot,
            extra_shot: false,
            notes: String::new(),
            status,
            price: 4.0,
            created_at,
        }
    }

    async fn test_policy() -> WaitTimePolicy {
        let db = DbService::in_memory().await.unwrap();
        let policy = WaitTimePolicy::new(db.pool);
        policy.warmup().await.unwrap();
        policy
    }

    #[test]
    fn test_wait_time_minutes() {
        let order = order_at(0, OrderStatus::Pending);
        assert_eq!(wait_time_minutes(&order, 0), 0.0);
        assert_eq!(wait_time_minutes(&order, 90_000), 1.5);
        assert_eq!(wait_time_minutes(&order, 600_000), 10.0);
        // Clock skew never yields a negative wait
        assert_eq!(wait_time_minutes(&order, -5_000), 0.0);
    }

    #[test]
    fn test_completed_orders_do_not_wait() {
        let order = order_at(0, OrderStatus::Completed);
        assert_eq!(wait_time_minutes(&order, 3_600_000), 0.0);
    }

    #[test]
    fn test_wait_time_is_monotonic() {
        let order = order_at(1_000, OrderStatus::InProgress);
        let mut previous = 0.0;
        for now in (0..2_000_000).step_by(7_919) {
            let minutes = wait_time_minutes(&order, now);
            assert!(minutes >= previous, "{minutes} < {previous} at {now}");
            previous = minutes;
        }
    }

    #[test]
    fn test_classify_boundaries() {
        let t = WaitTimeThresholds::default();
        assert_eq!(classify_with(t, 0.0), WaitTier::Normal);
        assert_eq!(classify_with(t, 4.9), WaitTier::Normal);
        assert_eq!(classify_with(t, 5.0), WaitTier::Warning);
        assert_eq!(classify_with(t, 9.9), WaitTier::Warning);
        assert_eq!(classify_with(t, 10.0), WaitTier::Critical);
        assert_eq!(classify_with(t, 120.0), WaitTier::Critical);
    }

    #[tokio::test]
    async fn test_view_attaches_wait_fields() {
        let policy = test_policy().await;
        let view = policy.view(order_at(0, OrderStatus::Pending), 6 * 60_000);
        assert_eq!(view.wait_time_minutes, 6.0);
        assert_eq!(view.wait_tier, WaitTier::Warning);

        let done = policy.view(order_at(0, OrderStatus::Completed), 60 * 60_000);
        assert_eq!(done.wait_time_minutes, 0.0);
        assert_eq!(done.wait_tier, WaitTier::Normal);
    }

    #[tokio::test]
    async fn test_tier_uses_unrounded_wait() {
        let policy = test_policy().await;
        // 4.96 min: displayed as 5.0, still below the 5 min threshold
        let view = policy.view(order_at(0, OrderStatus::Pending), 297_600);
        assert_eq!(view.wait_time_minutes, 5.0);
        assert_eq!(view.wait_tier, WaitTier::Normal);

        let view = policy.view(order_at(0, OrderStatus::Pending), 300_000);
        assert_eq!(view.wait_tier, WaitTier::Warning);
    }

    #[tokio::test]
    async fn test_update_applies_new_thresholds() {
        let policy = test_policy().await;
        assert_eq!(policy.classify(6.0), WaitTier::Warning);

        let updated = policy
            .update(ThresholdsUpdate {
                yellow_threshold: 8,
                red_threshold: 15,
            })
            .await
            .unwrap();
        assert_eq!((updated.yellow, updated.red), (8, 15));
        assert_eq!(policy.classify(6.0), WaitTier::Normal);

        // Survives a reload from the store
        policy.refresh().await.unwrap();
        assert_eq!(policy.thresholds(), updated);
    }

    #[tokio::test]
    async fn test_inverted_thresholds_rejected_and_kept() {
        let policy = test_policy().await;
        let err = policy
            .update(ThresholdsUpdate {
                yellow_threshold: 10,
                red_threshold: 5,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidThresholds);

        assert_eq!(policy.thresholds(), WaitTimeThresholds { yellow: 5, red: 10 });
        policy.refresh().await.unwrap();
        assert_eq!(policy.thresholds(), WaitTimeThresholds { yellow: 5, red: 10 });
    }
}
