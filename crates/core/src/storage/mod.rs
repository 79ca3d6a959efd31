use crate::config::StatsOptions;
use crate::domain::ledger::{HourCount, ItemCount, PurchaseRow, RestockRow};
use crate::time::window::TimeRange;
use anyhow::Result;
use chrono::NaiveDateTime;

pub mod memory;
pub mod postgres;

/// Read-only access to the register ledger.
///
/// Every method takes the reference time explicitly so that all queries of one view agree
/// on what "now" is.
#[async_trait::async_trait]
pub trait StatsStore: Send + Sync {
    fn store_name(&self) -> &'static str;

    /// Current register-local time.
    async fn now(&self) -> Result<NaiveDateTime>;

    /// Purchase counts per hour offset in `0..=horizon_hours`, only for hours with activity.
    async fn hourly_purchase_counts(
        &self,
        now: NaiveDateTime,
        horizon_hours: i64,
    ) -> Result<Vec<HourCount>>;

    /// Purchase counts per item within `range`, unordered.
    async fn item_purchase_counts(&self, range: TimeRange) -> Result<Vec<ItemCount>>;

    /// Latest purchases, newest first, honoring the denylist and privacy filter.
    async fn recent_purchases(
        &self,
        now: NaiveDateTime,
        opts: &StatsOptions,
    ) -> Result<Vec<PurchaseRow>>;

    /// Latest restocks, newest first, each with its previous restock time.
    async fn recent_restocks(&self, now: NaiveDateTime, limit: i64) -> Result<Vec<RestockRow>>;
}
