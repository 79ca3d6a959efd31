use super::StatsStore;
use crate::config::StatsOptions;
use crate::domain::ledger::{HourCount, ItemCount, PurchaseEvent, PurchaseRow, RestockRow};
use crate::time::window::{hour_offset, TimeRange};
use anyhow::Result;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Ledger held in memory with a frozen clock. Answers the same queries as
/// [`super::postgres::PgStatsStore`] over a plain list of events.
#[derive(Debug, Clone)]
pub struct MemoryStatsStore {
    now: NaiveDateTime,
    events: Vec<PurchaseEvent>,
}

impl MemoryStatsStore {
    pub fn new(now: NaiveDateTime, events: Vec<PurchaseEvent>) -> Self {
        Self { now, events }
    }

    fn newest_first<'a>(
        &'a self,
        now: NaiveDateTime,
        keep: impl Fn(&PurchaseEvent) -> bool,
    ) -> Vec<&'a PurchaseEvent> {
        let mut out: Vec<&PurchaseEvent> = self
            .events
            .iter()
            .filter(|e| e.time <= now && keep(e))
            .collect();
        out.sort_by(|a, b| b.time.cmp(&a.time));
        out
    }
}

#[async_trait::async_trait]
impl StatsStore for MemoryStatsStore {
    fn store_name(&self) -> &'static str {
        "memory"
    }

    async fn now(&self) -> Result<NaiveDateTime> {
        Ok(self.now)
    }

    async fn hourly_purchase_counts(
        &self,
        now: NaiveDateTime,
        horizon_hours: i64,
    ) -> Result<Vec<HourCount>> {
        let mut by_hour: BTreeMap<i64, i64> = BTreeMap::new();
        for e in self.events.iter().filter(|e| e.action.is_purchase()) {
            let diff = hour_offset(now, e.time);
            if (0..=horizon_hours).contains(&diff) {
                *by_hour.entry(diff).or_default() += 1;
            }
        }

        Ok(by_hour
            .into_iter()
            .map(|(diff, count)| HourCount { diff, count })
            .collect())
    }

    async fn item_purchase_counts(&self, range: TimeRange) -> Result<Vec<ItemCount>> {
        let mut by_item: BTreeMap<i32, ItemCount> = BTreeMap::new();
        for e in self
            .events
            .iter()
            .filter(|e| e.action.is_purchase() && range.contains(e.time))
        {
            by_item
                .entry(e.itemid)
                .or_insert_with(|| ItemCount {
                    itemid: e.itemid,
                    name: e.name.clone(),
                    count: 0,
                })
                .count += 1;
        }

        Ok(by_item.into_values().collect())
    }

    async fn recent_purchases(
        &self,
        now: NaiveDateTime,
        opts: &StatsOptions,
    ) -> Result<Vec<PurchaseRow>> {
        let rows = self.newest_first(now, |e| {
            let public = match e.privacy_level {
                Some(level) => level <= opts.public_privacy_max,
                None => false,
            };
            e.action.is_purchase()
                && !opts.is_excluded(e.itemid)
                && (!opts.privacy_filter || public)
        });

        Ok(rows
            .into_iter()
            .take(usize::try_from(opts.feed_limit).unwrap_or(0))
            .map(|e| PurchaseRow {
                time: e.time,
                itemid: e.itemid,
                name: e.name.clone(),
            })
            .collect())
    }

    async fn recent_restocks(&self, now: NaiveDateTime, limit: i64) -> Result<Vec<RestockRow>> {
        let restocks = self.newest_first(now, |e| e.action.is_restock());

        let out = restocks
            .iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|e| RestockRow {
                time: e.time,
                itemid: e.itemid,
                name: e.name.clone(),
                count: e.count,
                previous_time: self
                    .events
                    .iter()
                    .filter(|p| p.action.is_restock() && p.itemid == e.itemid && p.time < e.time)
                    .map(|p| p.time)
                    .max(),
            })
            .collect();

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::ActionKind;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap()
    }

    fn ev(itemid: i32, action: i32, hours_ago: i64, privacy_level: Option<i32>) -> PurchaseEvent {
        PurchaseEvent {
            itemid,
            name: format!("item {itemid}"),
            action: ActionKind::from_code(action),
            time: now() - Duration::hours(hours_ago),
            count: 1,
            privacy_level,
        }
    }

    #[tokio::test]
    async fn hourly_counts_are_sparse_and_skip_other_actions() {
        let store = MemoryStatsStore::new(
            now(),
            vec![
                ev(1, 5, 0, Some(0)),
                ev(1, 5, 0, Some(0)),
                ev(2, 5, 3, Some(0)),
                ev(2, 29, 3, None),
                ev(2, 5, 800, Some(0)),
            ],
        );
        let rows = store.hourly_purchase_counts(now(), 744).await.unwrap();
        assert_eq!(
            rows,
            vec![HourCount { diff: 0, count: 2 }, HourCount { diff: 3, count: 1 }]
        );
    }

    #[tokio::test]
    async fn recent_purchases_hide_private_and_accountless_lines() {
        let store = MemoryStatsStore::new(
            now(),
            vec![
                ev(1, 5, 1, Some(2)),
                ev(2, 5, 2, None),
                ev(3, 5, 3, Some(1)),
                ev(58, 5, 0, Some(0)),
            ],
        );
        let opts = StatsOptions::default();
        let rows = store.recent_purchases(now(), &opts).await.unwrap();
        let ids: Vec<i32> = rows.iter().map(|r| r.itemid).collect();
        assert_eq!(ids, vec![3]);

        let opts = StatsOptions {
            privacy_filter: false,
            ..StatsOptions::default()
        };
        let rows = store.recent_purchases(now(), &opts).await.unwrap();
        let ids: Vec<i32> = rows.iter().map(|r| r.itemid).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn restock_lookup_finds_strictly_earlier_record() {
        let store = MemoryStatsStore::new(
            now(),
            vec![ev(1, 29, 48, None), ev(1, 29, 2, None), ev(2, 8, 1, None)],
        );
        let rows = store.recent_restocks(now(), 10).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].itemid, 2);
        assert_eq!(rows[0].previous_time, None);
        assert_eq!(rows[1].previous_time, Some(now() - Duration::hours(48)));
        assert_eq!(rows[2].previous_time, None);
    }
}
