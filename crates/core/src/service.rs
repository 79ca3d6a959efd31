//! One function per dashboard view. Each reads the store's clock once and runs every query
//! of the view against that reference time.

use crate::aggregate::popularity::rank_popular;
use crate::aggregate::recent::format_recent;
use crate::aggregate::spending::build_hourly_series;
use crate::aggregate::stock::detect_new_stock;
use crate::config::StatsOptions;
use crate::domain::stats::{
    PopularWindows, PopularityEntry, RecentPurchase, SpendingSeries, StockEvent,
};
use crate::storage::StatsStore;
use crate::time::window::Window;
use anyhow::Result;
use chrono::NaiveDateTime;

pub async fn spending(store: &dyn StatsStore, opts: &StatsOptions) -> Result<SpendingSeries> {
    let now = store.now().await?;
    let sparse = store
        .hourly_purchase_counts(now, opts.spending_horizon_hours)
        .await?;

    Ok(SpendingSeries {
        timestamp: now,
        purchases_per_hour: build_hourly_series(&sparse, opts.spending_horizon_hours),
    })
}

pub async fn popular(store: &dyn StatsStore, opts: &StatsOptions) -> Result<PopularWindows> {
    let now = store.now().await?;

    let (day, week, month, year) = tokio::try_join!(
        popular_window(store, opts, Window::Day, now),
        popular_window(store, opts, Window::Week, now),
        popular_window(store, opts, Window::Month, now),
        popular_window(store, opts, Window::Year, now),
    )?;

    Ok(PopularWindows {
        day,
        week,
        month,
        year,
    })
}

pub async fn popular_window(
    store: &dyn StatsStore,
    opts: &StatsOptions,
    window: Window,
    now: NaiveDateTime,
) -> Result<Vec<PopularityEntry>> {
    let (current, previous) = tokio::try_join!(
        store.item_purchase_counts(window.current(now)),
        store.item_purchase_counts(window.previous(now)),
    )?;

    let out = rank_popular(
        current,
        &previous,
        &opts.excluded_item_ids,
        opts.popular_limit,
    );
    tracing::debug!(%window, entries = out.len(), "ranked popular items");
    Ok(out)
}

pub async fn recent(store: &dyn StatsStore, opts: &StatsOptions) -> Result<Vec<RecentPurchase>> {
    let now = store.now().await?;
    let rows = store.recent_purchases(now, opts).await?;
    Ok(format_recent(rows))
}

pub async fn stocked(store: &dyn StatsStore, opts: &StatsOptions) -> Result<Vec<StockEvent>> {
    let now = store.now().await?;
    let rows = store.recent_restocks(now, opts.feed_limit).await?;
    Ok(detect_new_stock(rows))
}
