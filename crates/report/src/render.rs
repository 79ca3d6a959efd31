use chrono::{NaiveDateTime, Timelike};
use std::fmt::Write;

use rvstats_core::aggregate::spending::{day_ticks, recent_hours};
use rvstats_core::domain::stats::{
    PopularityEntry, RecentPurchase, SpendingSeries, StockEvent, Trend,
};
use rvstats_core::time::labels::{hour_range_label, relative_day, weekday_label};
use rvstats_core::time::window::Window;

const BAR_WIDTH: i64 = 40;

/// Oldest hour first, with the weekday printed on the first bucket of each day.
pub fn spending(series: &SpendingSeries, days: usize) -> String {
    let now = series.timestamp;
    let buckets = recent_hours(&series.purchases_per_hour, days * 24);
    let ticks = day_ticks(buckets.len(), now.hour());
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);

    let mut out = String::new();
    for (i, bucket) in buckets.iter().enumerate().rev() {
        let day = if ticks.contains(&i) {
            weekday_label(now, bucket.diff).unwrap_or_default()
        } else {
            String::new()
        };
        let hours = hour_range_label(now, bucket.diff).unwrap_or_default();
        let bar = "#".repeat((bucket.count * BAR_WIDTH / max) as usize);
        let _ = writeln!(out, "{day:<4}{hours:<12} {bar} {}", bucket.count);
    }
    out
}

pub fn popular(window: Window, entries: &[PopularityEntry]) -> String {
    let mut out = format!("Most popular items ({window})\n");
    for e in entries {
        let trend = match e.trend() {
            Some(Trend::Up(n)) => format!("+{n}"),
            Some(Trend::Down(n)) => format!("-{n}"),
            Some(Trend::Flat) | None => String::new(),
        };
        let _ = writeln!(out, "{:>5}x {:<32} {trend}", e.count, e.name);
    }
    out
}

pub fn recent(purchases: &[RecentPurchase]) -> String {
    let mut out = String::new();
    for p in purchases {
        let _ = writeln!(out, "{} {}", p.time, p.name);
    }
    out
}

pub fn stocked(events: &[StockEvent], now: NaiveDateTime) -> String {
    let mut out = String::new();
    for e in events {
        let new = if e.is_new { " New!" } else { "" };
        let _ = writeln!(
            out,
            "{:<12} {:<32} {} pcs{new}",
            relative_day(e.time, now),
            e.name,
            e.count
        );
    }
    out
}
