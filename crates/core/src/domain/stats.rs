use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyBucket {
    pub diff: i64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSeries {
    pub timestamp: NaiveDateTime,
    pub purchases_per_hour: Vec<HourlyBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularityEntry {
    pub itemid: i32,
    pub name: String,
    pub count: i64,
    /// `None` when the item had no purchases in the preceding window.
    pub previous_count: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up(i64),
    Down(i64),
    Flat,
}

impl PopularityEntry {
    pub fn trend(&self) -> Option<Trend> {
        let previous = self.previous_count?;
        Some(match self.count.cmp(&previous) {
            std::cmp::Ordering::Greater => Trend::Up(self.count - previous),
            std::cmp::Ordering::Less => Trend::Down(previous - self.count),
            std::cmp::Ordering::Equal => Trend::Flat,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularWindows {
    pub day: Vec<PopularityEntry>,
    pub week: Vec<PopularityEntry>,
    pub month: Vec<PopularityEntry>,
    pub year: Vec<PopularityEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentPurchase {
    /// `HH:MM` in register local time.
    pub time: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockEvent {
    pub time: NaiveDateTime,
    pub name: String,
    pub count: i32,
    pub is_new: bool,
}
