use crate::domain::ledger::PurchaseRow;
use crate::domain::stats::RecentPurchase;
use crate::time::labels::time_of_day;

pub fn format_recent(rows: Vec<PurchaseRow>) -> Vec<RecentPurchase> {
    rows.into_iter()
        .map(|row| RecentPurchase {
            time: time_of_day(row.time),
            name: row.name,
        })
        .collect()
}
