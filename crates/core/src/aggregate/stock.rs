use crate::domain::ledger::RestockRow;
use crate::domain::stats::StockEvent;

/// An item is new when it has no strictly-earlier restock on record.
pub fn detect_new_stock(rows: Vec<RestockRow>) -> Vec<StockEvent> {
    rows.into_iter()
        .map(|row| StockEvent {
            is_new: row.previous_time.is_none(),
            time: row.time,
            name: row.name,
            count: row.count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn flags_items_without_earlier_restock() {
        let t = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let rows = vec![
            RestockRow {
                time: t,
                itemid: 1,
                name: "Coffee".to_string(),
                count: 24,
                previous_time: Some(t - Duration::days(7)),
            },
            RestockRow {
                time: t - Duration::hours(1),
                itemid: 2,
                name: "Mystery Soda".to_string(),
                count: 6,
                previous_time: None,
            },
        ];

        let out = detect_new_stock(rows);
        assert_eq!(out.len(), 2);
        assert!(!out[0].is_new);
        assert!(out[1].is_new);
        assert_eq!(out[1].name, "Mystery Soda");
        assert_eq!(out[1].count, 6);
    }
}
