use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Event kind as coded in the register's `ITEMHISTORY.actionid` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Purchase,
    Restock(i32),
    Other(i32),
}

impl ActionKind {
    pub const PURCHASE_CODE: i32 = 5;
    pub const RESTOCK_CODES: [i32; 3] = [29, 8, 1];

    pub fn from_code(code: i32) -> Self {
        if code == Self::PURCHASE_CODE {
            ActionKind::Purchase
        } else if Self::RESTOCK_CODES.contains(&code) {
            ActionKind::Restock(code)
        } else {
            ActionKind::Other(code)
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ActionKind::Purchase => Self::PURCHASE_CODE,
            ActionKind::Restock(code) | ActionKind::Other(code) => code,
        }
    }

    pub fn is_purchase(self) -> bool {
        matches!(self, ActionKind::Purchase)
    }

    pub fn is_restock(self) -> bool {
        matches!(self, ActionKind::Restock(_))
    }
}

/// One immutable ledger line. The Postgres store never materializes these; it reads the
/// same facts straight from the register tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseEvent {
    pub itemid: i32,
    pub name: String,
    pub action: ActionKind,
    pub time: NaiveDateTime,
    pub count: i32,
    /// `None` when the register has no account for the line.
    pub privacy_level: Option<i32>,
}

/// Purchases within one hour bucket, `diff` hours before the reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourCount {
    pub diff: i64,
    pub count: i64,
}

/// Purchases of one item within a time range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCount {
    pub itemid: i32,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRow {
    pub time: NaiveDateTime,
    pub itemid: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestockRow {
    pub time: NaiveDateTime,
    pub itemid: i32,
    pub name: String,
    pub count: i32,
    /// Most recent strictly-earlier restock of the same item.
    pub previous_time: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_codes_round_trip() {
        for code in [1, 5, 8, 29, 42] {
            assert_eq!(ActionKind::from_code(code).code(), code);
        }
    }

    #[test]
    fn classifies_register_codes() {
        assert!(ActionKind::from_code(5).is_purchase());
        assert!(ActionKind::from_code(29).is_restock());
        assert!(ActionKind::from_code(8).is_restock());
        assert!(ActionKind::from_code(1).is_restock());
        assert_eq!(ActionKind::from_code(17), ActionKind::Other(17));
    }
}
