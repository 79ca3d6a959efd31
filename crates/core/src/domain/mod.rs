pub mod ledger;
pub mod stats;
