//! Turns sparse query rows into the dense, ordered values the dashboard displays.

pub mod popularity;
pub mod recent;
pub mod spending;
pub mod stock;
