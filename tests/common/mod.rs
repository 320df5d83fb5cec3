//! Shared test helpers

#![allow(dead_code)]

use trafficsheet::storage::Row;

/// Nothing listens on port 1 of the loopback interface
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| c.to_string()).collect()
}
