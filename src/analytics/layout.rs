//! Spreadsheet layout: sheet names, display positions and header rows

use crate::storage::SheetRange;

pub const CLONES_VIEWS_SHEET: &str = "clones-views";
pub const PATHS_SHEET: &str = "paths";
pub const LAST_PATHS_SHEET: &str = "paths-last";
pub const REFERRERS_SHEET: &str = "referrers";
pub const LAST_REFERRERS_SHEET: &str = "referrers-last";

pub const CLONES_VIEWS_HEADER: [&str; 5] = ["Date", "Clones", "Unique Clones", "Views", "Unique Views"];
pub const PATHS_HEADER: [&str; 3] = ["Path", "Count", "Uniques"];
pub const REFERRERS_HEADER: [&str; 3] = ["Referrers", "Count", "Uniques"];

/// 一个必需的工作表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub name: &'static str,
    pub position: usize,
    pub header: &'static [&'static str],
}

/// Every sheet the job reads or writes, in creation order
pub const REQUIRED_SHEETS: [SheetLayout; 5] = [
    SheetLayout {
        name: CLONES_VIEWS_SHEET,
        position: 1,
        header: &CLONES_VIEWS_HEADER,
    },
    SheetLayout {
        name: PATHS_SHEET,
        position: 2,
        header: &PATHS_HEADER,
    },
    SheetLayout {
        name: REFERRERS_SHEET,
        position: 3,
        header: &REFERRERS_HEADER,
    },
    SheetLayout {
        name: LAST_PATHS_SHEET,
        position: 4,
        header: &PATHS_HEADER,
    },
    SheetLayout {
        name: LAST_REFERRERS_SHEET,
        position: 5,
        header: &REFERRERS_HEADER,
    },
];

/// Whole daily table including the header (`clones-views!A1:E`)
pub fn clones_views_table() -> SheetRange {
    SheetRange::new(CLONES_VIEWS_SHEET, "A1:E")
}

/// Whole key/count/uniques table including the header
pub fn aggregate_table(sheet: &str) -> SheetRange {
    SheetRange::new(sheet, "A1:C")
}

/// Key/count/uniques rows below the header
pub fn aggregate_body(sheet: &str) -> SheetRange {
    SheetRange::new(sheet, "A2:C")
}
