//! Spreadsheet-backed persistence
//!
//! `SheetStore` is the uninterpreted operation contract of the datastore:
//! list sheets, create a sheet with a header, and read / update / append /
//! clear a rectangular range. The checked helpers below turn a backend's
//! reported row count into a hard integrity failure.

pub mod backend;
pub mod credentials;
pub mod models;

use tracing::debug;

use crate::errors::{Result, TrafficError};

pub use backend::{GoogleSheetsStore, MemorySheetStore};
pub use credentials::{
    AccessTokenProvider, ServiceAccountKey, ServiceAccountTokenProvider, StaticTokenProvider,
};
pub use models::{CellSpan, Row, SheetRange};

/// Tabular store addressed by sheet name + A1 range
pub trait SheetStore {
    /// 后端名称（用于日志）
    fn backend_name(&self) -> &'static str;

    /// Titles of all sheets, in display order
    fn sheet_names(&self) -> Result<Vec<String>>;

    /// Create `name` at display position `index` and write `header` to its first row
    fn create_sheet(&self, name: &str, index: usize, header: &[&str]) -> Result<()>;

    /// All non-empty rows within `range`, trailing empty cells trimmed
    fn read(&self, range: &SheetRange) -> Result<Vec<Row>>;

    /// Overwrite `range` starting at its top-left cell; returns the row count
    /// the backend reports as updated
    fn update(&self, range: &SheetRange, rows: &[Row]) -> Result<usize>;

    /// Write `rows` after the last non-empty row within `range`; returns the
    /// row count the backend reports as appended
    fn append(&self, range: &SheetRange, rows: &[Row]) -> Result<usize>;

    /// Blank every cell within `range`
    fn clear(&self, range: &SheetRange) -> Result<()>;
}

/// Update `range` and fail unless the backend reports every row written
pub fn update_checked(store: &dyn SheetStore, range: &SheetRange, rows: &[Row]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let updated = store.update(range, rows)?;
    ensure_row_count(range, "updated", rows.len(), updated)?;
    debug!("Updated {} rows in {}", updated, range);
    Ok(())
}

/// Append to `range` and fail unless the backend reports every row written
///
/// No request is made for an empty batch.
pub fn append_checked(store: &dyn SheetStore, range: &SheetRange, rows: &[Row]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let appended = store.append(range, rows)?;
    ensure_row_count(range, "appended", rows.len(), appended)?;
    debug!("Appended {} rows to {}", appended, range);
    Ok(())
}

/// Replace the contents of `range` with `rows`
///
/// The range is cleared first so a shorter table leaves no stale rows behind.
pub fn replace_checked(store: &dyn SheetStore, range: &SheetRange, rows: &[Row]) -> Result<()> {
    store.clear(range)?;
    update_checked(store, range, rows)
}

fn ensure_row_count(range: &SheetRange, action: &str, expected: usize, reported: usize) -> Result<()> {
    if expected != reported {
        return Err(TrafficError::write_integrity(format!(
            "{}: expected {} rows {}, backend reported {}",
            range, expected, action, reported
        )));
    }
    Ok(())
}
