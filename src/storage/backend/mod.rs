//! SheetStore backends
//!
//! - `GoogleSheetsStore`: Google Sheets REST v4 over ureq
//! - `MemorySheetStore`: in-process grid, used by tests and dry runs

mod google_sheets;
mod memory;

pub use google_sheets::GoogleSheetsStore;
pub use memory::MemorySheetStore;
