use tracing::info;

use super::layout::REQUIRED_SHEETS;
use crate::errors::Result;
use crate::storage::SheetStore;

/// Create every required sheet that is missing, with its header and position
///
/// Returns the names of the sheets created this run.
pub fn ensure_sheets(store: &dyn SheetStore) -> Result<Vec<&'static str>> {
    let existing = store.sheet_names()?;
    let mut created = Vec::new();

    for layout in REQUIRED_SHEETS {
        if existing.iter().any(|name| name == layout.name) {
            continue;
        }
        store.create_sheet(layout.name, layout.position, layout.header)?;
        info!("Created sheet '{}' on {}", layout.name, store.backend_name());
        created.push(layout.name);
    }

    Ok(created)
}
