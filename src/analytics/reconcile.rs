//! Snapshot-delta reconciliation of a keyed stream
//!
//! Upstream only ever reports a trailing window, so each run compares the
//! new snapshot against the one stored in the Last-Snapshot table and folds
//! the growth into the Total table:
//!
//! - key seen last run: delta = new - last, clamped at zero per field
//! - key not seen last run: delta = new (a key that drops out of the window
//!   and comes back is credited in full again)
//!
//! Total is then rewritten sorted by count, and Last-Snapshot is replaced by
//! the verbatim snapshot.

use tracing::{debug, info};

use super::aggregate::{AggregateEntry, AggregateTable};
use super::layout::{aggregate_body, aggregate_table};
use super::stream::Stream;
use crate::errors::Result;
use crate::storage::{SheetStore, replace_checked};

/// 单个流本次对账的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Entries in the new snapshot
    pub keys_in_snapshot: usize,
    /// Keys added to the Total table this run
    pub new_keys: usize,
    /// Keys in the Total table after the run
    pub total_keys: usize,
    pub count_added: u64,
    pub uniques_added: u64,
}

/// Fold `snapshot` into `total` using `last` as the delta baseline
pub fn fold_snapshot(
    total: &mut AggregateTable,
    last: &AggregateTable,
    snapshot: &[AggregateEntry],
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome {
        keys_in_snapshot: snapshot.len(),
        ..Default::default()
    };

    for entry in snapshot {
        let delta = match last.get(&entry.key) {
            Some(previous) => entry.counts.saturating_delta(previous),
            None => entry.counts,
        };
        if total.accumulate(&entry.key, &delta) {
            outcome.new_keys += 1;
        }
        outcome.count_added += delta.count;
        outcome.uniques_added += delta.uniques;
    }

    outcome.total_keys = total.len();
    outcome
}

/// Reconciles one stream against a `SheetStore`
pub struct SnapshotReconciler<'a> {
    store: &'a dyn SheetStore,
    stream: Stream,
}

impl<'a> SnapshotReconciler<'a> {
    pub fn new(store: &'a dyn SheetStore, stream: Stream) -> Self {
        Self { store, stream }
    }

    /// Persisted Total table (header skipped)
    pub fn load_total(&self) -> Result<AggregateTable> {
        self.load(self.stream.total_sheet())
    }

    /// Persisted Last-Snapshot table (header skipped)
    pub fn load_last(&self) -> Result<AggregateTable> {
        self.load(self.stream.last_sheet())
    }

    fn load(&self, sheet: &str) -> Result<AggregateTable> {
        let rows = self.store.read(&aggregate_table(sheet))?;
        AggregateTable::from_sheet_rows(&rows)
    }

    /// Run one read-diff-fold-write cycle
    ///
    /// `snapshot` is `None` when the stream was not fetched this run; nothing
    /// is written then and `Ok(None)` is returned.
    pub fn reconcile(&self, snapshot: Option<&[AggregateEntry]>) -> Result<Option<ReconcileOutcome>> {
        let mut total = self.load_total()?;
        let last = self.load_last()?;

        let Some(snapshot) = snapshot else {
            info!("No {} data this run, leaving tables untouched", self.stream);
            return Ok(None);
        };

        let outcome = fold_snapshot(&mut total, &last, snapshot);
        debug!(
            "{}: {} keys in snapshot, {} new, +{} count, +{} uniques",
            self.stream,
            outcome.keys_in_snapshot,
            outcome.new_keys,
            outcome.count_added,
            outcome.uniques_added
        );

        replace_checked(
            self.store,
            &aggregate_body(self.stream.total_sheet()),
            &total.into_sorted_rows(),
        )?;

        let verbatim = AggregateTable::from_entries(snapshot.iter().cloned());
        replace_checked(
            self.store,
            &aggregate_body(self.stream.last_sheet()),
            &verbatim.into_sorted_rows(),
        )?;

        info!(
            "Reconciled {}: {} total keys ({} new)",
            self.stream, outcome.total_keys, outcome.new_keys
        );
        Ok(Some(outcome))
    }
}
