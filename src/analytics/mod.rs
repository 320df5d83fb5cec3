//! Traffic accounting on top of a `SheetStore`
//!
//! - `bootstrap`: create the five required sheets
//! - `daily`: append closed days of clones/views
//! - `reconcile`: fold path/referrer snapshots into running totals

pub mod aggregate;
pub mod bootstrap;
pub mod daily;
pub mod layout;
pub mod reconcile;
pub mod stream;

pub use aggregate::{AggregateEntry, AggregateTable, Counts};
pub use bootstrap::ensure_sheets;
pub use daily::{DailyMetricRow, DailyMetricsAppender};
pub use reconcile::{ReconcileOutcome, SnapshotReconciler, fold_snapshot};
pub use stream::Stream;
