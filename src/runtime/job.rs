//! One run of the traffic job
//!
//! bootstrap → fetch → daily append → reconcile paths → reconcile referrers.
//! The first error aborts the run; stages already written stay written.

use chrono::NaiveDate;
use tracing::info;

use crate::analytics::{
    DailyMetricsAppender, ReconcileOutcome, SnapshotReconciler, Stream, ensure_sheets,
};
use crate::errors::Result;
use crate::services::traffic::{TrafficSource, fetch_snapshot};
use crate::storage::SheetStore;

/// 本次运行结果汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub created_sheets: Vec<&'static str>,
    pub daily_rows_appended: usize,
    /// `None` when paths were not fetched this run
    pub paths: Option<ReconcileOutcome>,
    /// `None` when referrers were not fetched this run
    pub referrers: Option<ReconcileOutcome>,
}

impl RunReport {
    pub fn outcome(&self, stream: Stream) -> Option<&ReconcileOutcome> {
        match stream {
            Stream::Paths => self.paths.as_ref(),
            Stream::Referrers => self.referrers.as_ref(),
        }
    }
}

pub struct TrafficJob<'a> {
    store: &'a dyn SheetStore,
    source: &'a dyn TrafficSource,
}

impl<'a> TrafficJob<'a> {
    pub fn new(store: &'a dyn SheetStore, source: &'a dyn TrafficSource) -> Self {
        Self { store, source }
    }

    /// Run every stage once; `today` is the in-progress UTC day
    pub fn run(&self, today: NaiveDate) -> Result<RunReport> {
        let mut report = RunReport {
            created_sheets: ensure_sheets(self.store)?,
            ..Default::default()
        };

        let snapshot = fetch_snapshot(self.source)?;

        report.daily_rows_appended = DailyMetricsAppender::new(self.store).append(&snapshot, today)?;

        for stream in Stream::ALL {
            let entries = stream.entries(&snapshot);
            let outcome = SnapshotReconciler::new(self.store, stream).reconcile(entries.as_deref())?;
            match stream {
                Stream::Paths => report.paths = outcome,
                Stream::Referrers => report.referrers = outcome,
            }
        }

        log_report(&report);
        Ok(report)
    }
}

fn log_report(report: &RunReport) {
    if !report.created_sheets.is_empty() {
        info!("Created sheets: {}", report.created_sheets.join(", "));
    }
    info!("Daily rows appended: {}", report.daily_rows_appended);
    for stream in Stream::ALL {
        match report.outcome(stream) {
            Some(o) => info!(
                "{}: {} keys in snapshot, {} new, {} total, +{} count, +{} uniques",
                stream, o.keys_in_snapshot, o.new_keys, o.total_keys, o.count_added, o.uniques_added
            ),
            None => info!("{}: skipped", stream),
        }
    }
}
