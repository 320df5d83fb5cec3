//! Daily clones/views time series
//!
//! Only closed UTC days are written, each at most once: dates already in the
//! sheet and the current day are skipped, so re-running with the same
//! payload appends nothing.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info};

use super::layout::clones_views_table;
use crate::errors::Result;
use crate::services::traffic::TrafficSnapshot;
use crate::storage::{Row, SheetStore, append_checked};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 每日一行的 clone / view 统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyMetricRow {
    pub date: NaiveDate,
    pub clone_count: u64,
    pub clone_unique_count: u64,
    pub view_count: u64,
    pub view_unique_count: u64,
}

impl DailyMetricRow {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            clone_count: 0,
            clone_unique_count: 0,
            view_count: 0,
            view_unique_count: 0,
        }
    }

    pub fn to_row(&self) -> Row {
        vec![
            self.date.format(DATE_FORMAT).to_string(),
            self.clone_count.to_string(),
            self.clone_unique_count.to_string(),
            self.view_count.to_string(),
            self.view_unique_count.to_string(),
        ]
    }
}

/// Dates already in the sheet, from rows read with the header included
pub fn recorded_dates(rows: &[Row]) -> HashSet<String> {
    rows.iter()
        .skip(1)
        .filter_map(|row| row.first())
        .map(|date| date.trim().to_string())
        .filter(|date| !date.is_empty())
        .collect()
}

/// Rows to append for `snapshot`, ascending by date
///
/// A date is staged when it is neither recorded nor `today`. View counts are
/// merged into the row staged by the clone pass; a side with no datapoint
/// for a date stays zero.
pub fn stage_daily_rows(
    snapshot: &TrafficSnapshot,
    recorded: &HashSet<String>,
    today: NaiveDate,
) -> Result<Vec<DailyMetricRow>> {
    let mut staged: BTreeMap<NaiveDate, DailyMetricRow> = BTreeMap::new();
    let skip = |date: NaiveDate| {
        date == today || recorded.contains(&date.format(DATE_FORMAT).to_string())
    };

    if let Some(clones) = &snapshot.clones {
        for point in &clones.clones {
            let date = point.date()?;
            if skip(date) {
                continue;
            }
            let row = staged.entry(date).or_insert_with(|| DailyMetricRow::new(date));
            row.clone_count = point.count;
            row.clone_unique_count = point.uniques;
        }
    }

    if let Some(views) = &snapshot.views {
        for point in &views.views {
            let date = point.date()?;
            if skip(date) {
                continue;
            }
            let row = staged.entry(date).or_insert_with(|| DailyMetricRow::new(date));
            row.view_count = point.count;
            row.view_unique_count = point.uniques;
        }
    }

    Ok(staged.into_values().collect())
}

/// Appends closed days to the `clones-views` sheet
pub struct DailyMetricsAppender<'a> {
    store: &'a dyn SheetStore,
}

impl<'a> DailyMetricsAppender<'a> {
    pub fn new(store: &'a dyn SheetStore) -> Self {
        Self { store }
    }

    /// Stage and append in a single batch; returns the number of rows appended
    pub fn append(&self, snapshot: &TrafficSnapshot, today: NaiveDate) -> Result<usize> {
        let range = clones_views_table();
        let existing = self.store.read(&range)?;
        let recorded = recorded_dates(&existing);
        debug!("{} dates already recorded in {}", recorded.len(), range);

        let staged = stage_daily_rows(snapshot, &recorded, today)?;
        let rows: Vec<Row> = staged.iter().map(DailyMetricRow::to_row).collect();
        append_checked(self.store, &range, &rows)?;

        info!("Appended {} daily rows", rows.len());
        Ok(rows.len())
    }
}
