//! End-to-end runs of `TrafficJob` over the in-memory store

mod common;

use std::collections::HashMap;

use chrono::NaiveDate;
use common::row;
use parking_lot::Mutex;
use serde_json::{Value, json};
use trafficsheet::analytics::Stream;
use trafficsheet::errors::{Result, TrafficError};
use trafficsheet::runtime::TrafficJob;
use trafficsheet::services::traffic::{TrafficMetric, TrafficSource};
use trafficsheet::storage::{MemorySheetStore, Row, SheetRange, SheetStore};

/// 可在两次运行之间替换数据的流量源
#[derive(Default)]
struct ScriptedSource {
    payloads: Mutex<HashMap<TrafficMetric, Value>>,
}

impl ScriptedSource {
    fn set(&self, metric: TrafficMetric, payload: Value) {
        self.payloads.lock().insert(metric, payload);
    }

    fn remove(&self, metric: TrafficMetric) {
        self.payloads.lock().remove(&metric);
    }
}

impl TrafficSource for ScriptedSource {
    fn fetch_metric(&self, metric: TrafficMetric) -> Result<Option<Value>> {
        Ok(self.payloads.lock().get(&metric).cloned())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// 对指定工作表少报更新行数的存储
struct ShortWriteStore {
    inner: MemorySheetStore,
    sheet: &'static str,
}

impl SheetStore for ShortWriteStore {
    fn backend_name(&self) -> &'static str {
        "short-write"
    }

    fn sheet_names(&self) -> Result<Vec<String>> {
        self.inner.sheet_names()
    }

    fn create_sheet(&self, name: &str, index: usize, header: &[&str]) -> Result<()> {
        self.inner.create_sheet(name, index, header)
    }

    fn read(&self, range: &SheetRange) -> Result<Vec<Row>> {
        self.inner.read(range)
    }

    fn update(&self, range: &SheetRange, rows: &[Row]) -> Result<usize> {
        let updated = self.inner.update(range, rows)?;
        if range.sheet() == self.sheet {
            Ok(updated.saturating_sub(1))
        } else {
            Ok(updated)
        }
    }

    fn append(&self, range: &SheetRange, rows: &[Row]) -> Result<usize> {
        self.inner.append(range, rows)
    }

    fn clear(&self, range: &SheetRange) -> Result<()> {
        self.inner.clear(range)
    }
}

struct FailingSource;

impl TrafficSource for FailingSource {
    fn fetch_metric(&self, _metric: TrafficMetric) -> Result<Option<Value>> {
        Err(TrafficError::transport("connection refused"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn full_source() -> ScriptedSource {
    let source = ScriptedSource::default();
    source.set(
        TrafficMetric::Clones,
        json!({"count": 7, "uniques": 3, "clones": [
            {"timestamp": "2024-01-01T00:00:00Z", "count": 3, "uniques": 1},
            {"timestamp": "2024-01-02T00:00:00Z", "count": 4, "uniques": 2}
        ]}),
    );
    source.set(
        TrafficMetric::Views,
        json!({"count": 25, "uniques": 9, "views": [
            {"timestamp": "2024-01-01T00:00:00Z", "count": 10, "uniques": 4},
            {"timestamp": "2024-01-02T00:00:00Z", "count": 15, "uniques": 5}
        ]}),
    );
    source.set(
        TrafficMetric::PopularPaths,
        json!([
            {"path": "/", "title": "home", "count": 12, "uniques": 4},
            {"path": "/docs", "title": "docs", "count": 30, "uniques": 6}
        ]),
    );
    source.set(
        TrafficMetric::PopularReferrers,
        json!([{"referrer": "github.com", "count": 9, "uniques": 3}]),
    );
    source
}

fn sheet(store: &MemorySheetStore, name: &str) -> Vec<Row> {
    store.sheet_rows(name).unwrap()
}

#[test]
fn test_first_run_bootstraps_and_fills_every_table() {
    let store = MemorySheetStore::new().with_sheet("Sheet1", vec![]);
    let source = full_source();

    let report = TrafficJob::new(&store, &source).run(day("2024-01-02")).unwrap();

    assert_eq!(report.created_sheets.len(), 5);
    // 2024-01-02 是当天，不写入
    assert_eq!(report.daily_rows_appended, 1);
    assert_eq!(
        sheet(&store, "clones-views"),
        vec![
            row(&["Date", "Clones", "Unique Clones", "Views", "Unique Views"]),
            row(&["2024-01-01", "3", "1", "10", "4"]),
        ]
    );
    assert_eq!(
        sheet(&store, "paths"),
        vec![
            row(&["Path", "Count", "Uniques"]),
            row(&["/docs", "30", "6"]),
            row(&["/", "12", "4"]),
        ]
    );
    assert_eq!(sheet(&store, "paths-last"), sheet(&store, "paths"));
    assert_eq!(
        sheet(&store, "referrers"),
        vec![row(&["Referrers", "Count", "Uniques"]), row(&["github.com", "9", "3"])]
    );
    assert_eq!(report.outcome(Stream::Paths).unwrap().new_keys, 2);
}

#[test]
fn test_second_run_accumulates_deltas() {
    let store = MemorySheetStore::new();
    let source = full_source();
    let job = TrafficJob::new(&store, &source);
    job.run(day("2024-01-02")).unwrap();

    source.set(
        TrafficMetric::PopularPaths,
        json!([
            {"path": "/", "title": "home", "count": 20, "uniques": 9},
            {"path": "/docs", "title": "docs", "count": 25, "uniques": 6},
            {"path": "/new", "title": "new", "count": 5, "uniques": 2}
        ]),
    );
    let report = job.run(day("2024-01-03")).unwrap();

    assert!(report.created_sheets.is_empty());
    assert_eq!(report.daily_rows_appended, 1);
    let paths = report.outcome(Stream::Paths).unwrap();
    assert_eq!(paths.new_keys, 1);
    assert_eq!(paths.count_added, 8 + 5);

    assert_eq!(
        sheet(&store, "paths"),
        vec![
            row(&["Path", "Count", "Uniques"]),
            row(&["/docs", "30", "6"]),
            row(&["/", "20", "9"]),
            row(&["/new", "5", "2"]),
        ]
    );
    assert_eq!(
        sheet(&store, "paths-last"),
        vec![
            row(&["Path", "Count", "Uniques"]),
            row(&["/docs", "25", "6"]),
            row(&["/", "20", "9"]),
            row(&["/new", "5", "2"]),
        ]
    );
    assert_eq!(
        sheet(&store, "clones-views").last().unwrap(),
        &row(&["2024-01-02", "4", "2", "15", "5"])
    );
}

#[test]
fn test_rerun_same_day_changes_nothing() {
    let store = MemorySheetStore::new();
    let source = full_source();
    let job = TrafficJob::new(&store, &source);
    job.run(day("2024-01-03")).unwrap();

    let before: Vec<Vec<Row>> = ["clones-views", "paths", "paths-last", "referrers", "referrers-last"]
        .iter()
        .map(|s| sheet(&store, s))
        .collect();

    let report = job.run(day("2024-01-03")).unwrap();
    assert_eq!(report.daily_rows_appended, 0);
    assert_eq!(report.outcome(Stream::Paths).unwrap().count_added, 0);

    let after: Vec<Vec<Row>> = ["clones-views", "paths", "paths-last", "referrers", "referrers-last"]
        .iter()
        .map(|s| sheet(&store, s))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_missing_paths_leaves_paths_untouched() {
    let store = MemorySheetStore::new();
    let source = full_source();
    let job = TrafficJob::new(&store, &source);
    job.run(day("2024-01-03")).unwrap();
    let paths_before = sheet(&store, "paths");
    let last_before = sheet(&store, "paths-last");

    source.remove(TrafficMetric::PopularPaths);
    source.set(
        TrafficMetric::PopularReferrers,
        json!([{"referrer": "github.com", "count": 14, "uniques": 5}]),
    );
    let report = job.run(day("2024-01-04")).unwrap();

    assert!(report.paths.is_none());
    assert_eq!(sheet(&store, "paths"), paths_before);
    assert_eq!(sheet(&store, "paths-last"), last_before);

    assert_eq!(report.outcome(Stream::Referrers).unwrap().count_added, 5);
    assert_eq!(
        sheet(&store, "referrers"),
        vec![row(&["Referrers", "Count", "Uniques"]), row(&["github.com", "14", "5"])]
    );
}

#[test]
fn test_transport_failure_aborts_after_bootstrap() {
    let store = MemorySheetStore::new();
    let err = TrafficJob::new(&store, &FailingSource)
        .run(day("2024-01-03"))
        .unwrap_err();
    assert!(matches!(err, TrafficError::Transport(_)));

    // 建表已完成，但未写入任何数据
    assert_eq!(store.sheet_names().unwrap().len(), 5);
    assert_eq!(
        store.read(&SheetRange::new("paths", "A1:C")).unwrap(),
        vec![row(&["Path", "Count", "Uniques"])]
    );
}

#[test]
fn test_corrupt_total_is_fatal() {
    let store = MemorySheetStore::new();
    let source = full_source();
    let job = TrafficJob::new(&store, &source);
    job.run(day("2024-01-03")).unwrap();

    store
        .update(&SheetRange::new("paths", "B2"), &[row(&["many"])])
        .unwrap();
    let err = job.run(day("2024-01-04")).unwrap_err();
    assert!(matches!(err, TrafficError::Parse(_)));
}

#[test]
fn test_short_write_on_paths_aborts_before_referrers() {
    let store = ShortWriteStore {
        inner: MemorySheetStore::new(),
        sheet: "paths",
    };
    let source = full_source();

    let err = TrafficJob::new(&store, &source)
        .run(day("2024-01-03"))
        .unwrap_err();
    assert!(matches!(err, TrafficError::WriteIntegrity(_)));

    // 日数据已写入，之后的阶段都没有执行
    assert_eq!(sheet(&store.inner, "clones-views").len(), 3);
    assert_eq!(
        sheet(&store.inner, "paths-last"),
        vec![row(&["Path", "Count", "Uniques"])]
    );
    assert_eq!(
        sheet(&store.inner, "referrers"),
        vec![row(&["Referrers", "Count", "Uniques"])]
    );
    assert_eq!(
        sheet(&store.inner, "referrers-last"),
        vec![row(&["Referrers", "Count", "Uniques"])]
    );
}
