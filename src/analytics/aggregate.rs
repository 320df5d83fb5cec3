//! Key/count/uniques tables
//!
//! `AggregateTable` keeps first-seen order so that the stable sort applied
//! before every write breaks count ties by insertion order.

use std::collections::HashMap;

use tracing::warn;

use crate::errors::{Result, TrafficError};
use crate::storage::Row;

/// 访问次数与独立访客数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub count: u64,
    pub uniques: u64,
}

impl Counts {
    pub fn new(count: u64, uniques: u64) -> Self {
        Self { count, uniques }
    }

    /// Growth from `previous` to `self`, clamped at zero per field
    pub fn saturating_delta(&self, previous: &Counts) -> Counts {
        Counts {
            count: self.count.saturating_sub(previous.count),
            uniques: self.uniques.saturating_sub(previous.uniques),
        }
    }

    pub fn add(&mut self, other: &Counts) {
        self.count = self.count.saturating_add(other.count);
        self.uniques = self.uniques.saturating_add(other.uniques);
    }

}

/// 表中的一行：key（path 或 referrer）及其计数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEntry {
    pub key: String,
    pub counts: Counts,
}

impl AggregateEntry {
    pub fn new(key: impl Into<String>, count: u64, uniques: u64) -> Self {
        Self {
            key: key.into(),
            counts: Counts::new(count, uniques),
        }
    }

    pub fn to_row(&self) -> Row {
        vec![
            self.key.clone(),
            self.counts.count.to_string(),
            self.counts.uniques.to_string(),
        ]
    }

    /// Parse a persisted `[key, count, uniques]` row
    ///
    /// Returns `Ok(None)` for a blank row.
    pub fn from_row(row: &[String]) -> Result<Option<Self>> {
        if row.iter().all(|c| c.trim().is_empty()) {
            return Ok(None);
        }
        let key = row.first().map(String::as_str).unwrap_or_default();
        if key.is_empty() {
            return Err(TrafficError::parse(format!("Row without a key: {:?}", row)));
        }
        let count = parse_count(key, "count", row.get(1))?;
        let uniques = parse_count(key, "uniques", row.get(2))?;
        Ok(Some(Self::new(key, count, uniques)))
    }
}

fn parse_count(key: &str, column: &str, cell: Option<&String>) -> Result<u64> {
    let raw = cell.map(|c| c.trim()).unwrap_or_default();
    // 表格可能以千分位格式显示数字
    raw.replace(',', "").parse::<u64>().map_err(|_| {
        TrafficError::parse(format!(
            "Invalid {} '{}' for key '{}'",
            column, raw, key
        ))
    })
}

/// Insertion-ordered map of key → counts
#[derive(Debug, Clone, Default)]
pub struct AggregateTable {
    entries: Vec<AggregateEntry>,
    index: HashMap<String, usize>,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rows read with the header included; the header is skipped
    ///
    /// A key listed twice keeps its first position and the larger of the
    /// two counts per field, so a leftover row can never lower a total.
    pub fn from_sheet_rows(rows: &[Row]) -> Result<Self> {
        let mut table = Self::new();
        for row in rows.iter().skip(1) {
            if let Some(entry) = AggregateEntry::from_row(row)? {
                table.insert_max(entry);
            }
        }
        Ok(table)
    }

    pub fn from_entries<I: IntoIterator<Item = AggregateEntry>>(entries: I) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    pub fn get(&self, key: &str) -> Option<&Counts> {
        self.index.get(key).map(|&i| &self.entries[i].counts)
    }

    /// Set the counts of a key; a repeated key keeps its first position
    pub fn insert(&mut self, entry: AggregateEntry) {
        match self.index.get(&entry.key) {
            Some(&i) => self.entries[i].counts = entry.counts,
            None => {
                self.index.insert(entry.key.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Like `insert`, but a repeated key keeps the per-field maximum
    pub fn insert_max(&mut self, entry: AggregateEntry) {
        match self.index.get(&entry.key) {
            Some(&i) => {
                let counts = &mut self.entries[i].counts;
                warn!("Duplicate row for '{}', keeping the larger counts", entry.key);
                counts.count = counts.count.max(entry.counts.count);
                counts.uniques = counts.uniques.max(entry.counts.uniques);
            }
            None => self.insert(entry),
        }
    }

    /// Add `delta` to `key`, appending it if unseen; returns whether the key was new
    pub fn accumulate(&mut self, key: &str, delta: &Counts) -> bool {
        match self.index.get(key) {
            Some(&i) => {
                self.entries[i].counts.add(delta);
                false
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push(AggregateEntry {
                    key: key.to_string(),
                    counts: *delta,
                });
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregateEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按 count 降序输出，count 相同时保持插入顺序
    pub fn into_sorted_rows(self) -> Vec<Row> {
        let mut entries = self.entries;
        sort_by_count_desc(&mut entries);
        entries.iter().map(AggregateEntry::to_row).collect()
    }
}

/// Stable sort by descending count
pub fn sort_by_count_desc(entries: &mut [AggregateEntry]) {
    entries.sort_by(|a, b| b.counts.count.cmp(&a.counts.count));
}
