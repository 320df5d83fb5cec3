//! In-memory SheetStore
//!
//! Mirrors the observable behavior of the Sheets values API closely enough
//! for the reconciliation logic: A1 ranges, trimmed trailing cells and rows,
//! append-after-last-row and positional sheet creation.

use parking_lot::Mutex;

use crate::errors::{Result, TrafficError};
use crate::storage::{CellSpan, Row, SheetRange, SheetStore};

struct Sheet {
    name: String,
    rows: Vec<Row>,
}

#[derive(Default)]
pub struct MemorySheetStore {
    sheets: Mutex<Vec<Sheet>>,
}

impl MemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一个带内容的工作表（测试用）
    pub fn with_sheet(self, name: &str, rows: Vec<Row>) -> Self {
        self.sheets.lock().push(Sheet {
            name: name.to_string(),
            rows,
        });
        self
    }

    /// Full contents of `name` with trailing blanks trimmed
    pub fn sheet_rows(&self, name: &str) -> Option<Vec<Row>> {
        let sheets = self.sheets.lock();
        let sheet = sheets.iter().find(|s| s.name == name)?;
        let mut rows: Vec<Row> = sheet
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                trim_row(&mut row);
                row
            })
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Some(rows)
    }

    fn with_grid<T>(&self, sheet: &str, f: impl FnOnce(&mut Vec<Row>) -> Result<T>) -> Result<T> {
        let mut sheets = self.sheets.lock();
        let sheet = sheets
            .iter_mut()
            .find(|s| s.name == sheet)
            .ok_or_else(|| {
                TrafficError::store(format!("Unable to parse range: sheet '{}' not found", sheet))
            })?;
        f(&mut sheet.rows)
    }
}

impl SheetStore for MemorySheetStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.sheets.lock().iter().map(|s| s.name.clone()).collect())
    }

    fn create_sheet(&self, name: &str, index: usize, header: &[&str]) -> Result<()> {
        let mut sheets = self.sheets.lock();
        if sheets.iter().any(|s| s.name == name) {
            return Err(TrafficError::store(format!(
                "A sheet with the name \"{}\" already exists",
                name
            )));
        }
        let index = index.min(sheets.len());
        sheets.insert(
            index,
            Sheet {
                name: name.to_string(),
                rows: vec![header.iter().map(|h| h.to_string()).collect()],
            },
        );
        Ok(())
    }

    fn read(&self, range: &SheetRange) -> Result<Vec<Row>> {
        let span = range.span()?;
        self.with_grid(range.sheet(), |grid| {
            let mut out: Vec<Row> = grid
                .iter()
                .enumerate()
                .filter(|(i, _)| span.contains_row(*i))
                .map(|(_, row)| {
                    let end = span.end_col.map_or(row.len(), |e| (e + 1).min(row.len()));
                    let mut cells = if span.start_col < end {
                        row[span.start_col..end].to_vec()
                    } else {
                        Vec::new()
                    };
                    trim_row(&mut cells);
                    cells
                })
                .collect();
            while out.last().is_some_and(|r| r.is_empty()) {
                out.pop();
            }
            Ok(out)
        })
    }

    fn update(&self, range: &SheetRange, rows: &[Row]) -> Result<usize> {
        let span = range.span()?;
        check_fits(range, &span, span.start_row, rows)?;
        self.with_grid(range.sheet(), |grid| {
            write_rows(grid, &span, span.start_row, rows);
            Ok(rows.len())
        })
    }

    fn append(&self, range: &SheetRange, rows: &[Row]) -> Result<usize> {
        let span = range.span()?;
        self.with_grid(range.sheet(), |grid| {
            let last = grid
                .iter()
                .enumerate()
                .filter(|(i, row)| {
                    span.contains_row(*i)
                        && row
                            .iter()
                            .enumerate()
                            .any(|(j, c)| span.contains_col(j) && !c.is_empty())
                })
                .map(|(i, _)| i)
                .last();
            let start_row = last.map_or(span.start_row, |i| i + 1);
            check_fits(range, &span, start_row, rows)?;
            write_rows(grid, &span, start_row, rows);
            Ok(rows.len())
        })
    }

    fn clear(&self, range: &SheetRange) -> Result<()> {
        let span = range.span()?;
        self.with_grid(range.sheet(), |grid| {
            for (i, row) in grid.iter_mut().enumerate() {
                if !span.contains_row(i) {
                    continue;
                }
                for (j, cell) in row.iter_mut().enumerate() {
                    if span.contains_col(j) {
                        cell.clear();
                    }
                }
                trim_row(row);
            }
            Ok(())
        })
    }
}

fn check_fits(range: &SheetRange, span: &CellSpan, start_row: usize, rows: &[Row]) -> Result<()> {
    if let Some(end_row) = span.end_row
        && !rows.is_empty()
        && start_row + rows.len() - 1 > end_row
    {
        return Err(TrafficError::store(format!(
            "{} rows do not fit in range {}",
            rows.len(),
            range
        )));
    }
    if let Some(end_col) = span.end_col {
        let width = end_col - span.start_col + 1;
        if rows.iter().any(|r| r.len() > width) {
            return Err(TrafficError::store(format!(
                "Row wider than {} columns for range {}",
                width, range
            )));
        }
    }
    Ok(())
}

fn write_rows(grid: &mut Vec<Row>, span: &CellSpan, start_row: usize, rows: &[Row]) {
    for (i, row) in rows.iter().enumerate() {
        let r = start_row + i;
        while grid.len() <= r {
            grid.push(Vec::new());
        }
        let target = &mut grid[r];
        for (j, cell) in row.iter().enumerate() {
            let c = span.start_col + j;
            while target.len() <= c {
                target.push(String::new());
            }
            target[c] = cell.clone();
        }
        trim_row(target);
    }
}

fn trim_row(row: &mut Row) {
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
}
