use std::fmt;

use crate::errors::{Result, TrafficError};

/// 表格中的一行（单元格均以字符串表示，写入时由后端按 USER_ENTERED 解析）
pub type Row = Vec<String>;

/// A sheet-qualified A1 range, e.g. `paths!A2:C`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetRange {
    sheet: String,
    cells: String,
}

impl SheetRange {
    pub fn new(sheet: impl Into<String>, cells: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            cells: cells.into(),
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn cells(&self) -> &str {
        &self.cells
    }

    /// A1 notation understood by the Sheets API
    ///
    /// Sheet names containing anything beyond ASCII alphanumerics, `-` and
    /// `_` are quoted.
    pub fn a1(&self) -> String {
        let plain = self
            .sheet
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if plain {
            format!("{}!{}", self.sheet, self.cells)
        } else {
            format!("'{}'!{}", self.sheet.replace('\'', "''"), self.cells)
        }
    }

    pub fn span(&self) -> Result<CellSpan> {
        CellSpan::parse(&self.cells)
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.a1())
    }
}

/// 解析后的单元格区域（0 起始，结束位置包含在内）
///
/// `A2:C` → start_col 0, start_row 1, end_col Some(2), end_row None
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub start_col: usize,
    pub start_row: usize,
    pub end_col: Option<usize>,
    pub end_row: Option<usize>,
}

impl CellSpan {
    pub fn parse(cells: &str) -> Result<Self> {
        let (start, end) = match cells.split_once(':') {
            Some((start, end)) => (start, Some(end)),
            None => (cells, None),
        };

        let (start_col, start_row) = parse_cell(start)
            .ok_or_else(|| TrafficError::invalid_range(format!("Invalid start cell in '{}'", cells)))?;
        let start_col = start_col
            .ok_or_else(|| TrafficError::invalid_range(format!("Missing start column in '{}'", cells)))?;
        let start_row = start_row.unwrap_or(0);

        let (end_col, end_row) = match end {
            Some(end) => parse_cell(end).ok_or_else(|| {
                TrafficError::invalid_range(format!("Invalid end cell in '{}'", cells))
            })?,
            // 单个单元格
            None => (Some(start_col), Some(start_row)),
        };

        if end_col.is_some_and(|c| c < start_col) || end_row.is_some_and(|r| r < start_row) {
            return Err(TrafficError::invalid_range(format!(
                "Range '{}' ends before it starts",
                cells
            )));
        }

        Ok(Self {
            start_col,
            start_row,
            end_col,
            end_row,
        })
    }

    pub fn contains_row(&self, row: usize) -> bool {
        row >= self.start_row && self.end_row.is_none_or(|end| row <= end)
    }

    pub fn contains_col(&self, col: usize) -> bool {
        col >= self.start_col && self.end_col.is_none_or(|end| col <= end)
    }
}

/// Parses `AB12` into (column, row), both 0-based; either part may be absent
fn parse_cell(cell: &str) -> Option<(Option<usize>, Option<usize>)> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    let split = cell
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(cell.len());
    let (letters, digits) = cell.split_at(split);

    let col = if letters.is_empty() {
        None
    } else {
        let mut acc = 0usize;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return None;
            }
            acc = acc * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
        }
        Some(acc - 1)
    };

    let row = if digits.is_empty() {
        None
    } else {
        let n: usize = digits.parse().ok()?;
        if n == 0 {
            return None;
        }
        Some(n - 1)
    };

    Some((col, row))
}
