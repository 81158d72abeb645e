use crate::error::{Result, TemplateError};
use indexmap::IndexMap;
use std::io::Read;
use std::path::Path;

/// Row-addressable cell data, e.g. one spreadsheet sheet.
pub trait RowSource {
    /// Number of rows available; scans never go past it.
    fn row_count(&self) -> usize;

    /// Display string of the cell at `row`, `column` (both 0-based).
    /// `None` for cells that were never filled in.
    fn cell(&self, row: usize, column: usize) -> Option<&str>;

    /// Like [`RowSource::cell`], but empty and whitespace-only cells are `None` too.
    fn filled_cell(&self, row: usize, column: usize) -> Option<&str> {
        self.cell(row, column).filter(|c| !c.trim().is_empty())
    }
}

/// An in-memory sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new() -> Self {
        Table { rows: Vec::new() }
    }

    /// Build a table from string rows; empty strings become unfilled cells.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        let cell = cell.as_ref();
                        (!cell.is_empty()).then(|| cell.to_string())
                    })
                    .collect()
            })
            .collect();
        Table { rows }
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }

    /// Read a headerless CSV; rows may differ in width.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut table = Table::new();
        for record in reader.records() {
            let record = record?;
            table.push_row(
                record
                    .iter()
                    .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                    .collect(),
            );
        }
        Ok(table)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TemplateError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }
}

impl RowSource for Table {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }
}

// ── Source workbooks ────────────────────────────────────────────────

/// The opened source workbooks that `File` overlays fetch values from,
/// keyed by the file name used in the template.
#[derive(Debug, Clone, Default)]
pub struct SourceBook {
    workbooks: IndexMap<String, IndexMap<String, Table>>,
}

impl SourceBook {
    pub fn new() -> Self {
        SourceBook::default()
    }

    /// Add (or replace) `sheet` of workbook `file`.
    pub fn insert(&mut self, file: impl Into<String>, sheet: impl Into<String>, table: Table) {
        self.workbooks
            .entry(file.into())
            .or_default()
            .insert(sheet.into(), table);
    }

    pub fn sheet(&self, file: &str, sheet: &str) -> Result<&Table> {
        let workbook = self
            .workbooks
            .get(file)
            .ok_or_else(|| TemplateError::WorkbookNotFound(file.to_string()))?;
        workbook
            .get(sheet)
            .ok_or_else(|| TemplateError::SheetNotFound {
                file: file.to_string(),
                sheet: sheet.to_string(),
            })
    }
}
