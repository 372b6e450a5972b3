//! Tabular storage contract and the in-memory workbook that implements it.
//!
//! The codec only talks to storage through [`WorkbookWriter`] and
//! [`WorkbookReader`]. Formatting state (column styles, date format,
//! read-only locks) is passed explicitly with each call rather than held on
//! a shared workbook object.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};

use crate::cell::{CellType, CellValue};

/// Default per-column presentation handed to the storage engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnStyle {
    pub cell_type: CellType,
    pub read_only: bool,
    /// Display format for date cells, e.g. `dd/mm/yyyy`.
    pub date_format: Option<String>,
}

pub trait WorkbookWriter {
    /// Creates a sheet and returns its index.
    fn create_sheet(&mut self, name: &str) -> Result<usize>;
    fn write_cell(&mut self, sheet: usize, row: usize, column: usize, value: CellValue)
    -> Result<()>;
    fn set_column_style(&mut self, sheet: usize, column: usize, style: &ColumnStyle)
    -> Result<()>;
    fn autosize_column(&mut self, sheet: usize, column: usize) -> Result<()>;
}

pub trait WorkbookReader {
    fn sheet_count(&self) -> usize;
    /// Index of the last populated row, `None` for an empty sheet.
    fn last_row_index(&self, sheet: usize) -> Option<usize>;
    fn row_exists(&self, sheet: usize, row: usize) -> bool;
    fn cell(&self, sheet: usize, row: usize, column: usize) -> Option<&CellValue>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: BTreeMap<usize, CellValue>,
}

impl Row {
    pub fn cell(&self, column: usize) -> Option<&CellValue> {
        self.cells.get(&column)
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, &CellValue)> {
        self.cells.iter().map(|(idx, cell)| (*idx, cell))
    }

    /// Cells in column order with gaps filled by blanks.
    pub fn dense_cells(&self) -> Vec<CellValue> {
        let width = self.cells.keys().next_back().map_or(0, |last| last + 1);
        (0..width)
            .map(|idx| self.cells.get(&idx).cloned().unwrap_or_default())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    rows: BTreeMap<usize, Row>,
    styles: BTreeMap<usize, ColumnStyle>,
    widths: BTreeMap<usize, usize>,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: CellValue) {
        self.rows
            .entry(row)
            .or_default()
            .cells
            .insert(column, value);
    }

    /// Appends a row after the last populated one, one cell per value.
    pub fn push_row(&mut self, values: Vec<CellValue>) -> usize {
        let row = self.last_row_index().map_or(0, |last| last + 1);
        let entry = self.rows.entry(row).or_default();
        for (column, value) in values.into_iter().enumerate() {
            entry.cells.insert(column, value);
        }
        row
    }

    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(&row)
    }

    pub fn rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().map(|(idx, row)| (*idx, row))
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(&row).and_then(|r| r.cell(column))
    }

    pub fn last_row_index(&self) -> Option<usize> {
        self.rows.keys().next_back().copied()
    }

    /// Number of data rows below the header row.
    pub fn data_row_count(&self) -> usize {
        self.rows.keys().filter(|idx| **idx > 0).count()
    }

    pub fn column_style(&self, column: usize) -> Option<&ColumnStyle> {
        self.styles.get(&column)
    }

    pub fn column_width(&self, column: usize) -> Option<usize> {
        self.widths.get(&column).copied()
    }

    fn autosize(&mut self, column: usize) {
        let width = self
            .rows
            .values()
            .filter_map(|row| row.cell(column))
            .map(|cell| cell.as_text().chars().count())
            .max()
            .unwrap_or(0);
        self.widths.insert(column, width.max(1));
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    pub fn push_sheet(&mut self, sheet: Sheet) -> usize {
        self.sheets.push(sheet);
        self.sheets.len() - 1
    }

    fn sheet_or_err(&mut self, index: usize) -> Result<&mut Sheet> {
        let count = self.sheets.len();
        self.sheets
            .get_mut(index)
            .ok_or_else(|| anyhow!("Sheet {index} does not exist (workbook has {count})"))
    }
}

impl WorkbookWriter for Workbook {
    fn create_sheet(&mut self, name: &str) -> Result<usize> {
        Ok(self.push_sheet(Sheet::new(name)))
    }

    fn write_cell(
        &mut self,
        sheet: usize,
        row: usize,
        column: usize,
        value: CellValue,
    ) -> Result<()> {
        self.sheet_or_err(sheet)?.set_cell(row, column, value);
        Ok(())
    }

    fn set_column_style(
        &mut self,
        sheet: usize,
        column: usize,
        style: &ColumnStyle,
    ) -> Result<()> {
        self.sheet_or_err(sheet)?
            .styles
            .insert(column, style.clone());
        Ok(())
    }

    fn autosize_column(&mut self, sheet: usize, column: usize) -> Result<()> {
        self.sheet_or_err(sheet)?.autosize(column);
        Ok(())
    }
}

impl WorkbookReader for Workbook {
    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn last_row_index(&self, sheet: usize) -> Option<usize> {
        self.sheet(sheet).and_then(Sheet::last_row_index)
    }

    fn row_exists(&self, sheet: usize, row: usize) -> bool {
        self.sheet(sheet).is_some_and(|s| s.row(row).is_some())
    }

    fn cell(&self, sheet: usize, row: usize, column: usize) -> Option<&CellValue> {
        self.sheet(sheet).and_then(|s| s.cell(row, column))
    }
}
