//! In-memory sheet model with A1-style cell addressing
//!
//! Rows and columns are 1-indexed throughout, matching spreadsheet
//! conventions: cell (1, 1) is A1.

use std::collections::BTreeMap;

/// A single cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    /// Formula source without the leading `=`
    Formula(String),
}

/// A sparse grid of cells
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    cells: BTreeMap<(u32, u32), Cell>,
    n_rows: u32,
    n_cols: u32,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn set(&mut self, row: u32, col: u32, cell: Cell) {
        debug_assert!(row >= 1 && col >= 1, "cells are 1-indexed");
        self.n_rows = self.n_rows.max(row);
        self.n_cols = self.n_cols.max(col);
        self.cells.insert((row, col), cell);
    }

    pub fn set_number(&mut self, row: u32, col: u32, value: f64) {
        self.set(row, col, Cell::Number(value));
    }

    pub fn set_text(&mut self, row: u32, col: u32, text: &str) {
        self.set(row, col, Cell::Text(text.to_string()));
    }

    pub fn set_formula(&mut self, row: u32, col: u32, source: &str) {
        self.set(row, col, Cell::Formula(source.to_string()));
    }

    /// Cell at (row, col); unset positions read as `Empty`
    pub fn get(&self, row: u32, col: u32) -> &Cell {
        self.cells.get(&(row, col)).unwrap_or(&Cell::Empty)
    }

    pub fn n_rows(&self) -> u32 {
        self.n_rows
    }

    pub fn n_cols(&self) -> u32 {
        self.n_cols
    }
}

/// A document of one or more sheets
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Spreadsheet column letters for a 1-indexed column: 1 -> A, 26 -> Z, 27 -> AA
pub fn column_letter(col: u32) -> String {
    debug_assert!(col >= 1);
    let mut letters = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A1-style reference for a 1-indexed (row, col) position
pub fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", column_letter(col), row)
}

/// Parse an A1-style reference back to (row, col); `None` if malformed
pub fn parse_cell_ref(s: &str) -> Option<(u32, u32)> {
    let letters: String = s.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let digits = &s[letters.len()..];
    if letters.is_empty() || digits.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        let v = (c.to_ascii_uppercase() as u32).checked_sub('A' as u32)? + 1;
        col = col.checked_mul(26)?.checked_add(v)?;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row, col))
}
