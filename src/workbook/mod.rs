//! Spreadsheet-style workbook model, formula export, and evaluation
//!
//! The exporter mirrors the projection engine's arithmetic as composable
//! cell formulas so a reviewer can audit the computation cell by cell; the
//! evaluator closes the loop by reproducing the engine's numbers from the
//! formula graph.

mod eval;
mod export;
mod sheet;
mod writer;

pub use eval::SheetEvaluator;
pub use export::{export_formulas, export_formulas_with_layout, ExportLayout, SCENARIO_SHEET};
pub use sheet::{cell_ref, column_letter, parse_cell_ref, Cell, Sheet, Workbook};
pub use writer::write_sheet_csv;
