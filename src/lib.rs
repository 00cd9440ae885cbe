//! Climate Scenario - deterministic projection engine for climate-policy planning
//!
//! This library provides:
//! - Per-line, per-year growth-rate and value projections under policy levers
//! - A static dataset model (lines, levers, effect tables) with CSV loading
//! - Batch scenario sweeps over lever combinations
//! - Spreadsheet-style formula export with a matching evaluator for audits

pub mod dataset;
pub mod projection;
pub mod scenario;
pub mod workbook;

// Re-export commonly used types
pub use dataset::{Dataset, DatasetError, EffectTable, Lever, LeverKind, LeverLevel, Line};
pub use projection::{Horizon, LeverSettings, ProjectedRow, ProjectionEngine, ProjectionResult};
pub use scenario::ScenarioRunner;
pub use workbook::{export_formulas, Cell, Sheet, Workbook};
