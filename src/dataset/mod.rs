//! Static scenario configuration: lines, levers, and effect tables

mod lever;
mod line;
pub mod loader;
mod reference;

pub use lever::{EffectTable, LevelDefinition, Lever, LeverKind, LeverLevel};
pub use line::Line;
pub use loader::DatasetError;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of projected years in the full horizon (anchor year included)
pub const PROJECTION_YEARS: u32 = 12;

/// Complete scenario dataset: the fixed sets of lines and levers
///
/// Loaded once per session (built-in reference data or CSV files) and never
/// mutated by a projection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// First projected year; every line's value at this year is its baseline
    pub anchor_year: u32,
    pub lines: Vec<Line>,
    pub levers: Vec<Lever>,
}

impl Dataset {
    /// Built-in reference dataset matching the planning workbook
    pub fn reference() -> Self {
        reference::reference_dataset()
    }

    /// Load a dataset from CSV files in the default location (data/dataset/)
    pub fn from_csv() -> Result<Self, DatasetError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_DATASET_PATH))
    }

    /// Load a dataset from CSV files in the given directory
    pub fn from_csv_path(path: &Path) -> Result<Self, DatasetError> {
        loader::load_dataset(path)
    }

    /// Last year of the full projection horizon (inclusive)
    pub fn max_year(&self) -> u32 {
        self.anchor_year + PROJECTION_YEARS - 1
    }

    /// Look up a line by its stable id
    pub fn line(&self, id: &str) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Look up a lever by its stable id
    pub fn lever(&self, id: &str) -> Option<&Lever> {
        self.levers.iter().find(|l| l.id == id)
    }
}
