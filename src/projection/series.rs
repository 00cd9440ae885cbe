//! Projection output structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-year growth-rate and value series for a single line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedRow {
    pub line_id: String,
    pub line_name: String,

    /// Effective growth rate in percent, keyed by year; the anchor year
    /// carries the plain baseline rate
    pub rates: BTreeMap<u32, f64>,

    /// Compounded value keyed by year; the anchor year carries the baseline
    /// value exactly
    pub values: BTreeMap<u32, f64>,
}

impl ProjectedRow {
    pub fn new(line_id: &str, line_name: &str) -> Self {
        Self {
            line_id: line_id.to_string(),
            line_name: line_name.to_string(),
            rates: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }

    pub fn rate(&self, year: u32) -> Option<f64> {
        self.rates.get(&year).copied()
    }

    pub fn value(&self, year: u32) -> Option<f64> {
        self.values.get(&year).copied()
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub anchor_year: u32,

    /// Last projected year (inclusive); never below the anchor year
    pub end_year: u32,

    /// One row per line, in dataset order
    pub rows: Vec<ProjectedRow>,

    /// Sum of all lines' values per year
    pub totals_by_year: BTreeMap<u32, f64>,
}

impl ProjectionResult {
    pub fn new(anchor_year: u32, end_year: u32) -> Self {
        Self {
            anchor_year,
            end_year,
            rows: Vec::new(),
            totals_by_year: BTreeMap::new(),
        }
    }

    /// Projected years in ascending order
    pub fn years(&self) -> impl Iterator<Item = u32> + '_ {
        self.anchor_year..=self.end_year
    }

    /// Row for a given line id
    pub fn row(&self, line_id: &str) -> Option<&ProjectedRow> {
        self.rows.iter().find(|r| r.line_id == line_id)
    }

    /// Aggregate total for a year
    pub fn total(&self, year: u32) -> Option<f64> {
        self.totals_by_year.get(&year).copied()
    }

    /// Summary statistics across the horizon
    pub fn summary(&self) -> ProjectionSummary {
        let anchor_total = self.total(self.anchor_year).unwrap_or(0.0);
        let final_total = self.total(self.end_year).unwrap_or(0.0);
        let total_growth_pct = if anchor_total != 0.0 {
            (final_total / anchor_total - 1.0) * 100.0
        } else {
            0.0
        };

        ProjectionSummary {
            years: self.end_year - self.anchor_year + 1,
            anchor_total,
            final_total,
            total_growth_pct,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub anchor_total: f64,
    pub final_total: f64,
    pub total_growth_pct: f64,
}
