//! Service line definitions

use serde::{Deserialize, Serialize};

/// A projected service line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// Stable key used in effect tables and projection output
    pub id: String,

    /// Display name
    pub name: String,

    /// Value at the anchor year (non-negative)
    pub baseline_value: f64,

    /// Baseline annual growth rate in percent (may be negative)
    pub baseline_rate: f64,
}

impl Line {
    pub fn new(id: &str, name: &str, baseline_value: f64, baseline_rate: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            baseline_value,
            baseline_rate,
        }
    }
}
