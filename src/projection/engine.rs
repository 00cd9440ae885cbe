//! Core projection engine: sequential year-by-year compounding per line
//!
//! The engine is a pure function of (dataset, lever settings, end year).
//! It performs no I/O, uses no randomness, and recomputes the full series
//! from scratch on every call; at this scale (lines x years x levers, all
//! small and fixed) there is no need for incremental updates or caching.

use crate::dataset::{Dataset, Lever, LeverLevel, Line};
use super::series::{ProjectedRow, ProjectionResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mapping of lever id to selected level
///
/// Missing ids resolve to the lowest level; unknown ids are carried but
/// ignored by the engine. Use [`defaults_for`](Self::defaults_for) to seed
/// the per-lever default positions a fresh session starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeverSettings {
    levels: BTreeMap<String, LeverLevel>,
}

impl LeverSettings {
    /// Empty settings: every lever reads as its lowest level
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings seeded with each lever's configured default position
    pub fn defaults_for(dataset: &Dataset) -> Self {
        let levels = dataset
            .levers
            .iter()
            .map(|lever| (lever.id.clone(), lever.default_level))
            .collect();
        Self { levels }
    }

    pub fn set(&mut self, lever_id: &str, level: LeverLevel) {
        self.levels.insert(lever_id.to_string(), level);
    }

    /// Builder-style variant of [`set`](Self::set)
    pub fn with(mut self, lever_id: &str, level: LeverLevel) -> Self {
        self.set(lever_id, level);
        self
    }

    /// Resolved level for a lever: the explicit setting, or the lowest level
    /// when absent
    pub fn level_for(&self, lever: &Lever) -> LeverLevel {
        self.levels
            .get(&lever.id)
            .copied()
            .unwrap_or(LeverLevel::VeryLow)
    }

    /// Explicit entries, in lever-id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, LeverLevel)> {
        self.levels.iter().map(|(id, level)| (id.as_str(), *level))
    }
}

/// One of the two sanctioned projection horizons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Horizon {
    /// Anchor year + 6
    Near,
    /// Anchor year + 11 (the full horizon)
    Far,
}

impl Horizon {
    /// Years past the anchor this horizon covers
    pub fn span(self) -> u32 {
        match self {
            Horizon::Near => 6,
            Horizon::Far => 11,
        }
    }

    /// Last projected year for a dataset anchored at `anchor_year`
    pub fn end_year(self, anchor_year: u32) -> u32 {
        anchor_year + self.span()
    }
}

/// Main projection engine
///
/// Owns its dataset; [`crate::ScenarioRunner`] clones the shared dataset per
/// run, which is cheap relative to the projection itself.
pub struct ProjectionEngine {
    dataset: Dataset,
}

impl ProjectionEngine {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Project every line from the anchor year through `end_year` (inclusive)
    ///
    /// Total over its inputs: `end_year` below the anchor clamps to the
    /// anchor, so the result always contains at least the anchor column.
    /// Identical inputs produce identical output.
    pub fn project(&self, settings: &LeverSettings, end_year: u32) -> ProjectionResult {
        let anchor = self.dataset.anchor_year;
        let last = end_year.max(anchor);
        debug!("projecting {} lines, {}..={}", self.dataset.lines.len(), anchor, last);

        let mut result = ProjectionResult::new(anchor, last);

        for line in &self.dataset.lines {
            let mut row = ProjectedRow::new(&line.id, &line.name);
            let mut value = line.baseline_value;

            for year in anchor..=last {
                // The anchor year is never adjusted: its value is the
                // baseline and its reported rate is the baseline rate, even
                // when a lever activates at the anchor year.
                let rate = if year == anchor {
                    line.baseline_rate
                } else {
                    self.effective_rate(settings, line, year)
                };

                if year > anchor {
                    value *= 1.0 + rate / 100.0;
                }

                row.rates.insert(year, rate);
                row.values.insert(year, value);
                *result.totals_by_year.entry(year).or_insert(0.0) += value;
            }

            result.rows.push(row);
        }

        result
    }

    /// Project to one of the sanctioned horizons
    pub fn project_horizon(&self, settings: &LeverSettings, horizon: Horizon) -> ProjectionResult {
        self.project(settings, horizon.end_year(self.dataset.anchor_year))
    }

    /// Effective growth rate for a line in a given year: baseline rate plus
    /// the sum of every active lever's effect at its current level
    ///
    /// Effects are purely additive; no lever scales or caps another.
    pub fn effective_rate(&self, settings: &LeverSettings, line: &Line, year: u32) -> f64 {
        let mut rate = line.baseline_rate;
        for lever in &self.dataset.levers {
            rate += lever.effect_on(settings.level_for(lever), &line.id, year);
        }
        rate
    }
}
