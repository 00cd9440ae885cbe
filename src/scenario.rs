//! Scenario runner for efficient repeated projections
//!
//! Loads the dataset once, then allows running many projections with
//! different lever settings without re-reading configuration files.

use crate::dataset::{Dataset, DatasetError};
use crate::projection::{Horizon, LeverSettings, ProjectionEngine, ProjectionResult};
use crate::workbook::{export_formulas, Workbook};
use rayon::prelude::*;
use std::path::Path;

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let settings = LeverSettings::defaults_for(runner.dataset())
///     .with("carbon-price", LeverLevel::High);
/// let result = runner.run(&settings, Horizon::Far);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    dataset: Dataset,
}

impl ScenarioRunner {
    /// Create a runner with the built-in reference dataset
    pub fn new() -> Self {
        Self {
            dataset: Dataset::reference(),
        }
    }

    /// Create a runner by loading a dataset from the default CSV location
    pub fn from_csv() -> Result<Self, DatasetError> {
        Ok(Self {
            dataset: Dataset::from_csv()?,
        })
    }

    /// Create a runner by loading a dataset from CSV files
    pub fn from_csv_path(path: &Path) -> Result<Self, DatasetError> {
        Ok(Self {
            dataset: Dataset::from_csv_path(path)?,
        })
    }

    /// Create a runner with a pre-built dataset
    pub fn with_dataset(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Get a reference to the dataset for inspection
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Run a single projection to one of the sanctioned horizons
    /// Clones the dataset internally (cheap relative to the projection)
    pub fn run(&self, settings: &LeverSettings, horizon: Horizon) -> ProjectionResult {
        let engine = ProjectionEngine::new(self.dataset.clone());
        engine.project_horizon(settings, horizon)
    }

    /// Run a single projection to an explicit end year
    pub fn run_to_year(&self, settings: &LeverSettings, end_year: u32) -> ProjectionResult {
        let engine = ProjectionEngine::new(self.dataset.clone());
        engine.project(settings, end_year)
    }

    /// Run many settings combinations in parallel (sensitivity sweeps)
    pub fn run_scenarios(
        &self,
        settings_list: &[LeverSettings],
        horizon: Horizon,
    ) -> Vec<ProjectionResult> {
        settings_list
            .par_iter()
            .map(|settings| {
                let engine = ProjectionEngine::new(self.dataset.clone());
                engine.project_horizon(settings, horizon)
            })
            .collect()
    }

    /// Export the projection under `settings` as a formula workbook
    pub fn export(&self, settings: &LeverSettings) -> Workbook {
        export_formulas(&self.dataset, settings)
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LeverLevel;
    use crate::workbook::{export_formulas_with_layout, SheetEvaluator, SCENARIO_SHEET};

    #[test]
    fn test_run_scenarios_batch() {
        let runner = ScenarioRunner::new();

        let settings_list: Vec<_> = [LeverLevel::VeryLow, LeverLevel::Medium, LeverLevel::VeryHigh]
            .iter()
            .map(|&level| LeverSettings::new().with("carbon-price", level))
            .collect();

        let results = runner.run_scenarios(&settings_list, Horizon::Far);
        assert_eq!(results.len(), 3);

        // A higher carbon price means a higher final total
        let finals: Vec<f64> = results.iter().map(|r| r.summary().final_total).collect();
        assert!(finals[1] > finals[0]);
        assert!(finals[2] > finals[1]);
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let runner = ScenarioRunner::new();
        let settings_list = vec![
            LeverSettings::new(),
            LeverSettings::new().with("regulatory-rollback", LeverLevel::VeryHigh),
        ];

        let batch = runner.run_scenarios(&settings_list, Horizon::Near);
        for (settings, from_batch) in settings_list.iter().zip(&batch) {
            assert_eq!(&runner.run(settings, Horizon::Near), from_batch);
        }
    }

    #[test]
    fn test_workbook_round_trips_against_engine() {
        // Evaluating the exported formula graph cell by cell must reproduce
        // the engine's numbers exactly, including the totals row.
        let runner = ScenarioRunner::new();
        let settings = LeverSettings::defaults_for(runner.dataset())
            .with("carbon-price", LeverLevel::High)
            .with("green-subsidies", LeverLevel::Low)
            .with("regulatory-rollback", LeverLevel::Medium);

        let direct = runner.run(&settings, Horizon::Far);
        let (workbook, layout) = export_formulas_with_layout(runner.dataset(), &settings);
        let sheet = workbook.sheet(SCENARIO_SHEET).unwrap();
        let mut eval = SheetEvaluator::new(sheet);

        for row in &direct.rows {
            let value_row = layout.value_rows[&row.line_id];
            let rate_row = layout.rate_rows[&row.line_id];
            for year in direct.years() {
                let col = layout.year_cols[&year];
                assert_eq!(
                    eval.value(value_row, col),
                    row.value(year).unwrap(),
                    "value mismatch for {} in {}",
                    row.line_id,
                    year
                );
                assert_eq!(
                    eval.value(rate_row, col),
                    row.rate(year).unwrap(),
                    "rate mismatch for {} in {}",
                    row.line_id,
                    year
                );
            }
        }

        for year in direct.years() {
            let col = layout.year_cols[&year];
            assert_eq!(eval.value(layout.totals_row, col), direct.total(year).unwrap());
        }
    }

    #[test]
    fn test_round_trip_holds_for_all_single_lever_extremes() {
        let runner = ScenarioRunner::new();
        let lever_ids: Vec<String> =
            runner.dataset().levers.iter().map(|l| l.id.clone()).collect();

        for lever_id in &lever_ids {
            let settings = LeverSettings::new().with(lever_id, LeverLevel::VeryHigh);
            let direct = runner.run(&settings, Horizon::Far);

            let (workbook, layout) = export_formulas_with_layout(runner.dataset(), &settings);
            let sheet = workbook.sheet(SCENARIO_SHEET).unwrap();
            let mut eval = SheetEvaluator::new(sheet);

            for row in &direct.rows {
                let value_row = layout.value_rows[&row.line_id];
                for year in direct.years() {
                    let col = layout.year_cols[&year];
                    assert_eq!(
                        eval.value(value_row, col),
                        row.value(year).unwrap(),
                        "lever {} at VeryHigh: {} in {}",
                        lever_id,
                        row.line_id,
                        year
                    );
                }
            }
        }
    }
}
