//! Audit the formula export against the engine's direct output
//!
//! Exports the workbook for the given lever settings, evaluates every
//! value/rate/total cell through the formula evaluator, and diffs the
//! numbers against `ProjectionEngine::project`. Any non-zero difference is
//! a round-trip violation.
//!
//! Usage: verify_workbook [ID=LEVEL]...

use anyhow::{bail, Result};
use climate_scenario::{
    workbook::{export_formulas_with_layout, SheetEvaluator, SCENARIO_SHEET},
    Horizon, LeverLevel, LeverSettings, ScenarioRunner,
};

fn main() -> Result<()> {
    env_logger::init();

    let runner = ScenarioRunner::new();
    let mut settings = LeverSettings::defaults_for(runner.dataset());
    for spec in std::env::args().skip(1) {
        let Some((id, level)) = spec.split_once('=') else {
            bail!("expected ID=LEVEL, got '{}'", spec);
        };
        let level: LeverLevel = level.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        settings.set(id, level);
    }

    let direct = runner.run(&settings, Horizon::Far);
    let (workbook, layout) = export_formulas_with_layout(runner.dataset(), &settings);
    let sheet = workbook.sheet(SCENARIO_SHEET).expect("scenario sheet");
    let mut eval = SheetEvaluator::new(sheet);

    println!("Workbook vs engine (levers: {:?})",
        settings.iter().map(|(id, l)| format!("{}={}", id, l)).collect::<Vec<_>>());
    println!("{:<28} {:>6} {:>14} {:>14} {:>12}", "Line", "Year", "Engine", "Workbook", "Diff");

    let mut max_diff = 0.0f64;
    let mut mismatches = 0u32;

    for row in &direct.rows {
        let value_row = layout.value_rows[&row.line_id];
        for year in direct.years() {
            let col = layout.year_cols[&year];
            let engine_value = row.value(year).unwrap_or(0.0);
            let workbook_value = eval.value(value_row, col);
            let diff = workbook_value - engine_value;

            if diff != 0.0 {
                mismatches += 1;
            }
            max_diff = max_diff.max(diff.abs());

            println!(
                "{:<28} {:>6} {:>14.8} {:>14.8} {:>12.3e}",
                row.line_name, year, engine_value, workbook_value, diff
            );
        }
    }

    println!("\nTotals row:");
    for year in direct.years() {
        let col = layout.year_cols[&year];
        let engine_total = direct.total(year).unwrap_or(0.0);
        let workbook_total = eval.value(layout.totals_row, col);
        let diff = workbook_total - engine_total;
        if diff != 0.0 {
            mismatches += 1;
        }
        max_diff = max_diff.max(diff.abs());
        println!(
            "  {:>6} {:>14.8} {:>14.8} {:>12.3e}",
            year, engine_total, workbook_total, diff
        );
    }

    println!("\nMax |diff|: {:.3e}, mismatched cells: {}", max_diff, mismatches);
    if mismatches > 0 {
        bail!("round-trip violated in {} cells", mismatches);
    }
    println!("Round trip holds: workbook reproduces the engine exactly.");
    Ok(())
}
