//! Formula export: rebuild the projection as an auditable formula workbook
//!
//! The sheet stacks five blocks over the same year columns:
//! 1. baseline growth rates (static numbers)
//! 2. one impact table per lever (static numbers for its current level,
//!    zeroed before the activation year and at the anchor year)
//! 3. net effective rates (formulas: baseline cell + every impact cell)
//! 4. projected values (anchor column static, later columns compound the
//!    previous year's cell by the net-rate cell)
//! 5. a totals row of SUM ranges over the value columns
//!
//! Evaluating the sheet cell by cell reproduces `ProjectionEngine::project`
//! exactly: the formulas perform the same operations in the same order.

use crate::dataset::{Dataset, Lever};
use crate::projection::LeverSettings;
use super::sheet::{cell_ref, Sheet, Workbook};
use std::collections::BTreeMap;

/// Sheet name used by the exporter
pub const SCENARIO_SHEET: &str = "Scenario";

/// Positions of the engine-relevant cells in the exported sheet
#[derive(Debug, Clone, Default)]
pub struct ExportLayout {
    /// Column per projected year
    pub year_cols: BTreeMap<u32, u32>,

    /// Net-effective-rate row per line id
    pub rate_rows: BTreeMap<String, u32>,

    /// Projected-value row per line id
    pub value_rows: BTreeMap<String, u32>,

    /// Row of the totals SUM formulas
    pub totals_row: u32,
}

/// Export the projection under `settings` as a formula workbook
pub fn export_formulas(dataset: &Dataset, settings: &LeverSettings) -> Workbook {
    export_formulas_with_layout(dataset, settings).0
}

/// Export variant that also returns the cell layout, for audits and tests
pub fn export_formulas_with_layout(
    dataset: &Dataset,
    settings: &LeverSettings,
) -> (Workbook, ExportLayout) {
    let mut sheet = Sheet::new(SCENARIO_SHEET);
    let mut layout = ExportLayout::default();

    let anchor = dataset.anchor_year;
    let years: Vec<u32> = (anchor..=dataset.max_year()).collect();
    for (i, &year) in years.iter().enumerate() {
        layout.year_cols.insert(year, 2 + i as u32);
    }

    let mut row = 1;

    // Block 1: baseline growth rates
    write_year_header(&mut sheet, row, "Baseline growth (%)", &years);
    row += 1;
    let baseline_rows: BTreeMap<&str, u32> = dataset
        .lines
        .iter()
        .map(|line| {
            sheet.set_text(row, 1, &line.name);
            for &col in layout.year_cols.values() {
                sheet.set_number(row, col, line.baseline_rate);
            }
            let r = row;
            row += 1;
            (line.id.as_str(), r)
        })
        .collect();
    row += 1;

    // Block 2: one impact table per lever at its current level
    let mut impact_rows: Vec<BTreeMap<&str, u32>> = Vec::new();
    for lever in &dataset.levers {
        let level = settings.level_for(lever);
        let header = format!("Impact (pp): {} = {}", lever.name, level.label());
        write_year_header(&mut sheet, row, &header, &years);
        row += 1;

        let mut rows_for_lever = BTreeMap::new();
        for line in &dataset.lines {
            sheet.set_text(row, 1, &line.name);
            for (&year, &col) in &layout.year_cols {
                let effect = impact_at(lever, settings, &line.id, year, anchor);
                sheet.set_number(row, col, effect);
            }
            rows_for_lever.insert(line.id.as_str(), row);
            row += 1;
        }
        impact_rows.push(rows_for_lever);
        row += 1;
    }

    // Block 3: net effective rates as sums of the cells above
    write_year_header(&mut sheet, row, "Net effective rate (%)", &years);
    row += 1;
    for line in &dataset.lines {
        sheet.set_text(row, 1, &line.name);
        for &col in layout.year_cols.values() {
            let mut formula = cell_ref(baseline_rows[line.id.as_str()], col);
            for rows_for_lever in &impact_rows {
                formula.push('+');
                formula.push_str(&cell_ref(rows_for_lever[line.id.as_str()], col));
            }
            sheet.set_formula(row, col, &formula);
        }
        layout.rate_rows.insert(line.id.clone(), row);
        row += 1;
    }
    row += 1;

    // Block 4: projected values, compounding left to right
    write_year_header(&mut sheet, row, "Projected value", &years);
    row += 1;
    for line in &dataset.lines {
        sheet.set_text(row, 1, &line.name);
        for (&year, &col) in &layout.year_cols {
            if year == anchor {
                sheet.set_number(row, col, line.baseline_value);
            } else {
                let prev = cell_ref(row, col - 1);
                let rate = cell_ref(layout.rate_rows[&line.id], col);
                sheet.set_formula(row, col, &format!("{}*(1+{}/100)", prev, rate));
            }
        }
        layout.value_rows.insert(line.id.clone(), row);
        row += 1;
    }

    // Block 5: totals row over the value block
    sheet.set_text(row, 1, "Total");
    if let (Some(&first), Some(&last)) = (
        layout.value_rows.values().min(),
        layout.value_rows.values().max(),
    ) {
        for &col in layout.year_cols.values() {
            let range = format!("{}:{}", cell_ref(first, col), cell_ref(last, col));
            sheet.set_formula(row, col, &format!("SUM({})", range));
        }
    }
    layout.totals_row = row;

    let mut workbook = Workbook::new();
    workbook.add_sheet(sheet);
    (workbook, layout)
}

/// Impact of one lever on one line in one year, as exported
///
/// Zero at the anchor year (never adjusted) and before activation; the
/// effect-table entry for the current level otherwise.
fn impact_at(
    lever: &Lever,
    settings: &LeverSettings,
    line_id: &str,
    year: u32,
    anchor: u32,
) -> f64 {
    if year == anchor {
        0.0
    } else {
        lever.effect_on(settings.level_for(lever), line_id, year)
    }
}

fn write_year_header(sheet: &mut Sheet, row: u32, title: &str, years: &[u32]) {
    sheet.set_text(row, 1, title);
    for (i, &year) in years.iter().enumerate() {
        sheet.set_number(row, 2 + i as u32, year as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LeverLevel;
    use crate::workbook::sheet::Cell;

    #[test]
    fn test_layout_covers_all_lines_and_years() {
        let dataset = Dataset::reference();
        let (workbook, layout) = export_formulas_with_layout(&dataset, &LeverSettings::new());
        let sheet = workbook.sheet(SCENARIO_SHEET).unwrap();

        assert_eq!(layout.year_cols.len(), 12);
        assert_eq!(layout.rate_rows.len(), dataset.lines.len());
        assert_eq!(layout.value_rows.len(), dataset.lines.len());
        assert!(layout.totals_row > 0);
        assert!(sheet.n_rows() >= layout.totals_row);
    }

    #[test]
    fn test_anchor_value_cells_are_static_baselines() {
        let dataset = Dataset::reference();
        let (workbook, layout) = export_formulas_with_layout(&dataset, &LeverSettings::new());
        let sheet = workbook.sheet(SCENARIO_SHEET).unwrap();
        let anchor_col = layout.year_cols[&dataset.anchor_year];

        for line in &dataset.lines {
            let row = layout.value_rows[&line.id];
            assert_eq!(sheet.get(row, anchor_col), &Cell::Number(line.baseline_value));

            // Every later cell compounds the previous one
            let next_col = anchor_col + 1;
            match sheet.get(row, next_col) {
                Cell::Formula(src) => assert!(src.contains("*(1+") && src.contains("/100)")),
                other => panic!("expected compounding formula, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_impact_cells_respect_activation_and_anchor() {
        let dataset = Dataset::reference();
        let settings = LeverSettings::new().with("green-subsidies", LeverLevel::VeryHigh);
        let (workbook, layout) = export_formulas_with_layout(&dataset, &settings);
        let sheet = workbook.sheet(SCENARIO_SHEET).unwrap();

        // Locate the green-subsidies impact row for engineering by scanning
        // for its header, then the line row beneath it.
        let header_row = (1..=sheet.n_rows())
            .find(|&r| matches!(sheet.get(r, 1), Cell::Text(t) if t.contains("Green investment subsidies")))
            .expect("impact block header");
        let line_row = (header_row + 1..=sheet.n_rows())
            .find(|&r| matches!(sheet.get(r, 1), Cell::Text(t) if t == "Decarbonization Engineering"))
            .expect("engineering impact row");

        // Inactive before 2027, zero at the anchor year, full effect after
        assert_eq!(sheet.get(line_row, layout.year_cols[&2025]), &Cell::Number(0.0));
        assert_eq!(sheet.get(line_row, layout.year_cols[&2026]), &Cell::Number(0.0));
        assert_eq!(sheet.get(line_row, layout.year_cols[&2027]), &Cell::Number(4.9));
        assert_eq!(sheet.get(line_row, layout.year_cols[&2036]), &Cell::Number(4.9));
    }

    #[test]
    fn test_totals_row_sums_value_block() {
        let dataset = Dataset::reference();
        let (workbook, layout) = export_formulas_with_layout(&dataset, &LeverSettings::new());
        let sheet = workbook.sheet(SCENARIO_SHEET).unwrap();

        let col = layout.year_cols[&dataset.anchor_year];
        match sheet.get(layout.totals_row, col) {
            Cell::Formula(src) => assert!(src.starts_with("SUM(") && src.contains(':')),
            other => panic!("expected SUM formula, got {:?}", other),
        }
    }
}
