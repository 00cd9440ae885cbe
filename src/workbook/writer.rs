//! CSV serialization for exported sheets
//!
//! Formulas are written as their `=`-prefixed source text so the artifact
//! stays auditable in any spreadsheet tool; numbers use Rust's default
//! float formatting, which round-trips.

use super::sheet::{Cell, Sheet};
use log::info;
use std::path::Path;

/// Write a sheet to a CSV file, one record per row
pub fn write_sheet_csv(sheet: &Sheet, path: &Path) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;

    for row in 1..=sheet.n_rows() {
        let record: Vec<String> = (1..=sheet.n_cols())
            .map(|col| match sheet.get(row, col) {
                Cell::Empty => String::new(),
                Cell::Number(n) => format!("{}", n),
                Cell::Text(text) => text.clone(),
                Cell::Formula(source) => format!("={}", source),
            })
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;

    info!(
        "wrote sheet '{}' ({} rows) to {}",
        sheet.name,
        sheet.n_rows(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_back() {
        let mut sheet = Sheet::new("Test");
        sheet.set_text(1, 1, "Label");
        sheet.set_number(1, 2, 9.91);
        sheet.set_formula(2, 2, "B1*(1+2/100)");

        let path = std::env::temp_dir().join("climate_scenario_writer_test.csv");
        write_sheet_csv(&sheet, &path).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Label");
        assert_eq!(&rows[0][1], "9.91");
        assert_eq!(&rows[1][1], "=B1*(1+2/100)");
    }
}
