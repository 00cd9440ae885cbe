//! CSV-based dataset loader
//!
//! Loads a scenario dataset from a directory of CSV files:
//! - `dataset.csv`: single row with the anchor year
//! - `lines.csv`: id, name, baseline_value, baseline_rate
//! - `levers.csv`: id, name, activation_year, default_level
//! - `effects.csv`: lever_id, line_id, then one effect column per level
//! - `level_definitions.csv` (optional): lever_id, level, label, description;
//!   a lever with a complete set of rows here becomes a leveled lever

use super::lever::{EffectTable, LevelDefinition, Lever, LeverKind, LeverLevel};
use super::line::Line;
use super::Dataset;
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default path to the dataset directory
pub const DEFAULT_DATASET_PATH: &str = "data/dataset";

/// Errors raised while loading a dataset from CSV
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{file}: {message}")]
    Invalid { file: &'static str, message: String },

    #[error("effects.csv references unknown line '{line}' for lever '{lever}'")]
    UnknownLine { lever: String, line: String },

    #[error("{file} references unknown lever '{lever}'")]
    UnknownLever { file: &'static str, lever: String },
}

fn invalid(file: &'static str, message: impl Into<String>) -> DatasetError {
    DatasetError::Invalid {
        file,
        message: message.into(),
    }
}

fn open(path: &Path, file: &str) -> Result<csv::Reader<std::fs::File>, DatasetError> {
    let full = path.join(file);
    let reader = std::fs::File::open(&full).map_err(|source| DatasetError::Io {
        path: full.clone(),
        source,
    })?;
    Ok(csv::Reader::from_reader(reader))
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    file: &'static str,
) -> Result<&'r str, DatasetError> {
    record
        .get(index)
        .ok_or_else(|| invalid(file, format!("missing column {} in row {:?}", index, record)))
}

fn parse_f64(s: &str, file: &'static str) -> Result<f64, DatasetError> {
    s.trim()
        .parse()
        .map_err(|_| invalid(file, format!("not a number: '{}'", s)))
}

/// Load the anchor year from dataset.csv
fn load_anchor_year(path: &Path) -> Result<u32, DatasetError> {
    const FILE: &str = "dataset.csv";
    let mut reader = open(path, FILE)?;

    for result in reader.records() {
        let record = result?;
        let year = field(&record, 0, FILE)?;
        return year
            .trim()
            .parse()
            .map_err(|_| invalid(FILE, format!("not a year: '{}'", year)));
    }
    Err(invalid(FILE, "no anchor year row"))
}

/// Load service lines from lines.csv
fn load_lines(path: &Path) -> Result<Vec<Line>, DatasetError> {
    const FILE: &str = "lines.csv";
    let mut reader = open(path, FILE)?;
    let mut lines = Vec::new();

    for result in reader.records() {
        let record = result?;
        let baseline_value = parse_f64(field(&record, 2, FILE)?, FILE)?;
        if baseline_value < 0.0 {
            return Err(invalid(
                FILE,
                format!("baseline value must be non-negative: {}", baseline_value),
            ));
        }
        lines.push(Line {
            id: field(&record, 0, FILE)?.to_string(),
            name: field(&record, 1, FILE)?.to_string(),
            baseline_value,
            baseline_rate: parse_f64(field(&record, 3, FILE)?, FILE)?,
        });
    }

    Ok(lines)
}

/// Load lever headers (without effects or level metadata) from levers.csv
fn load_levers(path: &Path) -> Result<Vec<Lever>, DatasetError> {
    const FILE: &str = "levers.csv";
    let mut reader = open(path, FILE)?;
    let mut levers = Vec::new();

    for result in reader.records() {
        let record = result?;
        let activation = field(&record, 2, FILE)?;
        let activation_year = activation
            .trim()
            .parse()
            .map_err(|_| invalid(FILE, format!("not a year: '{}'", activation)))?;
        let default_level = field(&record, 3, FILE)?
            .parse::<LeverLevel>()
            .map_err(|e| invalid(FILE, e))?;

        levers.push(Lever {
            id: field(&record, 0, FILE)?.to_string(),
            name: field(&record, 1, FILE)?.to_string(),
            activation_year,
            default_level,
            effects: EffectTable::new(),
            kind: LeverKind::Simple,
        });
    }

    Ok(levers)
}

/// Load effect rows into the levers' tables, validating referenced ids
fn load_effects(path: &Path, lines: &[Line], levers: &mut [Lever]) -> Result<(), DatasetError> {
    const FILE: &str = "effects.csv";
    let mut reader = open(path, FILE)?;

    for result in reader.records() {
        let record = result?;
        let lever_id = field(&record, 0, FILE)?.to_string();
        let line_id = field(&record, 1, FILE)?.to_string();

        if !lines.iter().any(|l| l.id == line_id) {
            return Err(DatasetError::UnknownLine {
                lever: lever_id,
                line: line_id,
            });
        }

        let mut per_level = [0.0; 5];
        for (i, slot) in per_level.iter_mut().enumerate() {
            *slot = parse_f64(field(&record, 2 + i, FILE)?, FILE)?;
        }

        let lever = levers
            .iter_mut()
            .find(|l| l.id == lever_id)
            .ok_or_else(|| DatasetError::UnknownLever {
                file: FILE,
                lever: lever_id.clone(),
            })?;
        lever.effects.set(&line_id, per_level);
    }

    Ok(())
}

/// Load optional level metadata; levers with a complete set of five rows
/// become leveled levers
fn load_level_definitions(path: &Path, levers: &mut [Lever]) -> Result<(), DatasetError> {
    const FILE: &str = "level_definitions.csv";
    if !path.join(FILE).exists() {
        return Ok(());
    }

    let mut reader = open(path, FILE)?;
    let mut by_lever: HashMap<String, Vec<(LeverLevel, LevelDefinition)>> = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let lever_id = field(&record, 0, FILE)?.to_string();
        let level = field(&record, 1, FILE)?
            .parse::<LeverLevel>()
            .map_err(|e| invalid(FILE, e))?;
        let definition = LevelDefinition {
            label: field(&record, 2, FILE)?.to_string(),
            description: field(&record, 3, FILE)?.to_string(),
        };
        by_lever.entry(lever_id).or_default().push((level, definition));
    }

    for (lever_id, mut definitions) in by_lever {
        let lever = levers
            .iter_mut()
            .find(|l| l.id == lever_id)
            .ok_or(DatasetError::UnknownLever {
                file: FILE,
                lever: lever_id.clone(),
            })?;

        definitions.sort_by_key(|(level, _)| level.index());
        if !definitions.iter().map(|(level, _)| level.index()).eq(0..5) {
            return Err(invalid(
                FILE,
                format!("lever '{}' must define each of the 5 levels exactly once", lever_id),
            ));
        }
        let levels: [LevelDefinition; 5] = definitions
            .into_iter()
            .map(|(_, definition)| definition)
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| invalid(FILE, format!("lever '{}' level set is incomplete", lever_id)))?;
        lever.kind = LeverKind::Leveled { levels };
    }

    Ok(())
}

/// Load a complete dataset from the given directory
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let anchor_year = load_anchor_year(path)?;
    let lines = load_lines(path)?;
    let mut levers = load_levers(path)?;
    load_effects(path, &lines, &mut levers)?;
    load_level_definitions(path, &mut levers)?;

    info!(
        "loaded dataset from {}: {} lines, {} levers, anchor {}",
        path.display(),
        lines.len(),
        levers.len(),
        anchor_year
    );

    Ok(Dataset {
        anchor_year,
        lines,
        levers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixture(dir: &Path) {
        fs::write(dir.join("dataset.csv"), "anchor_year\n2025\n").unwrap();
        fs::write(
            dir.join("lines.csv"),
            "id,name,baseline_value,baseline_rate\n\
             advisory,Climate Advisory,22.44,9.91\n\
             assurance,Sustainability Assurance,18.30,7.25\n",
        )
        .unwrap();
        fs::write(
            dir.join("levers.csv"),
            "id,name,activation_year,default_level\n\
             carbon-price,Carbon price trajectory,2025,very-low\n\
             client-demand,Corporate net-zero demand,2026,medium\n",
        )
        .unwrap();
        fs::write(
            dir.join("effects.csv"),
            "lever_id,line_id,very_low,low,medium,high,very_high\n\
             carbon-price,advisory,0.0,0.6,1.4,2.3,3.1\n\
             client-demand,advisory,0.0,0.6,1.1,1.8,2.6\n",
        )
        .unwrap();
        fs::write(
            dir.join("level_definitions.csv"),
            "lever_id,level,label,description\n\
             carbon-price,0,Stagnant,Carbon price stays low\n\
             carbon-price,1,Slow rise,Gradual climb\n\
             carbon-price,2,Steady rise,Linear path\n\
             carbon-price,3,Accelerated,Fast climb\n\
             carbon-price,4,Shock,Rapid repricing\n",
        )
        .unwrap();
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("climate_scenario_{}", name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_dataset_round_trip() {
        let dir = temp_dir("load_ok");
        write_fixture(&dir);

        let ds = load_dataset(&dir).unwrap();

        assert_eq!(ds.anchor_year, 2025);
        assert_eq!(ds.lines.len(), 2);
        assert_eq!(ds.levers.len(), 2);

        let carbon = ds.lever("carbon-price").unwrap();
        assert_eq!(carbon.effects.get(LeverLevel::High, "advisory"), 2.3);
        assert!(matches!(carbon.kind, LeverKind::Leveled { .. }));

        let demand = ds.lever("client-demand").unwrap();
        assert_eq!(demand.default_level, LeverLevel::Medium);
        assert!(matches!(demand.kind, LeverKind::Simple));
    }

    #[test]
    fn test_unknown_line_in_effects_rejected() {
        let dir = temp_dir("bad_line");
        write_fixture(&dir);
        fs::write(
            dir.join("effects.csv"),
            "lever_id,line_id,very_low,low,medium,high,very_high\n\
             carbon-price,no-such-line,0.0,0.6,1.4,2.3,3.1\n",
        )
        .unwrap();

        let err = load_dataset(&dir).unwrap_err();
        assert!(matches!(err, DatasetError::UnknownLine { .. }));
    }

    #[test]
    fn test_incomplete_level_definitions_rejected() {
        let dir = temp_dir("bad_levels");
        write_fixture(&dir);
        fs::write(
            dir.join("level_definitions.csv"),
            "lever_id,level,label,description\n\
             carbon-price,0,Stagnant,Carbon price stays low\n\
             carbon-price,1,Slow rise,Gradual climb\n",
        )
        .unwrap();

        let err = load_dataset(&dir).unwrap_err();
        assert!(matches!(err, DatasetError::Invalid { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = temp_dir("missing");

        let err = load_dataset(&dir).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
