//! Climate Scenario CLI
//!
//! Command-line interface for running scenario projections and exporting
//! formula workbooks

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use climate_scenario::{
    workbook::{write_sheet_csv, SCENARIO_SHEET},
    Horizon, LeverLevel, LeverSettings, ScenarioRunner,
};
use log::warn;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "climate_scenario", version, about = "Scenario projections for climate-policy planning")]
struct Cli {
    /// Load the dataset from a directory of CSV files instead of the
    /// built-in reference data
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a projection and print the per-line value series
    Project {
        /// Lever override as ID=LEVEL (level: 0-4 or very-low..very-high);
        /// repeatable. Unset levers sit at their dataset defaults.
        #[arg(short, long = "lever", value_name = "ID=LEVEL")]
        levers: Vec<String>,

        #[arg(long, value_enum, default_value_t = HorizonArg::Far)]
        horizon: HorizonArg,

        /// Emit the full result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Export the projection as a formula workbook (CSV)
    Export {
        /// Lever override as ID=LEVEL, repeatable
        #[arg(short, long = "lever", value_name = "ID=LEVEL")]
        levers: Vec<String>,

        #[arg(short, long, default_value = "scenario_workbook.csv")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HorizonArg {
    /// Anchor year + 6
    Near,
    /// Anchor year + 11
    Far,
}

impl From<HorizonArg> for Horizon {
    fn from(arg: HorizonArg) -> Self {
        match arg {
            HorizonArg::Near => Horizon::Near,
            HorizonArg::Far => Horizon::Far,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let runner = match &cli.data_dir {
        Some(dir) => ScenarioRunner::from_csv_path(dir)
            .with_context(|| format!("loading dataset from {}", dir.display()))?,
        None => ScenarioRunner::new(),
    };

    match cli.command {
        Command::Project { levers, horizon, json } => {
            let settings = parse_lever_overrides(&runner, &levers)?;
            let result = runner.run(&settings, horizon.into());

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&runner, &settings, &result);
            }
        }
        Command::Export { levers, output } => {
            let settings = parse_lever_overrides(&runner, &levers)?;
            let workbook = runner.export(&settings);
            let sheet = workbook
                .sheet(SCENARIO_SHEET)
                .context("exporter produced no scenario sheet")?;
            write_sheet_csv(sheet, &output)
                .with_context(|| format!("writing workbook to {}", output.display()))?;
            println!("Workbook written to {}", output.display());
        }
    }

    Ok(())
}

/// Build settings from the dataset defaults plus ID=LEVEL overrides
///
/// A malformed level is an error at this boundary; an unknown lever id is
/// only a warning, since the engine ignores it anyway.
fn parse_lever_overrides(runner: &ScenarioRunner, overrides: &[String]) -> Result<LeverSettings> {
    let mut settings = LeverSettings::defaults_for(runner.dataset());

    for spec in overrides {
        let Some((id, level)) = spec.split_once('=') else {
            bail!("expected ID=LEVEL, got '{}'", spec);
        };
        let level: LeverLevel = level
            .parse()
            .map_err(|e: String| anyhow::anyhow!("{}: {}", spec, e))?;
        if runner.dataset().lever(id).is_none() {
            warn!("unknown lever id '{}' has no effect", id);
        }
        settings.set(id, level);
    }

    Ok(settings)
}

fn print_result(
    runner: &ScenarioRunner,
    settings: &LeverSettings,
    result: &climate_scenario::ProjectionResult,
) {
    println!("Climate Scenario v{}", env!("CARGO_PKG_VERSION"));
    println!("==========================\n");

    println!("Lever settings:");
    for lever in &runner.dataset().levers {
        let level = settings.level_for(lever);
        match lever.level_definition(level) {
            Some(definition) => {
                println!("  {:<26} {} ({})", lever.name, level, definition.label)
            }
            None => println!("  {:<26} {}", lever.name, level),
        }
    }
    println!();

    // Header row of years
    print!("{:<28}", "Line");
    for year in result.years() {
        print!(" {:>9}", year);
    }
    println!();
    println!("{}", "-".repeat(28 + 10 * result.years().count()));

    for row in &result.rows {
        print!("{:<28}", row.line_name);
        for year in result.years() {
            print!(" {:>9.2}", row.value(year).unwrap_or(0.0));
        }
        println!();
    }

    print!("{:<28}", "Total");
    for year in result.years() {
        print!(" {:>9.2}", result.total(year).unwrap_or(0.0));
    }
    println!();

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Years projected: {}", summary.years);
    println!("  Anchor total: {:.2}", summary.anchor_total);
    println!("  Final total: {:.2}", summary.final_total);
    println!("  Growth over horizon: {:.1}%", summary.total_growth_pct);
}
