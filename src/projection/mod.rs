//! Scenario projection: lever settings, horizons, and the engine

mod engine;
mod series;

pub use engine::{Horizon, LeverSettings, ProjectionEngine};
pub use series::{ProjectedRow, ProjectionResult, ProjectionSummary};
