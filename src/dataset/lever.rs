//! Policy lever definitions: discrete 5-level settings with per-line
//! growth-rate effects from an activation year onward

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One of the five discrete lever positions, ordered lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeverLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl LeverLevel {
    /// All levels in ordinal order
    pub const ALL: [LeverLevel; 5] = [
        LeverLevel::VeryLow,
        LeverLevel::Low,
        LeverLevel::Medium,
        LeverLevel::High,
        LeverLevel::VeryHigh,
    ];

    /// Ordinal position in [0, 4]
    pub fn index(self) -> usize {
        match self {
            LeverLevel::VeryLow => 0,
            LeverLevel::Low => 1,
            LeverLevel::Medium => 2,
            LeverLevel::High => 3,
            LeverLevel::VeryHigh => 4,
        }
    }

    /// Convert an ordinal back to a level; out-of-range yields `None` so
    /// callers can fall back to a default rather than fail
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            LeverLevel::VeryLow => "Very Low",
            LeverLevel::Low => "Low",
            LeverLevel::Medium => "Medium",
            LeverLevel::High => "High",
            LeverLevel::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for LeverLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LeverLevel {
    type Err = String;

    /// Accepts an ordinal ("0".."4") or a label ("very-low", "Very Low", ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = s.parse::<usize>() {
            return Self::from_index(index)
                .ok_or_else(|| format!("lever level out of range: {} (expected 0-4)", index));
        }
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "verylow" => Ok(LeverLevel::VeryLow),
            "low" => Ok(LeverLevel::Low),
            "medium" => Ok(LeverLevel::Medium),
            "high" => Ok(LeverLevel::High),
            "veryhigh" => Ok(LeverLevel::VeryHigh),
            _ => Err(format!("unknown lever level: {}", s)),
        }
    }
}

/// Presentation metadata for one level of a leveled lever
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub label: String,
    pub description: String,
}

impl LevelDefinition {
    pub fn new(label: &str, description: &str) -> Self {
        Self {
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

/// Lever flavor, selected by pattern match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LeverKind {
    /// Activation year and effect table only
    Simple,
    /// Adds named per-level metadata for presentation
    Leveled { levels: [LevelDefinition; 5] },
}

/// Percentage-point growth-rate adjustments per (level, line)
///
/// Missing entries mean "no effect" (0.0); lines a lever does not touch are
/// simply absent from the table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectTable {
    effects: HashMap<String, [f64; 5]>,
}

impl EffectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-level effects for one line (index = level ordinal)
    pub fn set(&mut self, line_id: &str, per_level: [f64; 5]) {
        self.effects.insert(line_id.to_string(), per_level);
    }

    /// Builder-style variant of [`set`](Self::set)
    pub fn with(mut self, line_id: &str, per_level: [f64; 5]) -> Self {
        self.set(line_id, per_level);
        self
    }

    /// Effect in percentage points for (level, line); unknown line ⇒ 0.0
    pub fn get(&self, level: LeverLevel, line_id: &str) -> f64 {
        self.effects
            .get(line_id)
            .map(|per_level| per_level[level.index()])
            .unwrap_or(0.0)
    }

    /// Line ids this table has entries for
    pub fn line_ids(&self) -> impl Iterator<Item = &str> {
        self.effects.keys().map(|s| s.as_str())
    }
}

/// A named policy lever
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lever {
    /// Stable key used in settings maps and effect tables
    pub id: String,

    /// Display name
    pub name: String,

    /// First projected year at which this lever has any effect; earlier
    /// years get exactly zero from it regardless of its position
    pub activation_year: u32,

    /// Position the lever starts at before the user touches it
    pub default_level: LeverLevel,

    /// Growth-rate adjustments per (level, line)
    pub effects: EffectTable,

    pub kind: LeverKind,
}

impl Lever {
    /// Effect on `line_id` at `year` when the lever sits at `level`
    ///
    /// Zero before the activation year; the anchor-year exclusion is the
    /// engine's concern, not the lever's.
    pub fn effect_on(&self, level: LeverLevel, line_id: &str, year: u32) -> f64 {
        if year < self.activation_year {
            0.0
        } else {
            self.effects.get(level, line_id)
        }
    }

    /// Level metadata when this is a leveled lever
    pub fn level_definition(&self, level: LeverLevel) -> Option<&LevelDefinition> {
        match &self.kind {
            LeverKind::Simple => None,
            LeverKind::Leveled { levels } => Some(&levels[level.index()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_lever() -> Lever {
        Lever {
            id: "demand".to_string(),
            name: "Demand".to_string(),
            activation_year: 2027,
            default_level: LeverLevel::VeryLow,
            effects: EffectTable::new().with("advisory", [0.0, 0.5, 1.0, 1.5, 2.0]),
            kind: LeverKind::Simple,
        }
    }

    #[test]
    fn test_level_ordinals_round_trip() {
        for level in LeverLevel::ALL {
            assert_eq!(LeverLevel::from_index(level.index()), Some(level));
        }
        assert_eq!(LeverLevel::from_index(5), None);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("3".parse::<LeverLevel>(), Ok(LeverLevel::High));
        assert_eq!("very-high".parse::<LeverLevel>(), Ok(LeverLevel::VeryHigh));
        assert_eq!("Very Low".parse::<LeverLevel>(), Ok(LeverLevel::VeryLow));
        assert!("7".parse::<LeverLevel>().is_err());
        assert!("extreme".parse::<LeverLevel>().is_err());
    }

    #[test]
    fn test_effect_defaults_to_zero() {
        let table = EffectTable::new().with("advisory", [0.0, 0.5, 1.0, 1.5, 2.0]);

        assert_eq!(table.get(LeverLevel::High, "advisory"), 1.5);
        assert_eq!(table.get(LeverLevel::High, "unknown-line"), 0.0);
    }

    #[test]
    fn test_inactive_before_activation_year() {
        let lever = test_lever();

        assert_eq!(lever.effect_on(LeverLevel::VeryHigh, "advisory", 2026), 0.0);
        assert_eq!(lever.effect_on(LeverLevel::VeryHigh, "advisory", 2027), 2.0);
        assert_eq!(lever.effect_on(LeverLevel::VeryHigh, "advisory", 2030), 2.0);
    }

    #[test]
    fn test_simple_lever_has_no_level_metadata() {
        let lever = test_lever();
        assert!(lever.level_definition(LeverLevel::Medium).is_none());
    }
}
