//! Built-in reference dataset matching the planning workbook
//!
//! Six service lines and five policy levers for a climate-services firm.
//! Baselines are the anchor-year revenue figures in EUR millions; effects are
//! percentage-point adjustments to annual growth rates.

use super::lever::{EffectTable, LevelDefinition, Lever, LeverKind, LeverLevel};
use super::line::Line;
use super::Dataset;

/// Anchor year of the reference scenario
pub const REFERENCE_ANCHOR_YEAR: u32 = 2025;

pub fn reference_dataset() -> Dataset {
    Dataset {
        anchor_year: REFERENCE_ANCHOR_YEAR,
        lines: reference_lines(),
        levers: reference_levers(),
    }
}

fn reference_lines() -> Vec<Line> {
    vec![
        Line::new("advisory", "Climate Advisory", 22.44, 9.91),
        Line::new("assurance", "Sustainability Assurance", 18.30, 7.25),
        Line::new("tax", "Energy & Carbon Tax", 30.12, 4.80),
        Line::new("transactions", "Green Transactions", 12.05, 5.10),
        Line::new("engineering", "Decarbonization Engineering", 8.75, 16.60),
        Line::new("digital", "Climate Data & Digital", 15.60, 10.75),
    ]
}

fn reference_levers() -> Vec<Lever> {
    vec![
        carbon_price(),
        regulatory_rollback(),
        green_subsidies(),
        client_demand(),
        talent_supply(),
    ]
}

/// EU-ETS style carbon price trajectory, active from the anchor year
fn carbon_price() -> Lever {
    Lever {
        id: "carbon-price".to_string(),
        name: "Carbon price trajectory".to_string(),
        activation_year: REFERENCE_ANCHOR_YEAR,
        default_level: LeverLevel::VeryLow,
        effects: EffectTable::new()
            .with("advisory", [0.0, 0.6, 1.4, 2.3, 3.1])
            .with("assurance", [0.0, 0.4, 0.9, 1.5, 2.2])
            .with("tax", [0.0, 0.3, 0.7, 1.2, 1.8])
            .with("transactions", [0.0, 0.3, 0.6, 1.1, 1.7])
            .with("engineering", [0.0, 1.1, 2.4, 4.0, 5.6])
            .with("digital", [0.0, 0.2, 0.5, 0.9, 1.4]),
        kind: LeverKind::Leveled {
            levels: [
                LevelDefinition::new("Stagnant", "Carbon price stays below 30 EUR/t"),
                LevelDefinition::new("Slow rise", "Gradual climb toward 60 EUR/t by 2030"),
                LevelDefinition::new("Steady rise", "Linear path to 100 EUR/t by 2030"),
                LevelDefinition::new("Accelerated", "150 EUR/t by 2030, broad sector coverage"),
                LevelDefinition::new("Shock", "Rapid repricing above 200 EUR/t"),
            ],
        },
    }
}

/// Political rollback of disclosure and reduction mandates; the only lever
/// with negative effects across the board
fn regulatory_rollback() -> Lever {
    Lever {
        id: "regulatory-rollback".to_string(),
        name: "Regulatory rollback".to_string(),
        activation_year: REFERENCE_ANCHOR_YEAR,
        default_level: LeverLevel::VeryLow,
        effects: EffectTable::new()
            .with("advisory", [0.0, -1.3, -2.9, -5.4, -7.8])
            .with("assurance", [0.0, -0.9, -2.1, -3.8, -5.5])
            .with("tax", [0.0, -0.4, -1.0, -1.9, -2.8])
            .with("transactions", [0.0, -0.5, -1.2, -2.2, -3.4])
            .with("engineering", [0.0, -0.6, -1.4, -2.5, -3.9]),
        kind: LeverKind::Simple,
    }
}

/// Public green-investment subsidy programs, phased in from 2027
fn green_subsidies() -> Lever {
    Lever {
        id: "green-subsidies".to_string(),
        name: "Green investment subsidies".to_string(),
        activation_year: 2027,
        default_level: LeverLevel::VeryLow,
        effects: EffectTable::new()
            .with("advisory", [0.0, 0.3, 0.8, 1.4, 2.0])
            .with("transactions", [0.0, 0.7, 1.6, 2.8, 4.1])
            .with("engineering", [0.0, 0.9, 2.0, 3.4, 4.9])
            .with("digital", [0.0, 0.4, 0.9, 1.6, 2.3]),
        kind: LeverKind::Leveled {
            levels: [
                LevelDefinition::new("None", "No dedicated subsidy programs"),
                LevelDefinition::new("Pilot", "Small national pilot schemes"),
                LevelDefinition::new("National", "Broad national programs"),
                LevelDefinition::new("EU-wide", "Coordinated EU-level funding"),
                LevelDefinition::new("Industrial policy", "Subsidies as core industrial strategy"),
            ],
        },
    }
}

/// Corporate net-zero commitment momentum; the baseline rates assume no
/// demand acceleration, and the current commitment pipeline corresponds to
/// Medium, which is why this lever defaults there
fn client_demand() -> Lever {
    Lever {
        id: "client-demand".to_string(),
        name: "Corporate net-zero demand".to_string(),
        activation_year: 2026,
        default_level: LeverLevel::Medium,
        effects: EffectTable::new()
            .with("advisory", [0.0, 0.6, 1.1, 1.8, 2.6])
            .with("assurance", [0.0, 0.4, 0.8, 1.3, 1.9])
            .with("transactions", [0.0, 0.3, 0.6, 1.0, 1.5])
            .with("engineering", [0.0, 0.7, 1.4, 2.3, 3.3])
            .with("digital", [0.0, 0.4, 0.8, 1.3, 1.9]),
        kind: LeverKind::Simple,
    }
}

/// Availability of green-skills hires; constrains delivery-heavy lines only
fn talent_supply() -> Lever {
    Lever {
        id: "talent-supply".to_string(),
        name: "Green-skills talent supply".to_string(),
        activation_year: 2028,
        default_level: LeverLevel::VeryLow,
        effects: EffectTable::new()
            .with("advisory", [0.0, 0.2, 0.5, 0.8, 1.2])
            .with("engineering", [0.0, 0.4, 0.9, 1.5, 2.1])
            .with("digital", [0.0, 0.3, 0.6, 1.0, 1.5]),
        kind: LeverKind::Simple,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_level_is_neutral() {
        // All-lowest settings must reproduce pure baseline growth: no lever
        // contributes anything at its lowest level.
        let ds = reference_dataset();

        for lever in &ds.levers {
            for line in &ds.lines {
                assert_eq!(
                    lever.effects.get(LeverLevel::VeryLow, &line.id),
                    0.0,
                    "lever {} has a non-zero lowest-level effect on {}",
                    lever.id,
                    line.id
                );
            }
        }
    }

    #[test]
    fn test_demand_defaults_to_medium() {
        let ds = reference_dataset();
        let demand = ds.lever("client-demand").unwrap();

        assert_eq!(demand.default_level, LeverLevel::Medium);
        assert_eq!(demand.effects.get(LeverLevel::Medium, "advisory"), 1.1);
    }

    #[test]
    fn test_leveled_levers_carry_metadata() {
        let ds = reference_dataset();
        let carbon = ds.lever("carbon-price").unwrap();

        let def = carbon.level_definition(LeverLevel::VeryHigh).unwrap();
        assert_eq!(def.label, "Shock");

        let rollback = ds.lever("regulatory-rollback").unwrap();
        assert!(rollback.level_definition(LeverLevel::VeryHigh).is_none());
    }

    #[test]
    fn test_effect_tables_reference_known_lines() {
        let ds = reference_dataset();

        for lever in &ds.levers {
            for line_id in lever.effects.line_ids() {
                assert!(
                    ds.line(line_id).is_some(),
                    "lever {} references unknown line {}",
                    lever.id,
                    line_id
                );
            }
        }
    }
}
