//! Blueprint schema types.
//!
//! Static building templates and upgrade offers published by the game
//! service once per session.

use serde::{Deserialize, Serialize};

/// Whether a blueprint houses people or provides a map-level effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlueprintCategory {
    Residence,
    Utility,
}

/// Immutable template of a building type.
///
/// Utility blueprints leave the residence-only fields (population, income,
/// happiness, emissivity, maintenance) at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingBlueprint {
    pub name: String,
    pub category: BlueprintCategory,
    pub cost: f64,
    #[serde(default)]
    pub maintenance_cost: f64,
    #[serde(default)]
    pub base_energy_need: f64,
    #[serde(default)]
    pub emissivity: f64,
    #[serde(default)]
    pub max_pop: f64,
    #[serde(default)]
    pub max_happiness: f64,
    #[serde(default)]
    pub income_per_pop: f64,
    #[serde(default)]
    pub co2_cost: f64,
    /// First turn on which the type may be placed
    #[serde(default)]
    pub release_tick: u32,
}

impl BuildingBlueprint {
    pub fn is_released(&self, turn: u32) -> bool {
        self.release_tick <= turn
    }

    /// Income of a fully populated building
    pub fn income_capacity(&self) -> f64 {
        self.income_per_pop * self.max_pop
    }
}

/// A purchasable residence upgrade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOption {
    pub name: String,
    pub cost: f64,
    /// Name of the effect the upgrade applies
    #[serde(default)]
    pub effect: String,
}

impl UpgradeOption {
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        let name = name.into();
        Self {
            effect: name.clone(),
            name,
            cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_gate_is_inclusive() {
        let bp = BuildingBlueprint {
            name: "Apartments".into(),
            category: BlueprintCategory::Residence,
            cost: 100.0,
            maintenance_cost: 10.0,
            base_energy_need: 5.0,
            emissivity: 0.1,
            max_pop: 50.0,
            max_happiness: 0.5,
            income_per_pop: 2.0,
            co2_cost: 300.0,
            release_tick: 4,
        };
        assert!(!bp.is_released(3));
        assert!(bp.is_released(4));
        assert_eq!(bp.income_capacity(), 100.0);
    }

    #[test]
    fn test_utility_fields_default_to_zero() {
        let bp: BuildingBlueprint =
            serde_json::from_str(r#"{"name":"Park","category":"utility","cost":800.0}"#).unwrap();
        assert_eq!(bp.category, BlueprintCategory::Utility);
        assert_eq!(bp.max_pop, 0.0);
        assert_eq!(bp.release_tick, 0);
    }
}
