//! Agent configuration with documented constants
//!
//! Every threshold the decision rules consult lives here so a run can be
//! retuned from a TOML file without touching the rule chain.

use crate::core::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Load `KEY=value` pairs into the process environment.
///
/// Without a path, a `.env` in the working directory (or a parent) is used if
/// there is one. An explicit path must exist. Variables already set win.
pub fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => dotenvy::from_path(path)
            .map_err(|e| AgentError::Config(format!("{}: {}", path.display(), e))),
        None => {
            dotenvy::dotenv().ok();
            Ok(())
        }
    }
}

/// How the upgrade rule picks an upgrade for a finished residence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeStrategy {
    /// Regulator-class first, then Charger-class when CO2 or funds are high
    #[default]
    Classed,
    /// Only the single cheapest upgrade on offer, if affordable and not installed
    CheapestOverall,
    /// Cheapest affordable upgrade of any class that is not installed
    AnyAffordable,
}

/// Configuration for the decision rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    // === MAINTENANCE ===
    /// Residences below this health get maintained (if affordable)
    pub maintenance_health_threshold: f64,

    // === TEMPERATURE ===
    /// Indoor temperature every residence is steered towards
    pub optimal_temperature: f64,
    /// Degrees contributed per resident
    pub degrees_per_pop: f64,
    /// Degrees gained per MWh above base need
    pub degrees_per_excess_mwh: f64,
    /// Extra base energy drawn by a residence with a Charger installed
    pub charger_energy_need: f64,
    /// Minimum margin above base need for a requested energy level
    pub energy_margin: f64,
    /// Deviation from optimal that triggers a regulation
    pub temperature_tolerance: f64,
    /// Regulation only starts from this turn
    pub regulation_start_turn: u32,
    /// Funds needed before energy levels are touched
    pub regulation_min_funds: f64,

    // === PLACEMENT ===
    /// Housing queue length that justifies a new residence
    pub min_housing_queue: u32,
    /// Utilities are considered when (utilities + residences) is a multiple of this
    pub utility_cadence: usize,
    /// Funds must exceed utility cost times this factor
    pub utility_funds_factor: f64,
    /// Upkeep of existing residences must stay below funds times this ratio
    pub maintenance_funds_ratio: f64,
    /// Population weight in the low-emission residence score
    pub co2_per_pop_weight: f64,

    // === ECONOMY ===
    /// Total CO2 at which Charger-class upgrades become worthwhile
    pub co2_limit: f64,
    /// CO2 budget for the whole game, spread evenly over max turns
    pub co2_max: f64,
    pub funds_low: f64,
    pub funds_med: f64,
    pub funds_high: f64,

    // === UPGRADES ===
    pub regulator_upgrades: Vec<String>,
    pub charger_upgrades: Vec<String>,
    pub upgrade_strategy: UpgradeStrategy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            maintenance_health_threshold: 70.0,

            optimal_temperature: 21.0,
            degrees_per_pop: 0.04,
            degrees_per_excess_mwh: 0.75,
            charger_energy_need: 1.8,
            energy_margin: 0.01,
            temperature_tolerance: 1.5,
            regulation_start_turn: 2,
            regulation_min_funds: 150.0,

            min_housing_queue: 15,
            utility_cadence: 6,
            utility_funds_factor: 1.5,
            maintenance_funds_ratio: 0.5,
            co2_per_pop_weight: 0.03,

            co2_limit: 5_000.0,
            co2_max: 20_000.0,
            funds_low: 5_000.0,
            funds_med: 25_000.0,
            funds_high: 60_000.0,

            regulator_upgrades: vec!["Regulator".into()],
            charger_upgrades: vec!["Charger".into()],
            upgrade_strategy: UpgradeStrategy::Classed,
        }
    }
}

impl AgentConfig {
    /// Load a config from a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AgentConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.funds_low <= self.funds_med && self.funds_med <= self.funds_high) {
            return Err(AgentError::Config(format!(
                "funds thresholds must be ordered: low {} <= med {} <= high {}",
                self.funds_low, self.funds_med, self.funds_high
            )));
        }

        if self.utility_cadence == 0 {
            return Err(AgentError::Config("utility_cadence must be positive".into()));
        }

        if self.degrees_per_excess_mwh <= 0.0 {
            return Err(AgentError::Config(
                "degrees_per_excess_mwh must be positive".into(),
            ));
        }

        if self.co2_max <= 0.0 {
            return Err(AgentError::Config("co2_max must be positive".into()));
        }

        Ok(())
    }
}
