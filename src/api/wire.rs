//! JSON payloads exchanged with the game service
//!
//! Field names follow the service's camelCase convention; coordinates come as
//! upper-case `X` / `Y`. Numeric fields the agent does not rely on default to
//! zero so partial payloads still parse.

use serde::{Deserialize, Serialize};

use crate::actions::{Action, ActionKind};
use crate::blueprints::{BlueprintCategory, BlueprintRegistry, BuildingBlueprint, UpgradeOption};
use crate::core::types::{GameId, Position};
use crate::spatial::grid::OccupancyGrid;
use crate::world::{Residence, Utility, WorldState};

/// Static map description returned when a game starts
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub map_name: String,
    pub max_turns: u32,
    /// Map codes indexed `map[x][y]`
    pub map: Vec<Vec<i64>>,
    #[serde(default)]
    pub available_residence_buildings: Vec<ResidenceBlueprintDto>,
    #[serde(default)]
    pub available_utility_buildings: Vec<UtilityBlueprintDto>,
    #[serde(default)]
    pub available_upgrades: Vec<UpgradeDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidenceBlueprintDto {
    pub building_name: String,
    pub cost: f64,
    #[serde(default)]
    pub co2_cost: f64,
    #[serde(default)]
    pub base_energy_need: f64,
    #[serde(default)]
    pub release_tick: u32,
    #[serde(default)]
    pub max_pop: f64,
    #[serde(default)]
    pub income_per_pop: f64,
    #[serde(default)]
    pub emissivity: f64,
    #[serde(default)]
    pub maintenance_cost: f64,
    #[serde(default)]
    pub max_happiness: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityBlueprintDto {
    pub building_name: String,
    pub cost: f64,
    #[serde(default)]
    pub co2_cost: f64,
    #[serde(default)]
    pub base_energy_need: f64,
    #[serde(default)]
    pub release_tick: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeDto {
    pub name: String,
    #[serde(default)]
    pub effect: String,
    pub cost: f64,
}

/// Per-turn game state
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStateDto {
    pub turn: u32,
    pub funds: f64,
    pub total_co2: f64,
    pub current_temp: f64,
    pub housing_queue: u32,
    pub residence_buildings: Vec<ResidenceDto>,
    pub utility_buildings: Vec<UtilityDto>,
    pub messages: Vec<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResidenceDto {
    #[serde(rename = "X")]
    pub x: usize,
    #[serde(rename = "Y")]
    pub y: usize,
    pub building_name: String,
    pub build_progress: f64,
    pub health: f64,
    pub current_pop: f64,
    pub temperature: f64,
    pub effects: Vec<String>,
    pub requested_energy_in: f64,
    pub effective_energy_in: f64,
    pub happiness_per_tick_per_pop: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UtilityDto {
    #[serde(rename = "X")]
    pub x: usize,
    #[serde(rename = "Y")]
    pub y: usize,
    pub building_name: String,
    pub build_progress: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameRequest<'a> {
    pub map_name: &'a str,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameResponse {
    pub game_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRequest<'a> {
    pub game_id: &'a str,
}

/// Body of an action call; unused fields are omitted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub game_id: String,
    #[serde(rename = "X", skip_serializing_if = "Option::is_none")]
    pub x: Option<usize>,
    #[serde(rename = "Y", skip_serializing_if = "Option::is_none")]
    pub y: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl ActionRequest {
    pub fn new(game_id: &GameId, action: &Action) -> Self {
        let position = action.position();
        let mut request = Self {
            game_id: game_id.0.clone(),
            x: position.map(|p| p.x),
            y: position.map(|p| p.y),
            building_name: None,
            upgrade_action: None,
            value: None,
        };
        match action {
            Action::PlaceFoundation { building_name, .. } => {
                request.building_name = Some(building_name.clone());
            }
            Action::BuyUpgrade { upgrade_name, .. } => {
                request.upgrade_action = Some(upgrade_name.clone());
            }
            Action::AdjustEnergy { level, .. } => request.value = Some(*level),
            Action::Wait | Action::Maintain { .. } | Action::Build { .. } => {}
        }
        request
    }

    /// Relative endpoint for the action
    pub fn path(action: &Action) -> String {
        action_path(action.kind())
    }
}

pub fn action_path(kind: ActionKind) -> String {
    format!("action/{}", kind.verb())
}

/// Final score summary
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreReport {
    pub final_score: f64,
    pub co2: f64,
    pub total_happiness: f64,
    pub final_pop: f64,
}

impl GameInfo {
    /// Every residence and utility template the map publishes
    pub fn registry(&self) -> BlueprintRegistry {
        let residences = self.available_residence_buildings.iter().map(|dto| BuildingBlueprint {
            name: dto.building_name.clone(),
            category: BlueprintCategory::Residence,
            cost: dto.cost,
            maintenance_cost: dto.maintenance_cost,
            base_energy_need: dto.base_energy_need,
            emissivity: dto.emissivity,
            max_pop: dto.max_pop,
            max_happiness: dto.max_happiness,
            income_per_pop: dto.income_per_pop,
            co2_cost: dto.co2_cost,
            release_tick: dto.release_tick,
        });
        let utilities = self.available_utility_buildings.iter().map(|dto| BuildingBlueprint {
            name: dto.building_name.clone(),
            category: BlueprintCategory::Utility,
            cost: dto.cost,
            maintenance_cost: 0.0,
            base_energy_need: dto.base_energy_need,
            emissivity: 0.0,
            max_pop: 0.0,
            max_happiness: 0.0,
            income_per_pop: 0.0,
            co2_cost: dto.co2_cost,
            release_tick: dto.release_tick,
        });
        BlueprintRegistry::from_blueprints(residences.chain(utilities))
    }

    /// Combine the static map description with a turn's state. The grid holds
    /// the raw map codes; structures are not marked yet.
    pub fn world_state(&self, dto: &GameStateDto) -> WorldState {
        let mut state = WorldState::new(OccupancyGrid::from_codes(&self.map), self.max_turns);
        state.map_name = self.map_name.clone();
        state.turn = dto.turn;
        state.funds = dto.funds;
        state.total_co2 = dto.total_co2;
        state.current_temp = dto.current_temp;
        state.housing_queue = dto.housing_queue;
        state.residences = dto.residence_buildings.iter().map(Residence::from).collect();
        state.utilities = dto.utility_buildings.iter().map(Utility::from).collect();
        state.available_residences = self
            .available_residence_buildings
            .iter()
            .map(|b| b.building_name.clone())
            .collect();
        state.available_utilities = self
            .available_utility_buildings
            .iter()
            .map(|b| b.building_name.clone())
            .collect();
        state.available_upgrades = self
            .available_upgrades
            .iter()
            .map(|u| UpgradeOption {
                name: u.name.clone(),
                cost: u.cost,
                effect: u.effect.clone(),
            })
            .collect();
        state
    }
}

impl From<&ResidenceDto> for Residence {
    fn from(dto: &ResidenceDto) -> Self {
        Residence {
            position: Position::new(dto.x, dto.y),
            building_name: dto.building_name.clone(),
            health: dto.health,
            build_progress: dto.build_progress,
            current_pop: dto.current_pop,
            temperature: dto.temperature,
            effects: dto.effects.clone(),
            requested_energy_in: dto.requested_energy_in,
            effective_energy_in: dto.effective_energy_in,
            happiness_per_tick_per_pop: dto.happiness_per_tick_per_pop,
        }
    }
}

impl From<&UtilityDto> for Utility {
    fn from(dto: &UtilityDto) -> Self {
        Utility {
            position: Position::new(dto.x, dto.y),
            building_name: dto.building_name.clone(),
            build_progress: dto.build_progress,
        }
    }
}
