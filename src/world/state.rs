//! World state as seen by the agent on a given turn

use serde::{Deserialize, Serialize};

use crate::blueprints::UpgradeOption;
use crate::core::types::{Position, Turn};
use crate::spatial::grid::{Occupancy, OccupancyGrid};

/// A placed housing structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Residence {
    pub position: Position,
    pub building_name: String,
    /// 0 to 100
    pub health: f64,
    /// 0 to 100, 100 means fully built
    pub build_progress: f64,
    pub current_pop: f64,
    pub temperature: f64,
    /// Active effects, including installed upgrades
    pub effects: Vec<String>,
    pub requested_energy_in: f64,
    pub effective_energy_in: f64,
    pub happiness_per_tick_per_pop: f64,
}

impl Residence {
    /// Freshly placed foundation: full health, nothing built, nobody living there
    pub fn new(position: Position, building_name: impl Into<String>) -> Self {
        Self {
            position,
            building_name: building_name.into(),
            health: 100.0,
            build_progress: 0.0,
            current_pop: 0.0,
            temperature: 21.0,
            effects: Vec::new(),
            requested_energy_in: 0.0,
            effective_energy_in: 0.0,
            happiness_per_tick_per_pop: 0.0,
        }
    }

    pub fn is_built(&self) -> bool {
        self.build_progress >= 100.0
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e == name)
    }
}

/// A placed non-housing structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utility {
    pub position: Position,
    pub building_name: String,
    pub build_progress: f64,
}

impl Utility {
    pub fn new(position: Position, building_name: impl Into<String>) -> Self {
        Self {
            position,
            building_name: building_name.into(),
            build_progress: 0.0,
        }
    }
}

/// Everything the decision rules may read on a turn.
///
/// The grid is the agent's own view of the map: it starts from the service's
/// map codes, gets existing structures marked before the first turn, and
/// carries placement reservations across turns.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    pub map_name: String,
    pub turn: Turn,
    pub max_turns: Turn,
    pub funds: f64,
    pub total_co2: f64,
    /// Outdoor temperature
    pub current_temp: f64,
    pub grid: OccupancyGrid,
    pub residences: Vec<Residence>,
    pub utilities: Vec<Utility>,
    pub housing_queue: u32,
    /// Residence type names the map offers
    pub available_residences: Vec<String>,
    /// Utility type names the map offers
    pub available_utilities: Vec<String>,
    pub available_upgrades: Vec<UpgradeOption>,
}

impl WorldState {
    pub fn new(grid: OccupancyGrid, max_turns: Turn) -> Self {
        Self {
            map_name: String::new(),
            turn: 0,
            max_turns,
            funds: 0.0,
            total_co2: 0.0,
            current_temp: 0.0,
            grid,
            residences: Vec::new(),
            utilities: Vec::new(),
            housing_queue: 0,
            available_residences: Vec::new(),
            available_utilities: Vec::new(),
            available_upgrades: Vec::new(),
        }
    }

    /// Residences plus utilities
    pub fn structure_count(&self) -> usize {
        self.residences.len() + self.utilities.len()
    }

    pub fn has_utility(&self, building_name: &str) -> bool {
        self.utilities.iter().any(|u| u.building_name == building_name)
    }

    /// Whether emissions so far stay under an even share of the game budget
    pub fn co2_on_track(&self, co2_max: f64) -> bool {
        if self.max_turns == 0 {
            return false;
        }
        self.total_co2 < self.turn as f64 * (co2_max / self.max_turns as f64)
    }

    /// Mark the cells of every known structure on the grid
    pub fn mark_existing_structures(&mut self) {
        for residence in &self.residences {
            self.grid.set(residence.position, Occupancy::Residence);
        }
        for utility in &self.utilities {
            self.grid.set(utility.position, Occupancy::Utility);
        }
    }

    /// Claim a cell for a structure the service has not confirmed yet
    pub fn reserve(&mut self, pos: Position, kind: Occupancy) {
        self.grid.set(pos, kind);
    }

    /// Take the dynamic fields of a freshly fetched state while keeping this
    /// state's grid, so earlier marks and reservations survive the refresh.
    pub fn refresh_from(&mut self, fresh: WorldState) {
        let grid = std::mem::replace(&mut self.grid, OccupancyGrid::new(0, 0));
        *self = WorldState { grid, ..fresh };
        self.mark_existing_structures();
    }

    /// Whether grid marks and structure collections agree cell for cell.
    /// Pending reservations make this false until the service reports them.
    pub fn is_consistent(&self) -> bool {
        let marked = |pos: Position, kind: Occupancy| self.grid.get(pos) == Some(&kind);
        self.residences
            .iter()
            .all(|r| marked(r.position, Occupancy::Residence))
            && self
                .utilities
                .iter()
                .all(|u| marked(u.position, Occupancy::Utility))
            && self.grid.count(Occupancy::Residence) == self.residences.len()
            && self.grid.count(Occupancy::Utility) == self.utilities.len()
    }
}
