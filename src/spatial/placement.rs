//! Placement scoring for new foundations
//!
//! Every empty cell is scored by inverse Manhattan distance to the cells that
//! attract the structure being placed. Residences cluster towards open land
//! and other residences; utilities cluster towards open land and other
//! utilities but keep out of range of housing. A utility cell in range of
//! housing scores the flat penalty, so when every candidate is in range the
//! first empty cell in scan order wins.

use crate::core::types::Position;
use crate::spatial::grid::{Occupancy, OccupancyGrid};
use crate::world::WorldState;

/// Residences within this Manhattan distance disqualify a utility cell
pub const UTILITY_EXCLUSION_RADIUS: usize = 3;

/// Score of a disqualified cell, whatever its influence
pub const EXCLUSION_PENALTY: f64 = -1e5;

/// Which kind of structure is being placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementIntent {
    Residence,
    Utility,
}

impl PlacementIntent {
    /// Cell kinds that pull the new structure towards them
    fn attracts(self, cell: Occupancy) -> bool {
        match self {
            PlacementIntent::Residence => {
                matches!(cell, Occupancy::Empty | Occupancy::Residence)
            }
            PlacementIntent::Utility => matches!(cell, Occupancy::Empty | Occupancy::Utility),
        }
    }

    /// Cell kind that disqualifies candidates within the exclusion radius
    fn excluded_by(self) -> Option<Occupancy> {
        match self {
            PlacementIntent::Residence => None,
            PlacementIntent::Utility => Some(Occupancy::Residence),
        }
    }

    /// The occupancy a reservation for this intent writes
    pub fn occupancy(self) -> Occupancy {
        match self {
            PlacementIntent::Residence => Occupancy::Residence,
            PlacementIntent::Utility => Occupancy::Utility,
        }
    }
}

/// Score a single candidate cell
pub fn score_cell(grid: &OccupancyGrid, candidate: Position, intent: PlacementIntent) -> f64 {
    let mut influence = 0.0;

    for (pos, &cell) in grid.iter() {
        let d = candidate.manhattan(&pos);
        if d <= UTILITY_EXCLUSION_RADIUS && intent.excluded_by() == Some(cell) {
            return EXCLUSION_PENALTY;
        }
        if d > 0 && intent.attracts(cell) {
            influence += 1.0 / d as f64;
        }
    }

    influence
}

/// Best empty cell for the intent, or `None` when the map has no empty cell.
///
/// Ties go to the first cell in scan order.
pub fn best_location(state: &WorldState, intent: PlacementIntent) -> Option<Position> {
    best_on_grid(&state.grid, intent)
}

pub fn best_on_grid(grid: &OccupancyGrid, intent: PlacementIntent) -> Option<Position> {
    let mut best: Option<(Position, f64)> = None;

    for candidate in grid.positions_of(Occupancy::Empty) {
        let score = score_cell(grid, candidate, intent);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(pos, _)| pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(codes: &[&[i64]]) -> OccupancyGrid {
        let codes: Vec<Vec<i64>> = codes.iter().map(|c| c.to_vec()).collect();
        OccupancyGrid::from_codes(&codes)
    }

    #[test]
    fn test_full_grid_has_no_location() {
        let g = grid(&[&[1, 3], &[2, 1]]);
        assert_eq!(best_on_grid(&g, PlacementIntent::Residence), None);
        assert_eq!(best_on_grid(&g, PlacementIntent::Utility), None);
    }

    #[test]
    fn test_single_empty_cell_always_chosen() {
        let g = grid(&[&[3, 3], &[3, 0]]);
        assert_eq!(
            best_on_grid(&g, PlacementIntent::Utility),
            Some(Position::new(1, 1))
        );
        assert_eq!(
            best_on_grid(&g, PlacementIntent::Residence),
            Some(Position::new(1, 1))
        );
    }

    #[test]
    fn test_two_cell_score_is_inverse_distance() {
        // Residence at (0,0), empty at (0,3), reserved in between
        let g = grid(&[&[3, 1, 1, 0]]);
        let score = score_cell(&g, Position::new(0, 3), PlacementIntent::Residence);
        assert_eq!(score, 1.0 / 3.0);
    }

    #[test]
    fn test_isolated_cell_scores_zero() {
        let g = grid(&[&[0, 1, 1]]);
        assert_eq!(score_cell(&g, Position::new(0, 0), PlacementIntent::Residence), 0.0);
    }

    #[test]
    fn test_residence_prefers_center_of_open_land() {
        let g = OccupancyGrid::new(3, 3);
        assert_eq!(
            best_on_grid(&g, PlacementIntent::Residence),
            Some(Position::new(1, 1))
        );
    }

    #[test]
    fn test_ties_resolve_to_first_in_scan_order() {
        // Both empty cells see only each other
        let g = grid(&[&[0, 0]]);
        assert_eq!(
            best_on_grid(&g, PlacementIntent::Residence),
            Some(Position::new(0, 0))
        );
    }

    #[test]
    fn test_utility_avoids_housing_radius() {
        // Residence at x=0; the cell at x=4 is the only one farther than 3 away
        let g = grid(&[&[3], &[0], &[0], &[0], &[0]]);
        assert_eq!(
            best_on_grid(&g, PlacementIntent::Utility),
            Some(Position::new(4, 0))
        );
    }

    #[test]
    fn test_utility_falls_back_when_every_cell_penalized() {
        let g = grid(&[&[3, 0, 0]]);
        let pos = best_on_grid(&g, PlacementIntent::Utility).unwrap();
        assert_eq!(score_cell(&g, pos, PlacementIntent::Utility), EXCLUSION_PENALTY);
        assert_eq!(pos, Position::new(0, 1));
    }

    #[test]
    fn test_penalized_cells_ignore_influence() {
        // (0,2) has more open land around it than (0,0), but both are in range
        // of the residence, so the first one in scan order wins
        let g = grid(&[&[0, 3, 0, 0]]);
        assert_eq!(
            score_cell(&g, Position::new(0, 2), PlacementIntent::Utility),
            EXCLUSION_PENALTY
        );
        assert_eq!(
            best_on_grid(&g, PlacementIntent::Utility),
            Some(Position::new(0, 0))
        );
        // Residences are not affected by the radius
        assert_eq!(
            best_on_grid(&g, PlacementIntent::Residence),
            Some(Position::new(0, 2))
        );
    }

    #[test]
    fn test_utility_attracted_by_utilities_not_residences() {
        let g = grid(&[&[2, 0, 1, 1, 1, 1, 1, 1, 0]]);
        let near = score_cell(&g, Position::new(0, 1), PlacementIntent::Utility);
        let far = score_cell(&g, Position::new(0, 8), PlacementIntent::Utility);
        assert!(near > far);
    }
}
