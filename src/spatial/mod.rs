//! Map grid and placement scoring

pub mod grid;
pub mod placement;

pub use grid::{Grid, Occupancy, OccupancyGrid};
pub use placement::{best_location, PlacementIntent};
