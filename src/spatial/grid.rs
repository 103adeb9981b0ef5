//! Occupancy grid for the city map

use crate::core::types::Position;
use serde::{Deserialize, Serialize};

/// What occupies a map cell. Discriminants match the service's map codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupancy {
    #[default]
    Empty = 0,
    /// Not buildable (water, park land, map edge)
    Reserved = 1,
    Utility = 2,
    Residence = 3,
}

impl Occupancy {
    /// Unknown codes are treated as unbuildable
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Occupancy::Empty,
            2 => Occupancy::Utility,
            3 => Occupancy::Residence,
            _ => Occupancy::Reserved,
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Generic 2D grid stored outer-dimension first, so iteration order is the
/// row-major scan of a `map[x][y]` layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

pub type OccupancyGrid = Grid<Occupancy>;

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    #[inline]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < self.width && pos.y < self.height {
            Some(pos.x * self.height + pos.y)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<&T> {
        self.index(pos).map(|i| &self.data[i])
    }

    /// Out-of-range writes are ignored
    #[inline]
    pub fn set(&mut self, pos: Position, value: T) {
        if let Some(i) = self.index(pos) {
            self.data[i] = value;
        }
    }

    /// Iterate cells in scan order (x outer, y inner)
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        let height = self.height;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (Position::new(i / height, i % height), v))
    }
}

impl OccupancyGrid {
    /// Build from the service's `map[x][y]` code matrix. Ragged rows are padded
    /// with `Reserved` so they never become placement candidates.
    pub fn from_codes(codes: &[Vec<i64>]) -> Self {
        let width = codes.len();
        let height = codes.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = Grid {
            width,
            height,
            data: vec![Occupancy::Reserved; width * height],
        };
        for (x, column) in codes.iter().enumerate() {
            for (y, &code) in column.iter().enumerate() {
                grid.set(Position::new(x, y), Occupancy::from_code(code));
            }
        }
        grid
    }

    pub fn positions_of(&self, kind: Occupancy) -> impl Iterator<Item = Position> + '_ {
        self.iter()
            .filter(move |(_, cell)| **cell == kind)
            .map(|(pos, _)| pos)
    }

    pub fn count(&self, kind: Occupancy) -> usize {
        self.positions_of(kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_codes_keeps_xy_layout() {
        let grid = OccupancyGrid::from_codes(&[vec![0, 1, 0], vec![3, 0, 2]]);
        assert_eq!(grid.width, 2);
        assert_eq!(grid.height, 3);
        assert_eq!(grid.get(Position::new(0, 1)), Some(&Occupancy::Reserved));
        assert_eq!(grid.get(Position::new(1, 0)), Some(&Occupancy::Residence));
        assert_eq!(grid.get(Position::new(1, 2)), Some(&Occupancy::Utility));
        assert_eq!(grid.get(Position::new(2, 0)), None);
    }

    #[test]
    fn test_iteration_is_scan_order() {
        let grid = OccupancyGrid::new(2, 2);
        let order: Vec<Position> = grid.iter().map(|(p, _)| p).collect();
        assert_eq!(
            order,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_ragged_rows_padded_reserved() {
        let grid = OccupancyGrid::from_codes(&[vec![0], vec![0, 0]]);
        assert_eq!(grid.get(Position::new(0, 1)), Some(&Occupancy::Reserved));
        assert_eq!(grid.count(Occupancy::Empty), 3);
    }

    #[test]
    fn test_unknown_code_is_reserved() {
        assert_eq!(Occupancy::from_code(7), Occupancy::Reserved);
        assert_eq!(Occupancy::Residence.code(), 3);
    }

    #[test]
    fn test_set_out_of_range_ignored() {
        let mut grid = OccupancyGrid::new(1, 1);
        grid.set(Position::new(5, 5), Occupancy::Residence);
        assert_eq!(grid.count(Occupancy::Residence), 0);
    }
}
