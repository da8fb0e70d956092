//! Level grid: bounds, obstacles, and AI spawn markers
//!
//! The AI core never parses level files; it consumes a traversability
//! oracle and a list of spawn markers that the level loader fills in.

use serde::{Deserialize, Serialize};

use crate::core::error::{AiError, Result};
use crate::core::types::Cell;

/// Terrain/obstacle oracle: can a unit stand on this cell?
///
/// Implemented by [`LevelMap`]; the surrounding game can substitute its own
/// cost map (e.g. one that also counts buildings as blocked).
pub trait Traversability {
    fn is_traversable(&self, cell: Cell) -> bool;
}

/// Dense rectangular level grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelMap {
    width: usize,
    height: usize,
    /// Row-major blocked flags
    blocked: Vec<bool>,
    /// Marker cells where the AI may place new units, populated at load time
    ai_spawn_points: Vec<Cell>,
}

impl LevelMap {
    /// Create an open map. Rejects zero-area levels so that coverage ratios
    /// are always well defined downstream.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AiError::ZeroAreaLevel { width, height });
        }
        Ok(Self {
            width,
            height,
            blocked: vec![false; width * height],
            ai_spawn_points: Vec::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && (cell.col as usize) < self.width
            && (cell.row as usize) < self.height
    }

    fn index(&self, cell: Cell) -> usize {
        cell.row as usize * self.width + cell.col as usize
    }

    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) {
        if self.in_bounds(cell) {
            let idx = self.index(cell);
            self.blocked[idx] = blocked;
        }
    }

    pub fn add_ai_spawn_point(&mut self, cell: Cell) {
        if self.in_bounds(cell) && !self.ai_spawn_points.contains(&cell) {
            self.ai_spawn_points.push(cell);
        }
    }

    pub fn ai_spawn_points(&self) -> &[Cell] {
        &self.ai_spawn_points
    }
}

impl Traversability for LevelMap {
    fn is_traversable(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.blocked[self.index(cell)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_area_rejected() {
        assert!(LevelMap::new(0, 10).is_err());
        assert!(LevelMap::new(10, 0).is_err());
    }

    #[test]
    fn test_out_of_bounds_not_traversable() {
        let map = LevelMap::new(10, 10).unwrap();
        assert!(!map.is_traversable(Cell::new(-1, 5)));
        assert!(!map.is_traversable(Cell::new(5, 10)));
        assert!(map.is_traversable(Cell::new(9, 9)));
    }

    #[test]
    fn test_blocked_cell() {
        let mut map = LevelMap::new(10, 10).unwrap();
        map.set_blocked(Cell::new(3, 4), true);
        assert!(!map.is_traversable(Cell::new(3, 4)));
        map.set_blocked(Cell::new(3, 4), false);
        assert!(map.is_traversable(Cell::new(3, 4)));
    }

    #[test]
    fn test_spawn_points_deduped_and_bounded() {
        let mut map = LevelMap::new(10, 10).unwrap();
        map.add_ai_spawn_point(Cell::new(1, 1));
        map.add_ai_spawn_point(Cell::new(1, 1));
        map.add_ai_spawn_point(Cell::new(50, 50)); // ignored, out of bounds
        assert_eq!(map.ai_spawn_points(), &[Cell::new(1, 1)]);
    }
}
