//! Per-faction visibility (fog of war)
//!
//! Each faction has its own grid of last-observed timestamps. A cell is
//! "seen" only while its stamp is within the freshness window of now;
//! explored-but-unwatched terrain goes stale and reads as unexplored again.

use serde::{Deserialize, Serialize};

use crate::core::error::{AiError, Result};
use crate::core::types::{Cell, Timestamp, Vec2};

/// Last-observed timestamp per cell for one faction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityGrid {
    width: usize,
    height: usize,
    /// Row-major last-seen stamps; 0 means never observed
    last_seen: Vec<Timestamp>,
}

impl VisibilityGrid {
    /// Dimensions must equal the level's. Zero-area grids are rejected so
    /// the coverage ratio below is always well defined.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AiError::ZeroAreaLevel { width, height });
        }
        Ok(Self { width, height, last_seen: vec![0; width * height] })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.col >= 0
            && cell.row >= 0
            && (cell.col as usize) < self.width
            && (cell.row as usize) < self.height
        {
            Some(cell.row as usize * self.width + cell.col as usize)
        } else {
            None
        }
    }

    /// Last-observed stamp for a cell (0 if never seen or out of bounds)
    pub fn last_seen(&self, cell: Cell) -> Timestamp {
        self.index(cell).map(|i| self.last_seen[i]).unwrap_or(0)
    }

    /// Has this cell's stamp aged out of the freshness window?
    pub fn is_stale(&self, cell: Cell, now: Timestamp, freshness: Timestamp) -> bool {
        now - self.last_seen(cell) >= freshness
    }

    /// Stamp every cell within `radius` of `center` with `now`
    ///
    /// Scans the bounding box clipped to grid bounds and applies a
    /// distance-squared test, so the covered area is the Euclidean disc.
    /// Stamps only ever increase; a caller handing in an earlier `now`
    /// cannot roll a cell back.
    pub fn mark_seen(&mut self, center: Vec2, radius: i32, now: Timestamp) {
        let center_cell = center.to_cell();
        let col_min = (center_cell.col - radius).max(0);
        let col_max = (center_cell.col + radius).min(self.width as i32 - 1);
        let row_min = (center_cell.row - radius).max(0);
        let row_max = (center_cell.row + radius).min(self.height as i32 - 1);

        for row in row_min..=row_max {
            for col in col_min..=col_max {
                let dc = col - center_cell.col;
                let dr = row - center_cell.row;
                if dc * dc + dr * dr <= radius * radius {
                    let idx = row as usize * self.width + col as usize;
                    if now > self.last_seen[idx] {
                        self.last_seen[idx] = now;
                    }
                }
            }
        }
    }

    /// Fraction of cells whose stamp is within `freshness` of `now`
    pub fn percent_visible(&self, now: Timestamp, freshness: Timestamp) -> f32 {
        let fresh = self.last_seen.iter().filter(|&&seen| now - seen < freshness).count();
        fresh as f32 / self.last_seen.len() as f32
    }
}
