//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Wall-clock seconds, monotonic. Visibility staleness is measured in these.
pub type Timestamp = i64;

/// Which side a game piece belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Ai,
}

impl Faction {
    pub fn opponent(&self) -> Faction {
        match self {
            Faction::Player => Faction::Ai,
            Faction::Ai => Faction::Player,
        }
    }
}

/// Unique identifier for units (arena id, allocated by the roster)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Unique identifier for buildings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

/// Grid cell coordinate: an index into grid-shaped arrays, not an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// World-space center of this cell on the horizontal plane
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.col as f32, self.row as f32)
    }

    /// Euclidean distance between cell centers
    pub fn distance_to(&self, other: Cell) -> f32 {
        let dc = (self.col - other.col) as f32;
        let dr = (self.row - other.row) as f32;
        (dc * dc + dr * dr).sqrt()
    }
}

/// 2D position on the horizontal plane
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::default()
        }
    }

    /// Nearest grid cell (round to cell center)
    pub fn to_cell(&self) -> Cell {
        Cell::new((self.x + 0.5).floor() as i32, (self.y + 0.5).floor() as i32)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}
