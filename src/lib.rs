//! Outrider - strategic AI core for a fog-of-war RTS
//!
//! The surrounding game owns rendering, input, physics, and level loading;
//! this crate owns the decisions. It tracks how recently each grid cell was
//! observed per faction, searches for unexplored ground worth scouting, and
//! balances unit spawning against the opposing side's aggregate value.
//!
//! Everything runs synchronously inside one simulation tick: construct an
//! [`AiCore`] per game session and call [`AiCore::update`] once per frame;
//! the core self-throttles its decision-making to a fixed cadence.

pub mod ai;
pub mod contact;
pub mod core;
pub mod map;
pub mod scout;
pub mod units;
pub mod value;
pub mod visibility;

// Re-exports for convenient access
pub use ai::AiCore;
pub use contact::Contacts;
pub use crate::core::config::AiConfig;
pub use crate::core::error::{AiError, Result};
pub use crate::core::types::{BuildingId, Cell, Faction, Timestamp, UnitId, Vec2};
pub use map::{LevelMap, Traversability};
pub use scout::{find_scout_target, SweepOrder};
pub use units::{Building, MoveOrder, OrderIntent, Roster, Unit, UnitKind};
pub use value::{best_building_to_attack, highest_valued_building, ValueSummary};
pub use visibility::VisibilityGrid;
