//! Entity value aggregation and target scoring
//!
//! Every unit and building carries a scalar `value`; summed per faction it
//! gives the comparative strength figure the decision loop balances against.

use ordered_float::OrderedFloat;

use crate::core::types::{BuildingId, Faction, Vec2};
use crate::units::Roster;

/// Weight pulling attack preference toward nearer buildings
const PRIORITIZE_CLOSER_ATTACKS: f32 = 1.0;

/// Per-faction value totals for one decision tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueSummary {
    pub player_units: i64,
    pub ai_units: i64,
    pub player_buildings: i64,
}

impl ValueSummary {
    /// Sum `value` over all live entities of each roster. Pure: calling it
    /// twice with no roster changes in between yields identical results.
    pub fn measure(roster: &Roster) -> Self {
        Self {
            player_units: roster
                .faction_units(Faction::Player)
                .map(|u| u.value as i64)
                .sum(),
            ai_units: roster.faction_units(Faction::Ai).map(|u| u.value as i64).sum(),
            player_buildings: roster
                .faction_buildings(Faction::Player)
                .map(|b| b.value as i64)
                .sum(),
        }
    }

    /// Combined player strength: units plus buildings
    pub fn player_total(&self) -> i64 {
        self.player_units + self.player_buildings
    }
}

/// The player building with the best value-minus-distance score from `from`,
/// or `None` if the player has no buildings left
pub fn best_building_to_attack(roster: &Roster, from: Vec2) -> Option<BuildingId> {
    roster
        .faction_buildings(Faction::Player)
        .max_by_key(|b| {
            let distance = b.position.center().distance(&from);
            OrderedFloat(b.value as f32 - distance * PRIORITIZE_CLOSER_ATTACKS)
        })
        .map(|b| b.id)
}

/// The highest-valued player building, ignoring distance
pub fn highest_valued_building(roster: &Roster) -> Option<BuildingId> {
    roster
        .faction_buildings(Faction::Player)
        .max_by_key(|b| b.value)
        .map(|b| b.id)
}
