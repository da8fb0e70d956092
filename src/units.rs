//! Entity arena and faction rosters
//!
//! Units and buildings live in one arena keyed by stable integer ids;
//! faction rosters hold ids, never owning handles. Removing an entity from
//! the arena can therefore never leave a dangling reference in a roster,
//! only an id that fails lookup.

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::error::{AiError, Result};
use crate::core::types::{BuildingId, Cell, Faction, UnitId, Vec2};

/// Unit archetypes with fixed base stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    Melee,
    Ranged,
    Scout,
}

impl UnitKind {
    /// Strategic value score, used for faction strength comparisons
    pub fn value(&self) -> i32 {
        match self {
            UnitKind::Melee => 100,
            UnitKind::Ranged => 150,
            UnitKind::Scout => 50,
        }
    }

    /// Vision radius in cells
    pub fn vision_range(&self) -> i32 {
        match self {
            UnitKind::Melee => 5,
            UnitKind::Ranged => 6,
            UnitKind::Scout => 8,
        }
    }

    pub fn initial_health(&self) -> i32 {
        match self {
            UnitKind::Melee => 120,
            UnitKind::Ranged => 80,
            UnitKind::Scout => 60,
        }
    }

    /// Movement speed in cells per second
    pub fn speed(&self) -> f32 {
        match self {
            UnitKind::Melee => 1.5,
            UnitKind::Ranged => 1.5,
            UnitKind::Scout => 2.5,
        }
    }
}

/// Why a unit is moving somewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderIntent {
    Move,
    Scout,
    AttackMove,
}

/// An active movement order toward a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveOrder {
    pub intent: OrderIntent,
    pub target: Cell,
}

/// A live unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub faction: Faction,
    pub kind: UnitKind,
    pub position: Vec2,
    pub value: i32,
    pub vision_range: i32,
    pub health: i32,
    pub order: Option<MoveOrder>,
}

impl Unit {
    pub fn has_active_move_order(&self) -> bool {
        self.order.is_some()
    }

    pub fn is_idle(&self) -> bool {
        self.order.is_none()
    }

    /// Step this unit toward its order target, clearing the order on arrival
    fn advance(&mut self, elapsed_ms: f64) {
        let Some(order) = self.order else {
            return;
        };
        let target = order.target.center();
        let step = self.kind.speed() * (elapsed_ms / 1000.0) as f32;
        let to_target = target - self.position;
        if to_target.length() <= step {
            self.position = target;
            self.order = None;
        } else {
            self.position = self.position + to_target.normalize() * step;
        }
    }
}

/// A static building
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub faction: Faction,
    pub position: Cell,
    pub value: i32,
}

/// Arena of all live entities plus per-faction id rosters
#[derive(Debug, Clone, Default)]
pub struct Roster {
    units: AHashMap<UnitId, Unit>,
    buildings: AHashMap<BuildingId, Building>,
    player_units: Vec<UnitId>,
    ai_units: Vec<UnitId>,
    player_buildings: Vec<BuildingId>,
    ai_buildings: Vec<BuildingId>,
    next_unit_id: u32,
    next_building_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a new unit, returning its id
    pub fn spawn_unit(&mut self, kind: UnitKind, position: Vec2, faction: Faction) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;

        self.units.insert(
            id,
            Unit {
                id,
                faction,
                kind,
                position,
                value: kind.value(),
                vision_range: kind.vision_range(),
                health: kind.initial_health(),
                order: None,
            },
        );
        self.faction_units_mut(faction).push(id);
        id
    }

    pub fn add_building(&mut self, position: Cell, value: i32, faction: Faction) -> BuildingId {
        let id = BuildingId(self.next_building_id);
        self.next_building_id += 1;

        self.buildings.insert(id, Building { id, faction, position, value });
        match faction {
            Faction::Player => self.player_buildings.push(id),
            Faction::Ai => self.ai_buildings.push(id),
        }
        id
    }

    fn faction_units_mut(&mut self, faction: Faction) -> &mut Vec<UnitId> {
        match faction {
            Faction::Player => &mut self.player_units,
            Faction::Ai => &mut self.ai_units,
        }
    }

    pub fn faction_unit_ids(&self, faction: Faction) -> &[UnitId] {
        match faction {
            Faction::Player => &self.player_units,
            Faction::Ai => &self.ai_units,
        }
    }

    pub fn faction_building_ids(&self, faction: Faction) -> &[BuildingId] {
        match faction {
            Faction::Player => &self.player_buildings,
            Faction::Ai => &self.ai_buildings,
        }
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(&id)
    }

    /// Live units of one faction
    pub fn faction_units(&self, faction: Faction) -> impl Iterator<Item = &Unit> {
        self.faction_unit_ids(faction).iter().filter_map(|id| self.units.get(id))
    }

    /// Live buildings of one faction
    pub fn faction_buildings(&self, faction: Faction) -> impl Iterator<Item = &Building> {
        self.faction_building_ids(faction).iter().filter_map(|id| self.buildings.get(id))
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn issue_move_order(&mut self, id: UnitId, intent: OrderIntent, target: Cell) -> Result<()> {
        let unit = self.units.get_mut(&id).ok_or(AiError::UnitNotFound(id))?;
        unit.order = Some(MoveOrder { intent, target });
        Ok(())
    }

    pub fn clear_order(&mut self, id: UnitId) {
        if let Some(unit) = self.units.get_mut(&id) {
            unit.order = None;
        }
    }

    pub fn has_active_move_order(&self, id: UnitId) -> bool {
        self.units.get(&id).map(|u| u.has_active_move_order()).unwrap_or(false)
    }

    /// Purge units whose health has dropped to zero, from the arena and
    /// from both faction rosters
    pub fn remove_dead(&mut self) {
        let units = &mut self.units;
        for roster in [&mut self.player_units, &mut self.ai_units] {
            roster.retain(|id| match units.get(id) {
                Some(unit) => unit.health > 0,
                None => false,
            });
        }
        units.retain(|_, unit| unit.health > 0);
    }

    /// Advance every unit's movement by one frame
    pub fn advance(&mut self, elapsed_ms: f64) {
        for unit in self.units.values_mut() {
            unit.advance(elapsed_ms);
        }
    }

    /// The idle unit of `faction` closest to `target` (horizontal plane)
    pub fn nearest_idle_unit(&self, faction: Faction, target: Vec2) -> Option<UnitId> {
        self.faction_units(faction)
            .filter(|u| u.is_idle())
            .min_by_key(|u| OrderedFloat(u.position.distance(&target)))
            .map(|u| u.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_registers_in_faction_roster() {
        let mut roster = Roster::new();
        let id = roster.spawn_unit(UnitKind::Melee, Vec2::new(1.0, 2.0), Faction::Ai);

        assert_eq!(roster.faction_unit_ids(Faction::Ai), &[id]);
        assert!(roster.faction_unit_ids(Faction::Player).is_empty());
        assert_eq!(roster.unit(id).unwrap().value, UnitKind::Melee.value());
    }

    #[test]
    fn test_ids_are_unique_and_stable() {
        let mut roster = Roster::new();
        let a = roster.spawn_unit(UnitKind::Melee, Vec2::default(), Faction::Player);
        let b = roster.spawn_unit(UnitKind::Scout, Vec2::default(), Faction::Player);
        assert_ne!(a, b);

        // Killing a does not disturb b's id
        roster.unit_mut(a).unwrap().health = 0;
        roster.remove_dead();
        assert!(roster.unit(a).is_none());
        assert_eq!(roster.unit(b).unwrap().id, b);
    }

    #[test]
    fn test_remove_dead_purges_roster_lists() {
        let mut roster = Roster::new();
        let a = roster.spawn_unit(UnitKind::Melee, Vec2::default(), Faction::Ai);
        let b = roster.spawn_unit(UnitKind::Ranged, Vec2::default(), Faction::Ai);

        roster.unit_mut(a).unwrap().health = -10;
        roster.remove_dead();

        assert_eq!(roster.faction_unit_ids(Faction::Ai), &[b]);
        assert_eq!(roster.unit_count(), 1);
    }

    #[test]
    fn test_move_order_completes_on_arrival() {
        let mut roster = Roster::new();
        let id = roster.spawn_unit(UnitKind::Scout, Vec2::new(0.0, 0.0), Faction::Ai);
        roster.issue_move_order(id, OrderIntent::Scout, Cell::new(5, 0)).unwrap();
        assert!(roster.has_active_move_order(id));

        // Scout moves 2.5 cells/s; 3 seconds covers the 5 cells
        for _ in 0..30 {
            roster.advance(100.0);
        }

        assert!(!roster.has_active_move_order(id));
        assert_eq!(roster.unit(id).unwrap().position, Cell::new(5, 0).center());
    }

    #[test]
    fn test_order_for_missing_unit_errors() {
        let mut roster = Roster::new();
        let err = roster.issue_move_order(UnitId(99), OrderIntent::Move, Cell::new(0, 0));
        assert!(err.is_err());
    }

    #[test]
    fn test_nearest_idle_unit_skips_busy() {
        let mut roster = Roster::new();
        let near = roster.spawn_unit(UnitKind::Melee, Vec2::new(1.0, 0.0), Faction::Ai);
        let far = roster.spawn_unit(UnitKind::Melee, Vec2::new(9.0, 0.0), Faction::Ai);

        let target = Vec2::new(0.0, 0.0);
        assert_eq!(roster.nearest_idle_unit(Faction::Ai, target), Some(near));

        roster.issue_move_order(near, OrderIntent::Move, Cell::new(3, 3)).unwrap();
        assert_eq!(roster.nearest_idle_unit(Faction::Ai, target), Some(far));
    }

    #[test]
    fn test_nearest_idle_unit_empty_roster() {
        let roster = Roster::new();
        assert_eq!(roster.nearest_idle_unit(Faction::Ai, Vec2::default()), None);
    }
}
