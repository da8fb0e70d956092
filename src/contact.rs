//! Mutual visibility between factions
//!
//! Which AI units can the player currently see, and vice versa. Recomputed
//! wholesale each gated decision run; at one pass per ~1.6 s the pairwise
//! scan is cheap enough that incremental updates are not worth the state.

use ahash::AHashSet;

use crate::core::types::{Faction, UnitId};
use crate::units::Roster;

/// Units of each faction currently seen by the other
#[derive(Debug, Clone, Default)]
pub struct Contacts {
    pub ai_seen_by_player: AHashSet<UnitId>,
    pub player_seen_by_ai: AHashSet<UnitId>,
}

impl Contacts {
    /// Full recompute over every (player unit, AI unit) pair
    ///
    /// A unit is seen when it sits within the observer's vision range;
    /// ranges are asymmetric, so each direction is tested separately.
    pub fn compute(roster: &Roster) -> Self {
        let mut contacts = Contacts::default();

        for player_unit in roster.faction_units(Faction::Player) {
            for ai_unit in roster.faction_units(Faction::Ai) {
                let distance = player_unit.position.distance(&ai_unit.position);
                if distance <= player_unit.vision_range as f32 {
                    contacts.ai_seen_by_player.insert(ai_unit.id);
                }
                if distance <= ai_unit.vision_range as f32 {
                    contacts.player_seen_by_ai.insert(player_unit.id);
                }
            }
        }

        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::units::UnitKind;

    #[test]
    fn test_units_in_range_see_each_other() {
        let mut roster = Roster::new();
        let player = roster.spawn_unit(UnitKind::Melee, Vec2::new(0.0, 0.0), Faction::Player);
        let ai = roster.spawn_unit(UnitKind::Melee, Vec2::new(3.0, 0.0), Faction::Ai);

        let contacts = Contacts::compute(&roster);
        assert!(contacts.ai_seen_by_player.contains(&ai));
        assert!(contacts.player_seen_by_ai.contains(&player));
    }

    #[test]
    fn test_units_out_of_range_unseen() {
        let mut roster = Roster::new();
        roster.spawn_unit(UnitKind::Melee, Vec2::new(0.0, 0.0), Faction::Player);
        roster.spawn_unit(UnitKind::Melee, Vec2::new(50.0, 0.0), Faction::Ai);

        let contacts = Contacts::compute(&roster);
        assert!(contacts.ai_seen_by_player.is_empty());
        assert!(contacts.player_seen_by_ai.is_empty());
    }

    #[test]
    fn test_asymmetric_vision() {
        let mut roster = Roster::new();
        // Scout sees 8 cells, melee sees 5; at distance 7 only the scout sees
        let melee = roster.spawn_unit(UnitKind::Melee, Vec2::new(0.0, 0.0), Faction::Player);
        let scout = roster.spawn_unit(UnitKind::Scout, Vec2::new(7.0, 0.0), Faction::Ai);

        let contacts = Contacts::compute(&roster);
        assert!(contacts.player_seen_by_ai.contains(&melee));
        assert!(!contacts.ai_seen_by_player.contains(&scout));
    }

    #[test]
    fn test_any_observer_suffices() {
        let mut roster = Roster::new();
        roster.spawn_unit(UnitKind::Melee, Vec2::new(100.0, 0.0), Faction::Player);
        roster.spawn_unit(UnitKind::Melee, Vec2::new(0.0, 0.0), Faction::Player);
        let ai = roster.spawn_unit(UnitKind::Melee, Vec2::new(2.0, 0.0), Faction::Ai);

        let contacts = Contacts::compute(&roster);
        // One far observer plus one near observer: still seen
        assert!(contacts.ai_seen_by_player.contains(&ai));
    }
}
