//! Strategic decision loop
//!
//! One `AiCore` per game session owns all strategic state: visibility
//! grids, scout assignments, timers, and the RNG. The tick entry point is
//! called every frame; actual decisions run on a fixed cadence.
//!
//! Ordering within a gated run is part of the contract: targets are purged
//! and values recomputed before the scout dispatch, and the scout dispatch
//! happens before the spawn decision.

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::contact::Contacts;
use crate::core::config::AiConfig;
use crate::core::error::{AiError, Result};
use crate::core::types::{Cell, Faction, Timestamp, UnitId};
use crate::map::LevelMap;
use crate::scout::{find_scout_target, SweepOrder};
use crate::units::{OrderIntent, Roster, UnitKind};
use crate::value::ValueSummary;
use crate::visibility::VisibilityGrid;

/// Strategic AI context for one game session
#[derive(Debug)]
pub struct AiCore {
    config: AiConfig,

    // Decision cadence
    run_accumulator_ms: f64,
    spawn_timer_ms: f64,
    run_count: u64,

    // Scout assignments: unit -> the cell it was sent to explore.
    // The value set is the "in progress" target set the search avoids.
    scout_targets: AHashMap<UnitId, Cell>,

    // Per-faction fog of war
    ai_visibility: VisibilityGrid,
    player_visibility: VisibilityGrid,

    // Outputs of the last gated run
    percent_visible: f32,
    value_summary: ValueSummary,
    contacts: Contacts,

    rng: ChaCha8Rng,
}

impl AiCore {
    /// One-time setup for a level of the given dimensions
    pub fn new(width: usize, height: usize, config: AiConfig, seed: u64) -> Result<Self> {
        config.validate().map_err(AiError::InvalidConfig)?;
        Ok(Self {
            ai_visibility: VisibilityGrid::new(width, height)?,
            player_visibility: VisibilityGrid::new(width, height)?,
            config,
            run_accumulator_ms: 0.0,
            spawn_timer_ms: 0.0,
            run_count: 0,
            scout_targets: AHashMap::new(),
            percent_visible: 0.0,
            value_summary: ValueSummary::default(),
            contacts: Contacts::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Exploration coverage as of the last gated run
    pub fn percent_visible(&self) -> f32 {
        self.percent_visible
    }

    pub fn value_summary(&self) -> &ValueSummary {
        &self.value_summary
    }

    pub fn contacts(&self) -> &Contacts {
        &self.contacts
    }

    pub fn run_count(&self) -> u64 {
        self.run_count
    }

    /// Scout targets currently being pursued
    pub fn scout_targets(&self) -> impl Iterator<Item = (UnitId, Cell)> + '_ {
        self.scout_targets.iter().map(|(id, cell)| (*id, *cell))
    }

    pub fn ai_visibility(&self) -> &VisibilityGrid {
        &self.ai_visibility
    }

    pub fn player_visibility(&self) -> &VisibilityGrid {
        &self.player_visibility
    }

    /// Per-tick entry point; `now` is monotonic wall-clock seconds
    ///
    /// Cheap bookkeeping (death cleanup, visibility stamping) happens every
    /// call; the decision body self-throttles to the configured cadence.
    pub fn update(&mut self, elapsed_ms: f64, map: &LevelMap, roster: &mut Roster, now: Timestamp) {
        roster.remove_dead();
        self.stamp_visibility(roster, now);

        self.run_accumulator_ms += elapsed_ms;
        self.spawn_timer_ms += elapsed_ms;
        if self.run_accumulator_ms < self.config.run_interval_ms {
            return;
        }
        self.run_accumulator_ms = 0.0;

        self.run_count += 1;
        self.purge_completed_scout_targets(roster);
        self.value_summary = ValueSummary::measure(roster);
        self.contacts = Contacts::compute(roster);
        self.percent_visible = self
            .ai_visibility
            .percent_visible(now, self.config.fog_freshness_secs);

        tracing::debug!(
            run = self.run_count,
            percent_visible = self.percent_visible,
            player_value = self.value_summary.player_total(),
            ai_value = self.value_summary.ai_units,
            "gated AI run"
        );

        self.scout_decision(map, roster, now);
        self.spawn_decision(map, roster);
    }

    /// Re-stamp both factions' grids from current unit positions
    fn stamp_visibility(&mut self, roster: &Roster, now: Timestamp) {
        for unit in roster.faction_units(Faction::Ai) {
            self.ai_visibility.mark_seen(unit.position, unit.vision_range, now);
        }
        for unit in roster.faction_units(Faction::Player) {
            self.player_visibility.mark_seen(unit.position, unit.vision_range, now);
        }
    }

    /// Drop targets whose assigned unit died or finished (or abandoned)
    /// its scout order, freeing the area for re-selection
    fn purge_completed_scout_targets(&mut self, roster: &Roster) {
        self.scout_targets.retain(|unit_id, target| match roster.unit(*unit_id) {
            Some(unit) => unit
                .order
                .map(|o| o.intent == OrderIntent::Scout && o.target == *target)
                .unwrap_or(false),
            None => false,
        });
    }

    /// Send the nearest idle unit toward unexplored ground when coverage
    /// has dropped too low
    fn scout_decision(&mut self, map: &LevelMap, roster: &mut Roster, now: Timestamp) {
        if self.percent_visible >= self.config.visible_ratio_threshold {
            return;
        }

        let Some(start) = map.ai_spawn_points().choose(&mut self.rng).copied() else {
            tracing::warn!("scouting skipped: no AI spawn points on this level");
            return;
        };

        let in_progress: Vec<Cell> = self.scout_targets.values().copied().collect();
        let target = find_scout_target(
            map,
            &self.ai_visibility,
            &in_progress,
            start,
            now,
            SweepOrder::from_run_count(self.run_count),
            &self.config,
            &mut self.rng,
        );

        let Some(scout_id) = roster.nearest_idle_unit(Faction::Ai, target.center()) else {
            // No one free this run; the slot is simply retried next time
            return;
        };

        // The unit was just confirmed live and idle
        let _ = roster.issue_move_order(scout_id, OrderIntent::Scout, target);
        self.scout_targets.insert(scout_id, target);
        tracing::debug!(unit = ?scout_id, ?target, "scout dispatched");
    }

    /// Reactive balancing: spawn whenever the player's combined value pulls
    /// ahead, with a time floor forcing reinforcement even when ahead
    fn spawn_decision(&mut self, map: &LevelMap, roster: &mut Roster) {
        let player_value = self.value_summary.player_total();
        let behind = player_value > self.value_summary.ai_units;
        let forced = self.spawn_timer_ms > self.config.forced_spawn_interval_ms;
        if !behind && !forced {
            return;
        }

        let Some(spawn_point) = map.ai_spawn_points().choose(&mut self.rng).copied() else {
            tracing::warn!("spawn skipped: no AI spawn points on this level");
            return;
        };

        let id = roster.spawn_unit(UnitKind::Melee, spawn_point.center(), Faction::Ai);
        self.spawn_timer_ms = 0.0;
        tracing::debug!(unit = ?id, ?spawn_point, forced, "AI unit spawned");
    }
}
