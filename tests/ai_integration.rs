//! AI core integration tests
//!
//! Drive the full decision loop the way the surrounding game would: one
//! `update` per simulated frame, with unit movement advancing in between.

use outrider::{
    AiConfig, AiCore, Cell, Faction, LevelMap, OrderIntent, Roster, Traversability, UnitKind, Vec2,
};

const FRAME_MS: f64 = 16.0;

/// Timestamp base: the core consumes wall-clock seconds, so never-seen
/// cells (stamp 0) must read as long-stale
const EPOCH: i64 = 1_700_000_000;

fn open_map(width: usize, height: usize) -> LevelMap {
    let mut map = LevelMap::new(width, height).unwrap();
    map.add_ai_spawn_point(Cell::new(3, 3));
    map
}

/// Step the simulation for `seconds` of wall-clock time at frame cadence
fn run_for(
    core: &mut AiCore,
    map: &LevelMap,
    roster: &mut Roster,
    start_ms: f64,
    seconds: f64,
) -> f64 {
    let mut elapsed_ms = start_ms;
    let end_ms = start_ms + seconds * 1000.0;
    while elapsed_ms < end_ms {
        elapsed_ms += FRAME_MS;
        roster.advance(FRAME_MS);
        core.update(FRAME_MS, map, roster, EPOCH + (elapsed_ms / 1000.0) as i64);
    }
    elapsed_ms
}

#[test]
fn test_scouting_expands_coverage_over_time() {
    let map = open_map(50, 50);
    let mut core = AiCore::new(50, 50, AiConfig::default(), 9).unwrap();
    let mut roster = Roster::new();

    roster.spawn_unit(UnitKind::Scout, Cell::new(3, 3).center(), Faction::Ai);
    roster.spawn_unit(UnitKind::Scout, Cell::new(3, 3).center(), Faction::Ai);

    let t = run_for(&mut core, &map, &mut roster, 0.0, 5.0);
    let early_coverage = core.percent_visible();
    assert!(early_coverage > 0.0);

    run_for(&mut core, &map, &mut roster, t, 30.0);

    // Scouts keep getting dispatched while coverage is low, so the map
    // opens up well beyond the starting discs
    assert!(
        core.percent_visible() > early_coverage,
        "coverage did not grow: {} -> {}",
        early_coverage,
        core.percent_visible()
    );
    assert!(core.run_count() > 10);
}

#[test]
fn test_scout_orders_complete_and_targets_recycle() {
    let map = open_map(40, 40);
    let mut core = AiCore::new(40, 40, AiConfig::default(), 3).unwrap();
    let mut roster = Roster::new();

    let scout = roster.spawn_unit(UnitKind::Scout, Cell::new(3, 3).center(), Faction::Ai);

    // First gated run dispatches the scout
    let t = run_for(&mut core, &map, &mut roster, 0.0, 2.0);
    assert!(roster.has_active_move_order(scout));
    assert_eq!(core.scout_targets().count(), 1);

    // Long enough for the scout to walk anywhere on a 40x40 map and for
    // the loop to purge (and possibly re-issue) its assignment
    run_for(&mut core, &map, &mut roster, t, 60.0);

    // Every surviving in-progress entry must still be backed by a live
    // scout order toward that exact cell
    for (unit_id, target) in core.scout_targets() {
        let unit = roster.unit(unit_id).expect("assigned unit is live");
        let order = unit.order.expect("assigned unit has an order");
        assert_eq!(order.intent, OrderIntent::Scout);
        assert_eq!(order.target, target);
    }
}

#[test]
fn test_ai_reinforces_against_player_buildup() {
    let map = open_map(30, 30);
    let mut core = AiCore::new(30, 30, AiConfig::default(), 5).unwrap();
    let mut roster = Roster::new();

    roster.spawn_unit(UnitKind::Melee, Cell::new(3, 3).center(), Faction::Ai);
    for _ in 0..4 {
        roster.spawn_unit(UnitKind::Ranged, Vec2::new(25.0, 25.0), Faction::Player);
    }
    roster.add_building(Cell::new(27, 27), 500, Faction::Player);

    run_for(&mut core, &map, &mut roster, 0.0, 20.0);

    // Player value 1100 vs a starting 100: the AI spawns every gated run
    // until its unit value catches up
    let summary = core.value_summary();
    assert!(
        summary.ai_units >= summary.player_total(),
        "AI failed to reinforce: {:?}",
        summary
    );
}

#[test]
fn test_forced_spawn_keeps_trickling_when_ahead() {
    let map = open_map(20, 20);
    let mut core = AiCore::new(20, 20, AiConfig::default(), 11).unwrap();
    let mut roster = Roster::new();

    // AI far ahead on value; player has nothing
    for _ in 0..5 {
        roster.spawn_unit(UnitKind::Ranged, Cell::new(3, 3).center(), Faction::Ai);
    }
    let before = roster.faction_unit_ids(Faction::Ai).len();

    // 45 simulated seconds crosses the 20 s forced-spawn floor twice
    run_for(&mut core, &map, &mut roster, 0.0, 45.0);

    let after = roster.faction_unit_ids(Faction::Ai).len();
    assert!(
        after >= before + 2,
        "expected at least two forced spawns, got {}",
        after - before
    );
}

#[test]
fn test_blocked_level_never_hangs() {
    // Fully blocked map except the spawn marker: the search must bottom
    // out through its bounded fallback every run
    let mut map = LevelMap::new(25, 25).unwrap();
    for row in 0..25 {
        for col in 0..25 {
            map.set_blocked(Cell::new(col, row), true);
        }
    }
    map.set_blocked(Cell::new(7, 7), false);
    map.add_ai_spawn_point(Cell::new(7, 7));
    assert!(map.is_traversable(Cell::new(7, 7)));

    let mut core = AiCore::new(25, 25, AiConfig::default(), 2).unwrap();
    let mut roster = Roster::new();
    roster.spawn_unit(UnitKind::Scout, Cell::new(7, 7).center(), Faction::Ai);

    run_for(&mut core, &map, &mut roster, 0.0, 10.0);
    assert!(core.run_count() > 0);
}
