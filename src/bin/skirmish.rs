//! Headless skirmish runner - exercises the AI core and reports on pacing
//!
//! Builds a random obstacle map, drops starting units for both sides, and
//! steps the core at a fixed frame delta, printing what the AI did.

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use outrider::{
    AiConfig, AiCore, Cell, Faction, LevelMap, Result, Roster, Traversability, UnitKind, Vec2,
};

const FRAME_MS: f64 = 16.0;

/// Synthetic wall-clock base so never-seen cells (stamp 0) read as stale
const EPOCH: i64 = 1_700_000_000;

#[derive(Parser, Debug)]
#[command(name = "skirmish", about = "Headless AI skirmish simulation")]
struct Args {
    /// Level width in cells
    #[arg(long, default_value_t = 60)]
    width: usize,

    /// Level height in cells
    #[arg(long, default_value_t = 60)]
    height: usize,

    /// Number of simulation frames to run
    #[arg(long, default_value_t = 20_000)]
    frames: u64,

    /// Fraction of cells blocked by obstacles
    #[arg(long, default_value_t = 0.1)]
    obstacle_density: f64,

    /// RNG seed (map generation and AI decisions)
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outrider=info".into()),
        )
        .init();

    let args = Args::parse();
    let mut map_rng = ChaCha8Rng::seed_from_u64(args.seed);

    let map = generate_map(&args, &mut map_rng)?;
    let mut roster = starting_roster(&map, &args);
    let mut core = AiCore::new(args.width, args.height, AiConfig::default(), args.seed)?;

    tracing::info!(
        width = args.width,
        height = args.height,
        frames = args.frames,
        "skirmish starting"
    );

    let mut elapsed_ms = 0.0;
    let mut spawned = 0usize;
    let mut dispatched = 0u64;
    for _ in 0..args.frames {
        elapsed_ms += FRAME_MS;
        let now = EPOCH + (elapsed_ms / 1000.0) as i64;

        let units_before = roster.unit_count();
        let targets_before = core.scout_targets().count();

        roster.advance(FRAME_MS);
        core.update(FRAME_MS, &map, &mut roster, now);

        spawned += roster.unit_count().saturating_sub(units_before);
        if core.scout_targets().count() > targets_before {
            dispatched += 1;
        }
    }

    let summary = core.value_summary();
    println!("=== Skirmish report ===");
    println!("frames simulated:    {}", args.frames);
    println!("gated AI runs:       {}", core.run_count());
    println!("map coverage:        {:.1}%", core.percent_visible() * 100.0);
    println!("scouts dispatched:   {}", dispatched);
    println!("AI units spawned:    {}", spawned);
    println!(
        "value (player/AI):   {} / {}",
        summary.player_total(),
        summary.ai_units
    );
    println!(
        "mutual contacts:     {} AI seen, {} player seen",
        core.contacts().ai_seen_by_player.len(),
        core.contacts().player_seen_by_ai.len()
    );

    Ok(())
}

/// Random obstacle map with AI spawn markers in the top corner region and
/// the player starting area at the bottom
fn generate_map(args: &Args, rng: &mut ChaCha8Rng) -> Result<LevelMap> {
    let mut map = LevelMap::new(args.width, args.height)?;

    for row in 0..args.height as i32 {
        for col in 0..args.width as i32 {
            if rng.gen_bool(args.obstacle_density) {
                map.set_blocked(Cell::new(col, row), true);
            }
        }
    }

    // Spawn markers stay traversable
    for _ in 0..3 {
        let cell = Cell::new(
            rng.gen_range(0..args.width as i32 / 3),
            rng.gen_range(0..args.height as i32 / 3),
        );
        map.set_blocked(cell, false);
        map.add_ai_spawn_point(cell);
    }

    Ok(map)
}

fn starting_roster(map: &LevelMap, args: &Args) -> Roster {
    let mut roster = Roster::new();

    let ai_start = map.ai_spawn_points()[0].center();
    roster.spawn_unit(UnitKind::Melee, ai_start, Faction::Ai);
    roster.spawn_unit(UnitKind::Scout, ai_start, Faction::Ai);

    let player_corner = Vec2::new(args.width as f32 - 5.0, args.height as f32 - 5.0);
    roster.spawn_unit(UnitKind::Melee, player_corner, Faction::Player);
    roster.spawn_unit(UnitKind::Ranged, player_corner, Faction::Player);
    let base = player_corner.to_cell();
    if map.is_traversable(base) {
        roster.add_building(base, 400, Faction::Player);
    } else {
        roster.add_building(Cell::new(base.col - 1, base.row - 1), 400, Faction::Player);
    }

    roster
}
