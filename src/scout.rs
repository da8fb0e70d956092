//! Best-first search for scout targets
//!
//! Finds a reachable region that has gone unseen for long, preferring
//! frontiers far from any target already being scouted, then lands the
//! scout near the middle of the region rather than at its edge.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashSet;
use rand::Rng;

use crate::core::config::AiConfig;
use crate::core::types::{Cell, Timestamp};
use crate::map::Traversability;
use crate::visibility::VisibilityGrid;

/// Neighbor iteration order, alternated by decision-run parity
///
/// Flipping the sweep between runs breaks priority ties differently each
/// time, so consecutive scouting passes fan out instead of flooding the
/// same avenue. Deliberate diversification, not incidental state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOrder {
    Forward,
    Reverse,
}

impl SweepOrder {
    pub fn from_run_count(run_count: u64) -> Self {
        if run_count % 2 == 0 {
            SweepOrder::Forward
        } else {
            SweepOrder::Reverse
        }
    }
}

/// 8-connected neighborhood
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Entry in the best-first open set; `node` indexes the parent-chain arena
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    unseen_distance: u32,
    unseen_age_sum: i64,
    node: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.unseen_distance == other.unseen_distance
            && self.unseen_age_sum == other.unseen_age_sum
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: greater unseen distance first, longer-stale regions as
        // the tie-break. Remaining ties fall to heap order.
        self.unseen_distance
            .cmp(&other.unseen_distance)
            .then(self.unseen_age_sum.cmp(&other.unseen_age_sum))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a coordinate worth sending a scout to
///
/// Best-first over the grid from `start` (a designated AI spawn cell).
/// Accepts the first popped state that has crossed `2 * unseen_radius`
/// stale cells and sits at least `4 * unseen_radius` away from every
/// in-progress target, then returns an ancestor partway back along its
/// parent chain. Always terminates with an in-bounds coordinate: if the
/// reachable area is fully explored, falls back to a bounded random draw
/// of a traversable cell, and past the draw cap to `start` itself.
pub fn find_scout_target<T: Traversability, R: Rng>(
    oracle: &T,
    visibility: &VisibilityGrid,
    in_progress: &[Cell],
    start: Cell,
    now: Timestamp,
    sweep: SweepOrder,
    config: &AiConfig,
    rng: &mut R,
) -> Cell {
    let accept_unseen = 2 * config.unseen_radius as u32;
    let exclusion_radius = 4.0 * config.unseen_radius as f32;

    // Parent-chain arena: (cell, parent index)
    let mut nodes: Vec<(Cell, Option<usize>)> = vec![(start, None)];
    let mut visited: AHashSet<Cell> = AHashSet::new();
    visited.insert(start);

    let mut open_set = BinaryHeap::new();
    open_set.push(FrontierEntry { unseen_distance: 0, unseen_age_sum: 0, node: 0 });

    while let Some(current) = open_set.pop() {
        let cell = nodes[current.node].0;

        if current.unseen_distance >= accept_unseen
            && in_progress
                .iter()
                .all(|target| cell.distance_to(*target) >= exclusion_radius)
        {
            return backwalk(&nodes, current.node, config.unseen_radius);
        }

        let mut expand = |dir: (i32, i32)| {
            let neighbor = Cell::new(cell.col + dir.0, cell.row + dir.1);
            if visited.contains(&neighbor) || !oracle.is_traversable(neighbor) {
                return;
            }
            visited.insert(neighbor);

            // Only edges into stale cells deepen the unseen distance
            let (unseen_step, age_step) =
                if visibility.is_stale(neighbor, now, config.fog_freshness_secs) {
                    (1, now - visibility.last_seen(neighbor))
                } else {
                    (0, 0)
                };

            nodes.push((neighbor, Some(current.node)));
            open_set.push(FrontierEntry {
                unseen_distance: current.unseen_distance + unseen_step,
                unseen_age_sum: current.unseen_age_sum + age_step,
                node: nodes.len() - 1,
            });
        };

        match sweep {
            SweepOrder::Forward => DIRECTIONS.iter().for_each(|d| expand(*d)),
            SweepOrder::Reverse => DIRECTIONS.iter().rev().for_each(|d| expand(*d)),
        }
    }

    // Reachable area fully explored: random traversable cell, bounded draws
    tracing::debug!("scout search exhausted, falling back to random target");
    random_traversable(oracle, visibility, start, config.fallback_sample_cap, rng)
}

/// Walk back up the parent chain so the scout lands roughly at the center
/// of the newly-unseen region instead of its far edge
fn backwalk(nodes: &[(Cell, Option<usize>)], mut node: usize, unseen_radius: i32) -> Cell {
    let mut i = unseen_radius;
    while i > unseen_radius / 2 {
        match nodes[node].1 {
            Some(parent) => node = parent,
            None => break,
        }
        i -= 1;
    }
    nodes[node].0
}

/// Rejection-sample a random traversable cell; after `cap` failed draws,
/// settle for `start` so a fully blocked map cannot loop forever
fn random_traversable<T: Traversability, R: Rng>(
    oracle: &T,
    visibility: &VisibilityGrid,
    start: Cell,
    cap: u32,
    rng: &mut R,
) -> Cell {
    let width = visibility.width() as i32;
    let height = visibility.height() as i32;

    for _ in 0..cap {
        let candidate = Cell::new(rng.gen_range(0..width), rng.gen_range(0..height));
        if oracle.is_traversable(candidate) {
            return candidate;
        }
    }

    tracing::warn!(?start, "no traversable fallback cell found, using search start");
    start
}
