//! AI configuration with documented constants
//!
//! All tunable thresholds are collected here with explanations of their
//! purpose and how they interact with each other.

use serde::Deserialize;

use crate::core::error::{AiError, Result};

/// Configuration for the strategic AI core
///
/// Defaults are the tuned gameplay values. Changing them shifts how
/// aggressively the AI scouts and reinforces.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    // === DECISION LOOP ===
    /// Minimum elapsed time (ms) between gated decision runs
    ///
    /// The tick entry point is called every frame; the decision body only
    /// executes once this much time has accumulated. At 1600 ms the AI
    /// makes roughly one decision pass per 1.6 s regardless of frame rate.
    pub run_interval_ms: f64,

    /// Forced-reinforcement interval (ms)
    ///
    /// If no spawn has happened for this long, one is forced even when the
    /// AI is ahead on value. Keeps the AI from stalling out indefinitely
    /// once it has the upper hand.
    pub forced_spawn_interval_ms: f64,

    // === SCOUTING ===
    /// Exploration coverage below which the AI dispatches scouts
    ///
    /// When less than this fraction of the map has been seen recently,
    /// idle units get sent toward unexplored ground.
    pub visible_ratio_threshold: f32,

    /// Fog-of-war freshness window (seconds)
    ///
    /// A cell counts as "seen" only if its last-observed stamp is within
    /// this window of now; older stamps are stale and the cell reads as
    /// unexplored again.
    pub fog_freshness_secs: i64,

    /// Radius (cells) defining what counts as a worthwhile unseen region
    ///
    /// The scout search accepts a region once it has crossed 2x this many
    /// stale cells, rejects targets within 4x this distance of a target
    /// already being scouted, and lands the scout about this far back from
    /// the region's edge.
    pub unseen_radius: i32,

    /// Cap on random draws when falling back to a random scout target
    ///
    /// On a fully explored map the search falls back to rejection-sampling
    /// a random traversable cell. The cap bounds that loop on pathological
    /// maps; when it is hit, the search start cell is returned instead.
    pub fallback_sample_cap: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            run_interval_ms: 1600.0,
            forced_spawn_interval_ms: 20000.0,
            visible_ratio_threshold: 0.4,
            fog_freshness_secs: 10,
            unseen_radius: 6,
            fallback_sample_cap: 128,
        }
    }
}

impl AiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from JSON, validating it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AiConfig = serde_json::from_str(json)?;
        config.validate().map_err(AiError::InvalidConfig)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.run_interval_ms <= 0.0 {
            return Err(format!("run_interval_ms ({}) must be positive", self.run_interval_ms));
        }

        // A forced spawn more frequent than the decision cadence would fire
        // on every gated run, which defeats the value comparison
        if self.forced_spawn_interval_ms < self.run_interval_ms {
            return Err(format!(
                "forced_spawn_interval_ms ({}) should be >= run_interval_ms ({})",
                self.forced_spawn_interval_ms, self.run_interval_ms
            ));
        }

        if !(0.0..=1.0).contains(&self.visible_ratio_threshold) {
            return Err(format!(
                "visible_ratio_threshold ({}) must be within 0..=1",
                self.visible_ratio_threshold
            ));
        }

        if self.fog_freshness_secs <= 0 {
            return Err("fog_freshness_secs must be positive".into());
        }

        if self.unseen_radius < 2 {
            return Err(format!(
                "unseen_radius ({}) must be >= 2 for the back-walk to land inside the region",
                self.unseen_radius
            ));
        }

        if self.fallback_sample_cap == 0 {
            return Err("fallback_sample_cap must be positive".into());
        }

        Ok(())
    }
}
