//! Level to simulation parameter mapping
//!
//! Pure functions only: the session recomputes parameters whenever the
//! level changes and caches the result.

use serde::{Deserialize, Serialize};

use crate::tuning::DifficultyConfig;

/// Parameters for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParameters {
    /// Vertical opening of newly spawned gates
    pub gate_gap: f32,
    /// Horizontal obstacle scroll per tick
    pub scroll_speed: f32,
    /// Time between obstacle spawns
    pub spawn_interval_ms: f32,
}

/// Compute the parameters for `level`.
///
/// Levels below 1 are treated as 1 and levels above `max_level` as
/// `max_level`. The three clamps are independent.
pub fn compute_difficulty(cfg: &DifficultyConfig, level: u32) -> DifficultyParameters {
    let effective = level.clamp(1, cfg.max_level.max(1));
    let steps = (effective - 1) as f32;

    DifficultyParameters {
        gate_gap: (cfg.gap_base - steps * cfg.gap_step).max(cfg.gap_min),
        scroll_speed: (cfg.speed_base + steps * cfg.speed_step).min(cfg.speed_max),
        spawn_interval_ms: (cfg.spawn_base_ms - steps * cfg.spawn_step_ms).max(cfg.spawn_min_ms),
    }
}

/// Level reached with `score` points: `floor(score / score_per_level) + 1`,
/// capped at `max_level`
pub fn level_for_score(cfg: &DifficultyConfig, score: u32) -> u32 {
    let per_level = cfg.score_per_level.max(1);
    (score / per_level + 1).min(cfg.max_level.max(1))
}
