//! Obstacle generation and background layout
//!
//! The generator only ever appends. Removal belongs to the integrator.

use glam::Vec2;
use rand::Rng;

use super::difficulty::DifficultyParameters;
use super::state::{BackgroundElement, Obstacle, ObstacleId};
use crate::tuning::{BackgroundConfig, GameConfig};

/// Timed obstacle spawner
#[derive(Debug, Clone, Default)]
pub struct ObstacleGenerator {
    /// Milliseconds accumulated since the last spawn
    timer_ms: f32,
    next_id: u64,
}

impl ObstacleGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the spawn timer. Ids keep counting so they stay unique across
    /// restarts.
    pub fn reset(&mut self) {
        self.timer_ms = 0.0;
    }

    pub fn timer_ms(&self) -> f32 {
        self.timer_ms
    }

    /// Advance the timer by one tick and spawn when the interval elapses
    pub fn tick<R: Rng>(
        &mut self,
        obstacles: &mut Vec<Obstacle>,
        difficulty: &DifficultyParameters,
        config: &GameConfig,
        rng: &mut R,
    ) -> Option<ObstacleId> {
        self.timer_ms += config.physics.tick_ms;
        if self.timer_ms < difficulty.spawn_interval_ms {
            return None;
        }
        self.timer_ms = 0.0;

        let obstacle = self.spawn(difficulty.gate_gap, config, rng);
        let id = obstacle.id;
        log::debug!(
            "Spawned obstacle {} gap_top={:.1} gap={:.1}",
            id.0,
            obstacle.gap_top,
            obstacle.gap
        );
        obstacles.push(obstacle);
        Some(id)
    }

    /// Build an obstacle at the right edge with a random gate position
    pub fn spawn<R: Rng>(&mut self, gap: f32, config: &GameConfig, rng: &mut R) -> Obstacle {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;

        Obstacle {
            id,
            x: config.playfield.width,
            gap_top: random_gap_top(gap, config, rng),
            gap,
            passed: false,
        }
    }
}

/// Draw a gate top edge so both segments keep their minimum height and the
/// gap stays clear of the ground band.
///
/// Configuration validation guarantees the span is positive for every
/// reachable gap.
pub fn random_gap_top<R: Rng>(gap: f32, config: &GameConfig, rng: &mut R) -> f32 {
    let min_segment = config.obstacles.min_segment_height;
    let span = config.playfield.height - 2.0 * min_segment - gap - config.playfield.ground_height;
    debug_assert!(span > 0.0, "gate does not fit; config was not validated");
    min_segment + rng.random::<f32>() * span.max(0.0)
}

/// Initial cloud layout scattered across the playfield
pub fn background_layout<R: Rng>(config: &GameConfig, rng: &mut R) -> Vec<BackgroundElement> {
    let bg = &config.background;
    (0..bg.count)
        .map(|i| BackgroundElement {
            id: i as u32,
            pos: Vec2::new(
                rng.random::<f32>() * config.playfield.width,
                random_background_y(bg, rng),
            ),
            size: Vec2::new(
                rng.random_range(bg.min_width..bg.max_width),
                rng.random_range(bg.min_height..bg.max_height),
            ),
            drift_speed: rng.random_range(bg.min_speed..bg.max_speed),
            style: rng.random_range(0..bg.styles),
        })
        .collect()
}

/// Fresh vertical position for a cloud entering from the right
pub fn random_background_y<R: Rng>(bg: &BackgroundConfig, rng: &mut R) -> f32 {
    rng.random_range(bg.min_y..bg.max_y)
}
