//! Simulation entity records
//!
//! Plain data: the session owns all of it and hands out [`Snapshot`] copies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::difficulty::DifficultyParameters;
use crate::tuning::GameConfig;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Constructed, `start()` not called yet
    #[default]
    NotStarted,
    /// Ticking
    Running,
    /// Collision detected; only `start()` leaves this phase
    Ended,
}

/// The player-controlled actor. Only the vertical axis moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    /// Top edge of the hit box
    pub y: f32,
    /// Pixels per tick, positive = downward
    pub velocity: f32,
    /// Degrees, always within the configured tilt range
    pub tilt: f32,
}

impl ActorState {
    pub fn new(start_y: f32) -> Self {
        Self {
            y: start_y,
            velocity: 0.0,
            tilt: 0.0,
        }
    }

    /// Hit box for this actor at its fixed column
    pub fn aabb(&self, config: &GameConfig) -> Aabb {
        Aabb::new(
            Vec2::new(config.actor.x, self.y),
            Vec2::new(config.actor.width, config.actor.height),
        )
    }
}

/// Opaque obstacle identifier, unique within a generator's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u64);

/// A gated obstacle: a top segment `[0, gap_top)` and a bottom segment
/// `[gap_top + gap, playfield height)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    /// Left edge
    pub x: f32,
    /// Bottom of the top segment
    pub gap_top: f32,
    /// Gap size at spawn time; later level changes do not resize it
    pub gap: f32,
    /// Set once when the actor clears the obstacle, never reset
    pub passed: bool,
}

impl Obstacle {
    /// Right edge
    #[inline]
    pub fn trailing_edge(&self, width: f32) -> f32 {
        self.x + width
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap
    }

    pub fn top_segment(&self, config: &GameConfig) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, 0.0),
            Vec2::new(config.obstacles.width, self.gap_top),
        )
    }

    pub fn bottom_segment(&self, config: &GameConfig) -> Aabb {
        let top = self.gap_bottom();
        Aabb::new(
            Vec2::new(self.x, top),
            Vec2::new(config.obstacles.width, config.playfield.height - top),
        )
    }
}

/// Decorative drifting cloud. No gameplay effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundElement {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub drift_speed: f32,
    /// Appearance variant for the renderer
    pub style: u8,
}

/// Notification emitted by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u32),
    LevelChanged(u32),
    SessionEnded { final_score: u32, final_level: u32 },
}

/// Read-only view of a session after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub tick: u64,
    pub actor: ActorState,
    pub obstacles: Vec<Obstacle>,
    pub background: Vec<BackgroundElement>,
    pub score: u32,
    pub level: u32,
    pub difficulty: DifficultyParameters,
}
