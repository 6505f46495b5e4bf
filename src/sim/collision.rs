//! Collision detection and pass-through scoring
//!
//! Everything here is axis-aligned: the actor box against the playfield
//! bounds and against both segments of every live obstacle.

use glam::Vec2;

use super::state::{ActorState, Obstacle};
use crate::tuning::GameConfig;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap test; boxes that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Actor box rose above the playfield
    Ceiling,
    /// Actor box sank into the ground band
    Ground,
    /// Actor box overlapped an obstacle segment
    Obstacle,
}

/// Check the termination conditions, first hit wins
pub fn check_termination(
    actor: &ActorState,
    obstacles: &[Obstacle],
    config: &GameConfig,
) -> Option<Termination> {
    let actor_box = actor.aabb(config);

    if actor_box.min.y < 0.0 {
        return Some(Termination::Ceiling);
    }
    if actor_box.max().y > config.playfield.floor() {
        return Some(Termination::Ground);
    }

    obstacles
        .iter()
        .any(|o| {
            actor_box.intersects(&o.top_segment(config))
                || actor_box.intersects(&o.bottom_segment(config))
        })
        .then_some(Termination::Obstacle)
}

/// Mark obstacles the actor has cleared and return how many were newly
/// passed. An obstacle is passed once its trailing edge is strictly left of
/// the actor box.
pub fn mark_passed(obstacles: &mut [Obstacle], config: &GameConfig) -> u32 {
    let actor_left = config.actor.x;
    let width = config.obstacles.width;
    let mut newly_passed = 0;

    for obstacle in obstacles.iter_mut() {
        if !obstacle.passed && obstacle.trailing_edge(width) < actor_left {
            obstacle.passed = true;
            newly_passed += 1;
        }
    }

    newly_passed
}
