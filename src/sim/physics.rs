//! Per-tick motion integration
//!
//! Fixed nominal timestep: one call is one frame regardless of wall-clock
//! time between frames.

use rand::Rng;

use super::spawn::random_background_y;
use super::state::{ActorState, BackgroundElement, Obstacle};
use crate::tuning::{GameConfig, PhysicsConfig};

/// Apply gravity, move the actor and update its tilt
pub fn integrate_actor(actor: &mut ActorState, physics: &PhysicsConfig) {
    actor.velocity += physics.gravity;
    actor.y += actor.velocity;
    actor.tilt =
        (actor.velocity * physics.rotation_factor).clamp(physics.min_tilt, physics.max_tilt);
}

/// Override vertical velocity with the flap impulse. Position is untouched.
#[inline]
pub fn apply_flap(actor: &mut ActorState, physics: &PhysicsConfig) {
    actor.velocity = physics.flap_velocity;
}

/// Scroll obstacles left and drop those whose trailing edge went negative.
/// Returns the number removed; survivors keep their order.
pub fn scroll_obstacles(obstacles: &mut Vec<Obstacle>, scroll_speed: f32, width: f32) -> usize {
    for obstacle in obstacles.iter_mut() {
        obstacle.x -= scroll_speed;
    }

    let before = obstacles.len();
    obstacles.retain(|o| o.trailing_edge(width) >= 0.0);
    before - obstacles.len()
}

/// Drift clouds left; a cloud fully off the left edge re-enters on the right
/// at a fresh height
pub fn drift_background<R: Rng>(
    elements: &mut [BackgroundElement],
    config: &GameConfig,
    rng: &mut R,
) {
    for element in elements.iter_mut() {
        element.pos.x -= element.drift_speed;
        if element.pos.x + element.size.x < 0.0 {
            element.pos.x = config.playfield.width;
            element.pos.y = random_background_y(&config.background, rng);
        }
    }
}
