//! Flappy Fun - a side-scrolling flap-through-the-gates game core
//!
//! Core modules:
//! - `sim`: Simulation (physics, obstacle spawning, collisions, scoring, session)
//! - `tuning`: Data-driven game balance and its startup validation
//! - `platform`: Native frame driver (tick scheduling, flap input, cancellation)
//!
//! Rendering, menus and high-score storage live outside this crate; they
//! consume [`sim::Snapshot`]s and [`sim::SessionObserver`] notifications.

pub mod platform;
pub mod sim;
pub mod tuning;

pub use sim::{Session, SessionObserver, SessionPhase, Snapshot, TickOutcome};
pub use tuning::{ConfigError, GameConfig};

/// Default game tuning constants
pub mod consts {
    /// Nominal tick length in milliseconds (one animation frame)
    pub const TICK_MS: f32 = 16.0;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    /// Ground band at the bottom of the playfield
    pub const GROUND_HEIGHT: f32 = 20.0;

    /// Actor hit box (square)
    pub const ACTOR_SIZE: f32 = 40.0;
    /// Left edge of the actor box. The sprite sits at width/4 and is 1.5x
    /// as wide as the box, which is centred inside it.
    pub const ACTOR_X: f32 = PLAYFIELD_WIDTH / 4.0 + (ACTOR_SIZE * 1.5 - ACTOR_SIZE) / 2.0;
    /// Initial top edge of the actor box (box centred on the playfield)
    pub const ACTOR_START_Y: f32 = PLAYFIELD_HEIGHT / 2.0 - ACTOR_SIZE / 2.0;

    /// Downward acceleration (pixels/tick²)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set by a flap (negative = upward)
    pub const FLAP_VELOCITY: f32 = -9.0;
    /// Tilt degrees per unit of vertical velocity
    pub const ROTATION_FACTOR: f32 = 5.0;
    pub const MIN_TILT: f32 = -30.0;
    pub const MAX_TILT: f32 = 45.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    /// Shortest allowed top or bottom segment
    pub const MIN_SEGMENT_HEIGHT: f32 = 50.0;

    /// Level 1 values and per-level scaling
    pub const GAP_BASE: f32 = 200.0;
    pub const GAP_STEP: f32 = 2.0;
    pub const GAP_MIN: f32 = 120.0;
    pub const SPEED_BASE: f32 = 3.0;
    pub const SPEED_STEP: f32 = 0.075;
    pub const SPEED_MAX: f32 = 7.0;
    pub const SPAWN_BASE_MS: f32 = 1800.0;
    pub const SPAWN_STEP_MS: f32 = 25.0;
    pub const SPAWN_MIN_MS: f32 = 900.0;

    pub const MAX_LEVEL: u32 = 50;
    /// Points needed to advance one level
    pub const SCORE_PER_LEVEL: u32 = 5;

    /// Decorative background (clouds)
    pub const BACKGROUND_COUNT: usize = 5;
    pub const BACKGROUND_MIN_SPEED: f32 = 0.5;
    pub const BACKGROUND_MAX_SPEED: f32 = 1.5;
    pub const BACKGROUND_MIN_Y: f32 = 20.0;
    pub const BACKGROUND_MAX_Y: f32 = PLAYFIELD_HEIGHT / 3.0;
    pub const BACKGROUND_MIN_WIDTH: f32 = 60.0;
    pub const BACKGROUND_MAX_WIDTH: f32 = 120.0;
    pub const BACKGROUND_MIN_HEIGHT: f32 = 30.0;
    pub const BACKGROUND_MAX_HEIGHT: f32 = 60.0;
    pub const BACKGROUND_STYLES: u8 = 3;
}
