//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed nominal timestep (frame-coupled, never wall-clock corrected)
//! - Injectable RNG for gate placement and cloud drift
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod physics;
pub mod session;
pub mod spawn;
pub mod state;

pub use collision::{Aabb, Termination, check_termination, mark_passed};
pub use difficulty::{DifficultyParameters, compute_difficulty, level_for_score};
pub use session::{EventRecorder, FlapSignal, Session, SessionObserver, TickOutcome};
pub use spawn::ObstacleGenerator;
pub use state::{
    ActorState, BackgroundElement, GameEvent, Obstacle, ObstacleId, SessionPhase, Snapshot,
};
