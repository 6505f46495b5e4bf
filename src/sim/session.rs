//! Session controller
//!
//! Owns the actor, the live obstacles, the background and score/level, and
//! runs one fixed-timestep tick at a time:
//! flap signal -> integrate -> spawn -> collision & scoring.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{check_termination, mark_passed};
use super::difficulty::{DifficultyParameters, compute_difficulty, level_for_score};
use super::physics::{apply_flap, drift_background, integrate_actor, scroll_obstacles};
use super::spawn::{ObstacleGenerator, background_layout};
use super::state::{ActorState, BackgroundElement, GameEvent, Obstacle, SessionPhase, Snapshot};
use crate::tuning::{ConfigError, GameConfig};

/// Receives session notifications synchronously, on the ticking thread
pub trait SessionObserver {
    fn on_score_changed(&mut self, _score: u32) {}
    fn on_level_changed(&mut self, _level: u32) {}
    /// Fired exactly once per session
    fn on_session_ended(&mut self, _final_score: u32, _final_level: u32) {}
}

/// Observer that queues events for consumers that poll
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all events recorded so far
    pub fn drain(&self) -> Vec<GameEvent> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }

    fn push(&self, event: GameEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl SessionObserver for EventRecorder {
    fn on_score_changed(&mut self, score: u32) {
        self.push(GameEvent::ScoreChanged(score));
    }

    fn on_level_changed(&mut self, level: u32) {
        self.push(GameEvent::LevelChanged(level));
    }

    fn on_session_ended(&mut self, final_score: u32, final_level: u32) {
        self.push(GameEvent::SessionEnded {
            final_score,
            final_level,
        });
    }
}

/// Lock-free flap request that can be raised from any thread.
///
/// The session consumes it at the start of its next running tick, before
/// velocity is read. Repeated raises before that tick collapse into one.
#[derive(Debug, Clone, Default)]
pub struct FlapSignal(Arc<AtomicBool>);

impl FlapSignal {
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Result of a single [`Session::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed
    Idle,
    /// Still running
    Continued,
    /// This tick ended the session
    Ended { final_score: u32, final_level: u32 },
}

/// One game session, reusable across restarts
pub struct Session<R = Pcg32> {
    config: GameConfig,
    rng: R,
    /// Seed for the initial cloud layout, fixed per session instance
    layout_seed: u64,
    phase: SessionPhase,
    tick_count: u64,
    actor: ActorState,
    obstacles: Vec<Obstacle>,
    background: Vec<BackgroundElement>,
    generator: ObstacleGenerator,
    score: u32,
    level: u32,
    difficulty: DifficultyParameters,
    flap_signal: FlapSignal,
    observers: Vec<Box<dyn SessionObserver + Send>>,
}

impl Session<Pcg32> {
    /// Create a session with an entropy-seeded random source
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = Pcg32::from_rng(&mut rand::rng());
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Session<R> {
    /// Create a session with an injected random source.
    ///
    /// Fails if the config does not validate; a session never ticks against
    /// an inconsistent config.
    pub fn with_rng(config: GameConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let layout_seed = rng.next_u64();
        let actor = ActorState::new(config.actor.start_y);
        let difficulty = compute_difficulty(&config.difficulty, 1);
        let background = background_layout(&config, &mut Pcg32::seed_from_u64(layout_seed));

        Ok(Self {
            config,
            rng,
            layout_seed,
            phase: SessionPhase::NotStarted,
            tick_count: 0,
            actor,
            obstacles: Vec::new(),
            background,
            generator: ObstacleGenerator::new(),
            score: 0,
            level: 1,
            difficulty,
            flap_signal: FlapSignal::default(),
            observers: Vec::new(),
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver + Send>) {
        self.observers.push(observer);
    }

    /// Handle for raising flaps from another thread or input callback
    pub fn flap_signal(&self) -> FlapSignal {
        self.flap_signal.clone()
    }

    /// Reset everything and enter Running. Valid from any phase.
    pub fn start(&mut self) {
        self.score = 0;
        self.level = 1;
        self.difficulty = compute_difficulty(&self.config.difficulty, 1);
        self.tick_count = 0;
        self.actor = ActorState::new(self.config.actor.start_y);
        self.obstacles.clear();
        self.background =
            background_layout(&self.config, &mut Pcg32::seed_from_u64(self.layout_seed));
        self.generator.reset();
        self.flap_signal.clear();
        self.phase = SessionPhase::Running;

        log::info!(
            "Session started: gap={} speed={} spawn={}ms",
            self.difficulty.gate_gap,
            self.difficulty.scroll_speed,
            self.difficulty.spawn_interval_ms
        );
    }

    /// Apply the upward impulse now. Ignored unless Running.
    pub fn flap(&mut self) {
        if self.phase == SessionPhase::Running {
            apply_flap(&mut self.actor, &self.config.physics);
        }
    }

    /// Advance the simulation by one nominal frame
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Running {
            return TickOutcome::Idle;
        }

        if self.flap_signal.take() {
            apply_flap(&mut self.actor, &self.config.physics);
        }

        self.tick_count += 1;

        integrate_actor(&mut self.actor, &self.config.physics);
        let removed = scroll_obstacles(
            &mut self.obstacles,
            self.difficulty.scroll_speed,
            self.config.obstacles.width,
        );
        if removed > 0 {
            log::debug!("Removed {} obstacle(s) off the left edge", removed);
        }
        drift_background(&mut self.background, &self.config, &mut self.rng);

        self.generator.tick(
            &mut self.obstacles,
            &self.difficulty,
            &self.config,
            &mut self.rng,
        );

        log::trace!(
            "tick {}: y={:.2} v={:.2} tilt={:.1} obstacles={}",
            self.tick_count,
            self.actor.y,
            self.actor.velocity,
            self.actor.tilt,
            self.obstacles.len()
        );

        let termination = check_termination(&self.actor, &self.obstacles, &self.config);

        let passed = mark_passed(&mut self.obstacles, &self.config);
        for _ in 0..passed {
            self.increment_score();
        }

        if let Some(reason) = termination {
            self.phase = SessionPhase::Ended;
            log::info!(
                "Session ended at tick {} ({:?}): score={} level={}",
                self.tick_count,
                reason,
                self.score,
                self.level
            );
            let (final_score, final_level) = (self.score, self.level);
            for observer in &mut self.observers {
                observer.on_session_ended(final_score, final_level);
            }
            return TickOutcome::Ended {
                final_score,
                final_level,
            };
        }

        TickOutcome::Continued
    }

    /// One point, then a level recompute visible to the next tick
    fn increment_score(&mut self) {
        self.score += 1;
        for observer in &mut self.observers {
            observer.on_score_changed(self.score);
        }

        let level = level_for_score(&self.config.difficulty, self.score);
        if level != self.level {
            self.level = level;
            self.difficulty = compute_difficulty(&self.config.difficulty, level);
            log::info!(
                "Level {}: gap={} speed={} spawn={}ms",
                level,
                self.difficulty.gate_gap,
                self.difficulty.scroll_speed,
                self.difficulty.spawn_interval_ms
            );
            for observer in &mut self.observers {
                observer.on_level_changed(level);
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            tick: self.tick_count,
            actor: self.actor,
            obstacles: self.obstacles.clone(),
            background: self.background.clone(),
            score: self.score,
            level: self.level,
            difficulty: self.difficulty,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn difficulty(&self) -> DifficultyParameters {
        self.difficulty
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn actor(&self) -> &ActorState {
        &self.actor
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Place an obstacle directly, bypassing the generator
    #[cfg(test)]
    pub(crate) fn push_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
        self.level = level_for_score(&self.config.difficulty, score);
        self.difficulty = compute_difficulty(&self.config.difficulty, self.level);
    }
}

impl<R> std::fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("tick_count", &self.tick_count)
            .field("score", &self.score)
            .field("level", &self.level)
            .field("obstacles", &self.obstacles.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleId;

    fn seeded(seed: u64) -> Session {
        Session::with_rng(GameConfig::default(), Pcg32::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_new_session_not_started() {
        let mut session = seeded(1);
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.tick_count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GameConfig::default();
        config.playfield.height = 200.0;
        config.actor.start_y = 10.0;
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn test_start_resets_state() {
        let mut session = seeded(2);
        session.start();
        for _ in 0..10 {
            session.tick();
        }
        session.start();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Running);
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.level, 1);
        assert!(snapshot.obstacles.is_empty());
        let start_y = session.config().actor.start_y;
        assert_eq!(snapshot.actor, ActorState::new(start_y));
    }

    #[test]
    fn test_start_twice_is_idempotent() {
        let mut session = seeded(3);
        session.start();
        let first = session.snapshot();
        session.start();
        assert_eq!(session.snapshot(), first);
    }

    #[test]
    fn test_flap_ignored_unless_running() {
        let mut session = seeded(4);
        session.flap();
        assert_eq!(session.actor().velocity, 0.0);

        session.start();
        session.flap();
        let flap_velocity = session.config().physics.flap_velocity;
        assert_eq!(session.actor().velocity, flap_velocity);
    }

    #[test]
    fn test_flap_signal_applied_before_integration() {
        let mut session = seeded(5);
        session.start();
        let signal = session.flap_signal();
        signal.raise();
        signal.raise();
        session.tick();
        let physics = session.config().physics.clone();
        let expected = physics.flap_velocity + physics.gravity;
        assert_eq!(session.actor().velocity, expected);

        // Consumed: next tick only has gravity
        session.tick();
        assert_eq!(
            session.actor().velocity,
            physics.flap_velocity + 2.0 * physics.gravity
        );
    }

    #[test]
    fn test_stale_flap_signal_cleared_by_start() {
        let mut session = seeded(6);
        session.flap_signal().raise();
        session.start();
        session.tick();
        assert_eq!(session.actor().velocity, session.config().physics.gravity);
    }

    #[test]
    fn test_passing_obstacle_scores() {
        let mut session = seeded(7);
        session.start();
        let config = session.config().clone();
        // Trailing edge one step short of passing the actor
        session.push_obstacle(Obstacle {
            id: ObstacleId(1000),
            x: config.actor.x - config.obstacles.width + 1.0,
            gap_top: 150.0,
            gap: 300.0,
            passed: false,
        });
        assert_eq!(session.tick(), TickOutcome::Continued);
        assert_eq!(session.score(), 1);
        assert!(session.obstacles()[0].passed);

        session.tick();
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_level_up_refreshes_difficulty() {
        let mut session = seeded(8);
        session.start();
        session.set_score(4);
        let config = session.config().clone();
        session.push_obstacle(Obstacle {
            id: ObstacleId(1000),
            x: config.actor.x - config.obstacles.width + 1.0,
            gap_top: 150.0,
            gap: 300.0,
            passed: false,
        });
        session.tick();
        assert_eq!(session.score(), 5);
        assert_eq!(session.level(), 2);
        assert_eq!(
            session.difficulty(),
            compute_difficulty(&config.difficulty, 2)
        );
        // Already spawned obstacle keeps its gap
        assert_eq!(session.obstacles()[0].gap, 300.0);
    }

    #[test]
    fn test_ended_session_stays_ended() {
        let mut session = seeded(9);
        session.start();
        let mut outcome = TickOutcome::Continued;
        while outcome == TickOutcome::Continued {
            outcome = session.tick();
        }
        assert!(matches!(outcome, TickOutcome::Ended { .. }));
        assert_eq!(session.phase(), SessionPhase::Ended);

        let ticks = session.tick_count();
        let before = session.snapshot();
        session.flap();
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.tick_count(), ticks);
        assert_eq!(session.snapshot(), before);

        session.start();
        assert_eq!(session.phase(), SessionPhase::Running);
    }
}
