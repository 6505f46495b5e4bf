//! Idle/demo mode controller
//!
//! Flaps whenever the actor sinks into the lower part of the next gate.
//! Good enough to clear dozens of gates at the default tuning; it does not
//! plan ahead for very narrow late-game gaps.

use super::state::{SessionPhase, Snapshot};
use crate::tuning::GameConfig;

/// How far above the gate's bottom edge the actor is allowed to sink
const FLAP_MARGIN: f32 = 12.0;

/// Decide whether to flap this frame
pub fn should_flap(snapshot: &Snapshot, config: &GameConfig) -> bool {
    if snapshot.phase != SessionPhase::Running {
        return false;
    }
    // Let the previous flap play out
    if snapshot.actor.velocity < 0.0 {
        return false;
    }

    let width = config.obstacles.width;
    let centre_bottom = (config.playfield.height + snapshot.difficulty.gate_gap) / 2.0;
    let gap_bottom = snapshot
        .obstacles
        .iter()
        .find(|o| o.trailing_edge(width) >= config.actor.x)
        .map(|o| o.gap_bottom())
        .unwrap_or(centre_bottom);

    snapshot.actor.y + config.actor.height > gap_bottom - FLAP_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::compute_difficulty;
    use crate::sim::state::{ActorState, Obstacle, ObstacleId};

    fn snapshot(actor: ActorState, obstacles: Vec<Obstacle>) -> Snapshot {
        let config = GameConfig::default();
        Snapshot {
            phase: SessionPhase::Running,
            tick: 0,
            actor,
            obstacles,
            background: Vec::new(),
            score: 0,
            level: 1,
            difficulty: compute_difficulty(&config.difficulty, 1),
        }
    }

    fn falling(y: f32) -> ActorState {
        ActorState {
            y,
            velocity: 1.0,
            tilt: 5.0,
        }
    }

    #[test]
    fn test_flaps_below_gate() {
        let config = GameConfig::default();
        let gate = Obstacle {
            id: ObstacleId(0),
            x: 400.0,
            gap_top: 100.0,
            gap: 200.0,
            passed: false,
        };
        // Bottom edge at 300 > 300 - margin
        let low = snapshot(falling(260.0), vec![gate.clone()]);
        assert!(should_flap(&low, &config));
        assert!(!should_flap(&snapshot(falling(150.0), vec![gate]), &config));
    }

    #[test]
    fn test_ignores_gates_already_behind() {
        let config = GameConfig::default();
        let behind = Obstacle {
            id: ObstacleId(0),
            x: 0.0,
            gap_top: 400.0,
            gap: 150.0,
            passed: true,
        };
        // Falls back to the playfield centre band: bottom at 400
        let high = snapshot(falling(300.0), vec![behind.clone()]);
        assert!(!should_flap(&high, &config));
        let low = snapshot(falling(360.0), vec![behind]);
        assert!(should_flap(&low, &config));
    }

    #[test]
    fn test_no_flap_while_rising_or_stopped() {
        let config = GameConfig::default();
        let mut rising = falling(500.0);
        rising.velocity = -3.0;
        assert!(!should_flap(&snapshot(rising, Vec::new()), &config));

        let mut ended = snapshot(falling(500.0), Vec::new());
        ended.phase = SessionPhase::Ended;
        assert!(!should_flap(&ended, &config));
    }
}
