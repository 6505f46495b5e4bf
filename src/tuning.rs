//! Data-driven game balance
//!
//! Every value has a default matching [`crate::consts`], so a JSON file only
//! needs to name what it overrides. A config must pass [`GameConfig::validate`]
//! before a session will run against it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::difficulty::compute_difficulty;

/// Fatal configuration problems, caught before any tick runs
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} range is empty or inverted: [{min}, {max}]")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("actor box does not fit inside the playable area")]
    ActorOutOfBounds,
    #[error(
        "level {level}: gate gap {gap} needs {required} of playfield height but only {height} is available"
    )]
    GateDoesNotFit {
        level: u32,
        gap: f32,
        required: f32,
        height: f32,
    },
}

/// Playfield geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
    /// Ground band at the bottom; touching it ends the session
    pub ground_height: f32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            ground_height: GROUND_HEIGHT,
        }
    }
}

impl PlayfieldConfig {
    /// Lowest y the actor box may reach
    pub fn floor(&self) -> f32 {
        self.height - self.ground_height
    }
}

/// Actor hit box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Left edge of the box (fixed for the whole session)
    pub x: f32,
    /// Top edge at session start
    pub start_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            x: ACTOR_X,
            start_y: ACTOR_START_Y,
            width: ACTOR_SIZE,
            height: ACTOR_SIZE,
        }
    }
}

/// Vertical motion and tilt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub flap_velocity: f32,
    pub rotation_factor: f32,
    pub min_tilt: f32,
    pub max_tilt: f32,
    /// Nominal tick length fed to the spawn timer
    pub tick_ms: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            flap_velocity: FLAP_VELOCITY,
            rotation_factor: ROTATION_FACTOR,
            min_tilt: MIN_TILT,
            max_tilt: MAX_TILT,
            tick_ms: TICK_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub width: f32,
    pub min_segment_height: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            width: OBSTACLE_WIDTH,
            min_segment_height: MIN_SEGMENT_HEIGHT,
        }
    }
}

/// Level progression and per-level scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub gap_base: f32,
    pub gap_step: f32,
    pub gap_min: f32,
    pub speed_base: f32,
    pub speed_step: f32,
    pub speed_max: f32,
    pub spawn_base_ms: f32,
    pub spawn_step_ms: f32,
    pub spawn_min_ms: f32,
    pub max_level: u32,
    pub score_per_level: u32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            gap_base: GAP_BASE,
            gap_step: GAP_STEP,
            gap_min: GAP_MIN,
            speed_base: SPEED_BASE,
            speed_step: SPEED_STEP,
            speed_max: SPEED_MAX,
            spawn_base_ms: SPAWN_BASE_MS,
            spawn_step_ms: SPAWN_STEP_MS,
            spawn_min_ms: SPAWN_MIN_MS,
            max_level: MAX_LEVEL,
            score_per_level: SCORE_PER_LEVEL,
        }
    }
}

/// Decorative clouds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub count: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub styles: u8,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            count: BACKGROUND_COUNT,
            min_speed: BACKGROUND_MIN_SPEED,
            max_speed: BACKGROUND_MAX_SPEED,
            min_y: BACKGROUND_MIN_Y,
            max_y: BACKGROUND_MAX_Y,
            min_width: BACKGROUND_MIN_WIDTH,
            max_width: BACKGROUND_MAX_WIDTH,
            min_height: BACKGROUND_MIN_HEIGHT,
            max_height: BACKGROUND_MAX_HEIGHT,
            styles: BACKGROUND_STYLES,
        }
    }
}

/// Complete game tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield: PlayfieldConfig,
    pub actor: ActorConfig,
    pub physics: PhysicsConfig,
    pub obstacles: ObstacleConfig,
    pub difficulty: DifficultyConfig,
    pub background: BackgroundConfig,
}

impl GameConfig {
    /// Parse a (possibly partial) JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check every invariant the simulation relies on.
    ///
    /// A tier whose gate cannot fit is rejected here rather than discovered
    /// mid-session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pf = &self.playfield;
        positive("playfield.width", pf.width)?;
        positive("playfield.height", pf.height)?;
        non_negative("playfield.ground_height", pf.ground_height)?;
        if pf.ground_height >= pf.height {
            return Err(ConfigError::InvalidRange {
                field: "playfield.ground_height",
                min: pf.ground_height as f64,
                max: pf.height as f64,
            });
        }

        let actor = &self.actor;
        positive("actor.width", actor.width)?;
        positive("actor.height", actor.height)?;
        if !actor.x.is_finite()
            || !actor.start_y.is_finite()
            || actor.x < 0.0
            || actor.x + actor.width > pf.width
            || actor.start_y < 0.0
            || actor.start_y + actor.height > pf.floor()
        {
            return Err(ConfigError::ActorOutOfBounds);
        }

        let phys = &self.physics;
        non_negative("physics.gravity", phys.gravity)?;
        finite("physics.flap_velocity", phys.flap_velocity)?;
        finite("physics.rotation_factor", phys.rotation_factor)?;
        positive("physics.tick_ms", phys.tick_ms)?;
        range("physics.tilt", phys.min_tilt, phys.max_tilt, true)?;

        positive("obstacles.width", self.obstacles.width)?;
        non_negative(
            "obstacles.min_segment_height",
            self.obstacles.min_segment_height,
        )?;

        let diff = &self.difficulty;
        if diff.max_level == 0 {
            return Err(ConfigError::NonPositive {
                field: "difficulty.max_level",
                value: 0.0,
            });
        }
        if diff.score_per_level == 0 {
            return Err(ConfigError::NonPositive {
                field: "difficulty.score_per_level",
                value: 0.0,
            });
        }
        positive("difficulty.gap_min", diff.gap_min)?;
        positive("difficulty.speed_base", diff.speed_base)?;
        positive("difficulty.spawn_min_ms", diff.spawn_min_ms)?;
        non_negative("difficulty.gap_step", diff.gap_step)?;
        non_negative("difficulty.speed_step", diff.speed_step)?;
        non_negative("difficulty.spawn_step_ms", diff.spawn_step_ms)?;
        range("difficulty.gap", diff.gap_min, diff.gap_base, true)?;
        range("difficulty.speed", diff.speed_base, diff.speed_max, true)?;
        range(
            "difficulty.spawn_ms",
            diff.spawn_min_ms,
            diff.spawn_base_ms,
            true,
        )?;

        // Steps are non-negative, so the widest gate is the level 1 one
        let gap = compute_difficulty(diff, 1).gate_gap;
        let required = gap + 2.0 * self.obstacles.min_segment_height + pf.ground_height;
        if required >= pf.height {
            return Err(ConfigError::GateDoesNotFit {
                level: 1,
                gap,
                required,
                height: pf.height,
            });
        }

        let bg = &self.background;
        if bg.count > 0 {
            if bg.styles == 0 {
                return Err(ConfigError::NonPositive {
                    field: "background.styles",
                    value: 0.0,
                });
            }
            non_negative("background.min_speed", bg.min_speed)?;
            range("background.speed", bg.min_speed, bg.max_speed, false)?;
            range("background.y", bg.min_y, bg.max_y, false)?;
            positive("background.min_width", bg.min_width)?;
            range("background.width", bg.min_width, bg.max_width, false)?;
            positive("background.min_height", bg.min_height)?;
            range("background.height", bg.min_height, bg.max_height, false)?;
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            field,
            value: value as f64,
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            field,
            value: value as f64,
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            field,
            value: value as f64,
        })
    }
}

/// `min <= max` when `allow_equal`, otherwise `min < max`
fn range(field: &'static str, min: f32, max: f32, allow_equal: bool) -> Result<(), ConfigError> {
    let ok = min.is_finite() && max.is_finite() && if allow_equal { min <= max } else { min < max };
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange {
            field,
            min: min as f64,
            max: max as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let config =
            GameConfig::from_json_str(r#"{ "difficulty": { "score_per_level": 3 } }"#).unwrap();
        assert_eq!(config.difficulty.score_per_level, 3);
        assert_eq!(config.difficulty.max_level, MAX_LEVEL);
        assert_eq!(config.playfield, PlayfieldConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_gate_too_big_for_playfield() {
        let mut config = GameConfig::default();
        // 200 + 2*50 + 20 = 320 >= 300
        config.playfield.height = 300.0;
        config.actor.start_y = 100.0;
        match config.validate() {
            Err(ConfigError::GateDoesNotFit { level, gap, .. }) => {
                assert_eq!(level, 1);
                assert_eq!(gap, 200.0);
            }
            other => panic!("expected GateDoesNotFit, got {other:?}"),
        }
    }

    #[test]
    fn test_huge_max_level_validates() {
        let mut config = GameConfig::default();
        config.difficulty.max_level = u32::MAX;
        assert!(config.validate().is_ok());

        config.playfield.height = 300.0;
        config.actor.start_y = 100.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GateDoesNotFit { level: 1, .. })
        ));
    }

    #[test]
    fn test_gate_that_exactly_fills_is_rejected() {
        let mut config = GameConfig::default();
        config.playfield.height = 320.0;
        config.actor.start_y = 100.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GateDoesNotFit { .. })
        ));
    }

    #[test]
    fn test_gate_fits_with_one_pixel_to_spare() {
        let mut config = GameConfig::default();
        config.difficulty.gap_step = 0.0;
        config.difficulty.gap_base = 400.0;
        config.difficulty.gap_min = 400.0;
        config.playfield.height = 520.0;
        config.actor.start_y = 200.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GateDoesNotFit { level: 1, .. })
        ));
        config.playfield.height = 521.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_score_per_level_rejected() {
        let mut config = GameConfig::default();
        config.difficulty.score_per_level = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "difficulty.score_per_level", .. })
        ));
    }

    #[test]
    fn test_inverted_tilt_rejected() {
        let mut config = GameConfig::default();
        config.physics.min_tilt = 10.0;
        config.physics.max_tilt = -10.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { field: "physics.tilt", .. })
        ));
    }

    #[test]
    fn test_actor_outside_playfield_rejected() {
        let mut config = GameConfig::default();
        config.actor.x = PLAYFIELD_WIDTH;
        assert!(matches!(config.validate(), Err(ConfigError::ActorOutOfBounds)));
    }

    #[test]
    fn test_nan_tick_rejected() {
        let mut config = GameConfig::default();
        config.physics.tick_ms = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_background_skips_range_checks() {
        let mut config = GameConfig::default();
        config.background.count = 0;
        config.background.min_y = 500.0;
        config.background.max_y = 10.0;
        assert!(config.validate().is_ok());
    }
}
