//! Data-driven game balance
//!
//! Every constant the simulation reads lives here. Defaults reproduce the
//! shipped game; hosts may override any subset from JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::lane_center;

/// Per-side shrinkage applied to the player's sprite box before collision tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Insets {
    fn default() -> Self {
        Self {
            left: HITBOX_INSET_X,
            right: HITBOX_INSET_X,
            top: HITBOX_INSET_TOP,
            bottom: HITBOX_INSET_BOTTOM,
        }
    }
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub lane_count: u8,
    pub lane_width: f32,
    pub world_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Distance from the bottom of the world to the player's resting centre
    pub ground_offset: f32,
    pub lane_smoothing: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub hitbox_inset: Insets,

    // === Difficulty ===
    pub initial_speed: f32,
    pub speed_increment: f32,
    /// Speed ceiling; `None` lets difficulty climb forever
    pub max_speed: Option<f32>,
    pub spawn_base_interval: u32,
    pub spawn_min_interval: u32,
    pub spawn_speed_factor: f32,

    // === Entities ===
    pub obstacle_width: f32,
    pub block_height: f32,
    pub hazard_height: f32,
    pub obstacle_spawn_y: f32,
    pub coin_size: f32,
    pub coin_spawn_y: f32,
    pub coin_chance: f64,
    pub despawn_margin: f32,

    // === Scoring ===
    pub coin_bonus: f64,
    pub distance_score_factor: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_count: LANE_COUNT,
            lane_width: LANE_WIDTH,
            world_height: WORLD_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            ground_offset: GROUND_OFFSET,
            lane_smoothing: LANE_SMOOTHING,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            hitbox_inset: Insets::default(),

            initial_speed: INITIAL_SPEED,
            speed_increment: SPEED_INCREMENT,
            max_speed: None,
            spawn_base_interval: SPAWN_BASE_INTERVAL,
            spawn_min_interval: SPAWN_MIN_INTERVAL,
            spawn_speed_factor: SPAWN_SPEED_FACTOR,

            obstacle_width: OBSTACLE_WIDTH,
            block_height: BLOCK_HEIGHT,
            hazard_height: HAZARD_HEIGHT,
            obstacle_spawn_y: OBSTACLE_SPAWN_Y,
            coin_size: COIN_SIZE,
            coin_spawn_y: COIN_SPAWN_Y,
            coin_chance: COIN_CHANCE,
            despawn_margin: DESPAWN_MARGIN,

            coin_bonus: COIN_BONUS,
            distance_score_factor: DISTANCE_SCORE_FACTOR,
        }
    }
}

/// Why a tuning override was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    Parse(String),
    TooFewLanes { lane_count: u8 },
    NonPositive { field: &'static str, value: f32 },
    Negative { field: &'static str, value: f64 },
    ProbabilityOutOfRange { field: &'static str, value: f64 },
    SpawnBoundsInverted { min: u32, base: u32 },
    SpeedCeilingBelowStart { max_speed: f32, initial_speed: f32 },
    JumpNotUpward { jump_impulse: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid tuning json: {msg}"),
            Self::TooFewLanes { lane_count } => {
                write!(f, "need at least 2 lanes, got {lane_count}")
            }
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::ProbabilityOutOfRange { field, value } => {
                write!(f, "{field} must be within [0, 1], got {value}")
            }
            Self::SpawnBoundsInverted { min, base } => write!(
                f,
                "spawn_min_interval ({min}) must be in 1..=spawn_base_interval ({base})"
            ),
            Self::SpeedCeilingBelowStart {
                max_speed,
                initial_speed,
            } => write!(
                f,
                "max_speed ({max_speed}) is below initial_speed ({initial_speed})"
            ),
            Self::JumpNotUpward { jump_impulse } => {
                write!(f, "jump_impulse must be negative (upward), got {jump_impulse}")
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the simulation can run with these values
    pub fn validate(&self) -> Result<(), TuningError> {
        // The coin lane must differ from the obstacle lane
        if self.lane_count < 2 {
            return Err(TuningError::TooFewLanes {
                lane_count: self.lane_count,
            });
        }

        let positives = [
            ("lane_width", self.lane_width),
            ("world_height", self.world_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("gravity", self.gravity),
            ("initial_speed", self.initial_speed),
            ("obstacle_width", self.obstacle_width),
            ("block_height", self.block_height),
            ("hazard_height", self.hazard_height),
            ("coin_size", self.coin_size),
        ];
        for (field, value) in positives {
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        // Speed and score only ever grow within a run
        let non_negatives = [
            ("speed_increment", self.speed_increment as f64),
            ("coin_bonus", self.coin_bonus),
            ("distance_score_factor", self.distance_score_factor),
        ];
        for (field, value) in non_negatives {
            if !(value >= 0.0) {
                return Err(TuningError::Negative { field, value });
            }
        }

        if !(self.lane_smoothing > 0.0 && self.lane_smoothing <= 1.0) {
            return Err(TuningError::ProbabilityOutOfRange {
                field: "lane_smoothing",
                value: self.lane_smoothing as f64,
            });
        }
        if !(0.0..=1.0).contains(&self.coin_chance) {
            return Err(TuningError::ProbabilityOutOfRange {
                field: "coin_chance",
                value: self.coin_chance,
            });
        }

        if self.spawn_min_interval == 0 || self.spawn_min_interval > self.spawn_base_interval {
            return Err(TuningError::SpawnBoundsInverted {
                min: self.spawn_min_interval,
                base: self.spawn_base_interval,
            });
        }

        if let Some(max_speed) = self.max_speed {
            if max_speed < self.initial_speed {
                return Err(TuningError::SpeedCeilingBelowStart {
                    max_speed,
                    initial_speed: self.initial_speed,
                });
            }
        }

        if !(self.jump_impulse < 0.0) {
            return Err(TuningError::JumpNotUpward {
                jump_impulse: self.jump_impulse,
            });
        }

        Ok(())
    }

    /// Lane the player starts in
    #[inline]
    pub fn start_lane(&self) -> u8 {
        self.lane_count / 2
    }

    /// Resting y of the player's centre
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.world_height - self.ground_offset
    }

    /// Total width of the playfield
    #[inline]
    pub fn world_width(&self) -> f32 {
        self.lane_width * self.lane_count as f32
    }

    #[inline]
    pub fn lane_center(&self, lane: u8) -> f32 {
        lane_center(lane, self.lane_width)
    }

    /// Entities below this y are pruned
    #[inline]
    pub fn despawn_y(&self) -> f32 {
        self.world_height + self.despawn_margin
    }

    /// Ticks between spawn events at the given speed
    pub fn spawn_interval(&self, speed: f32) -> u32 {
        let shrink = (speed * self.spawn_speed_factor).floor().max(0.0) as u32;
        self.spawn_base_interval
            .saturating_sub(shrink)
            .max(self.spawn_min_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.start_lane(), 1);
        assert_eq!(tuning.ground_y(), 500.0);
        assert_eq!(tuning.world_width(), 300.0);
        assert_eq!(tuning.despawn_y(), 700.0);
    }

    #[test]
    fn test_spawn_interval_shrinks_with_speed() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_interval(5.0), 90);
        assert_eq!(tuning.spawn_interval(5.4), 90);
        assert_eq!(tuning.spawn_interval(5.5), 89);
        assert_eq!(tuning.spawn_interval(20.0), 60);
        // Floored at the minimum
        assert_eq!(tuning.spawn_interval(100.0), 30);
    }

    #[test]
    fn test_partial_json_override() {
        let tuning = Tuning::from_json(r#"{ "max_speed": 12.0, "coin_chance": 0.5 }"#).unwrap();
        assert_eq!(tuning.max_speed, Some(12.0));
        assert_eq!(tuning.coin_chance, 0.5);
        assert_eq!(tuning.lane_count, 3);
        assert_eq!(tuning.hitbox_inset, Insets::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "lane_count": 1 }"#),
            Err(TuningError::TooFewLanes { lane_count: 1 })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "coin_chance": 1.5 }"#),
            Err(TuningError::ProbabilityOutOfRange { field: "coin_chance", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "spawn_min_interval": 200 }"#),
            Err(TuningError::SpawnBoundsInverted { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "max_speed": 1.0 }"#),
            Err(TuningError::SpeedCeilingBelowStart { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "jump_impulse": 4.0 }"#),
            Err(TuningError::JumpNotUpward { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "speed_increment": -0.5 }"#),
            Err(TuningError::Negative { field: "speed_increment", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "coin_bonus": -50.0 }"#),
            Err(TuningError::Negative { field: "coin_bonus", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "distance_score_factor": -1.0 }"#),
            Err(TuningError::Negative { field: "distance_score_factor", .. })
        ));
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_round_trips_through_json() {
        let tuning = Tuning {
            max_speed: Some(9.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&tuning).unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }
}
