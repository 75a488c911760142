//! Street Run - A three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, run state)
//! - `tuning`: Data-driven game balance
//! - `renderer`: Snapshot to draw-command translation (Canvas 2D on the web)
//! - `platform`: Key mapping, input queue and frame loop driver
//! - `submit`: Final score submission boundary
//! - `autopilot`: Idle/demo mode player

pub mod autopilot;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod submit;
pub mod tuning;

pub use sim::{Action, Engine, GamePhase, Snapshot};
pub use submit::{ScoreReporter, ScoreSubmission, ScoreSubmitter, SubmitError};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
///
/// These are the defaults `Tuning::default()` is built from.
pub mod consts {
    /// Number of lanes
    pub const LANE_COUNT: u8 = 3;
    /// Width of one lane (world units)
    pub const LANE_WIDTH: f32 = 100.0;
    /// Visible world height; y grows downward
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Player sprite size
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    /// Distance from the bottom of the world to the player's resting centre
    pub const GROUND_OFFSET: f32 = 100.0;

    /// Fraction of the remaining distance to the lane centre covered per tick
    pub const LANE_SMOOTHING: f32 = 0.2;
    /// Downward acceleration while airborne (units/tick²)
    pub const GRAVITY: f32 = 0.6;
    /// Initial vertical velocity of a jump (negative is up)
    pub const JUMP_IMPULSE: f32 = -12.0;

    /// Scroll speed at run start (units/tick)
    pub const INITIAL_SPEED: f32 = 5.0;
    /// Speed added every tick
    pub const SPEED_INCREMENT: f32 = 0.002;

    /// Spawn interval before speed scaling (ticks)
    pub const SPAWN_BASE_INTERVAL: u32 = 100;
    /// Spawn interval floor (ticks)
    pub const SPAWN_MIN_INTERVAL: u32 = 30;
    /// Ticks removed from the spawn interval per unit of speed
    pub const SPAWN_SPEED_FACTOR: f32 = 2.0;

    /// Obstacle footprint
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const BLOCK_HEIGHT: f32 = 60.0;
    pub const HAZARD_HEIGHT: f32 = 20.0;
    pub const OBSTACLE_SPAWN_Y: f32 = -100.0;

    /// Collectible footprint
    pub const COIN_SIZE: f32 = 30.0;
    pub const COIN_SPAWN_Y: f32 = -150.0;
    /// Chance that an obstacle spawn also spawns a coin
    pub const COIN_CHANCE: f64 = 0.3;

    /// Score for a coin pickup
    pub const COIN_BONUS: f64 = 50.0;
    /// Score per unit of speed per tick
    pub const DISTANCE_SCORE_FACTOR: f64 = 0.1;

    /// Entities are pruned once below `WORLD_HEIGHT + DESPAWN_MARGIN`
    pub const DESPAWN_MARGIN: f32 = 100.0;

    /// Player hitbox inset per side
    pub const HITBOX_INSET_X: f32 = 10.0;
    pub const HITBOX_INSET_TOP: f32 = 10.0;
    pub const HITBOX_INSET_BOTTOM: f32 = 5.0;
}

/// Horizontal centre of a lane
#[inline]
pub fn lane_center(lane: u8, lane_width: f32) -> f32 {
    lane_width * (lane as f32 + 0.5)
}

/// Lane index one step to the left, clamped at 0
#[inline]
pub fn lane_left(lane: u8) -> u8 {
    lane.saturating_sub(1)
}

/// Lane index one step to the right, clamped at the last lane
#[inline]
pub fn lane_right(lane: u8, lane_count: u8) -> u8 {
    (lane + 1).min(lane_count.saturating_sub(1))
}
