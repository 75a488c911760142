//! Game state and core simulation types
//!
//! Everything a run needs lives here. The RNG is held by the engine, not the
//! state, so two states can be compared directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start command
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended on a collision
    Over,
}

/// The player-controlled runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Discrete lane index; changes immediately on input
    pub lane: u8,
    /// Box centre; x eases toward the lane centre, y follows the jump arc
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (negative is up)
    pub vy: f32,
    pub airborne: bool,
}

impl Player {
    /// A grounded player centred in the start lane
    pub fn new(tuning: &Tuning) -> Self {
        let lane = tuning.start_lane();
        Self {
            lane,
            pos: Vec2::new(tuning.lane_center(lane), tuning.ground_y()),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            vy: 0.0,
            airborne: false,
        }
    }

    /// Full sprite box
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Sprite box shrunk by the tuning insets; used for every overlap test
    pub fn hitbox(&self, tuning: &Tuning) -> Aabb {
        self.bounds().inset(&tuning.hitbox_inset)
    }
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Full-height block
    Block,
    /// Flat hazard on the ground ("rug")
    LowHazard,
}

impl ObstacleKind {
    pub fn height(self, tuning: &Tuning) -> f32 {
        match self {
            ObstacleKind::Block => tuning.block_height,
            ObstacleKind::LowHazard => tuning.hazard_height,
        }
    }
}

/// A hazard scrolling toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub lane: u8,
    pub pos: Vec2,
    pub size: Vec2,
    /// Set once the obstacle has scrolled past the player
    pub passed: bool,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// A coin pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub lane: u8,
    pub pos: Vec2,
    pub size: Vec2,
    /// Collected coins stay in the list until pruned but no longer score or draw
    pub collected: bool,
}

impl Collectible {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// Notable things that happened during the last step or input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    LaneChanged { lane: u8 },
    Jumped,
    Landed,
    ObstacleSpawned { id: u32, lane: u8, kind: ObstacleKind },
    CollectibleSpawned { id: u32, lane: u8 },
    CoinCollected { id: u32 },
    Crashed { obstacle_id: u32 },
}

/// Events kept for a host that is not draining them; older ones are dropped
pub const MAX_BUFFERED_EVENTS: usize = 64;

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub player: Player,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Active collectibles in spawn order
    pub collectibles: Vec<Collectible>,
    /// Scroll speed (units/tick); never decreases within a run
    pub speed: f32,
    /// Ticks since run start
    pub frame: u64,
    /// Fractional score; reported floored
    pub score: f64,
    pub coins: u32,
    pub obstacles_passed: u32,
    /// Events since the host last drained them, newest last, at most
    /// [`MAX_BUFFERED_EVENTS`] (not part of the run itself)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// A fresh state waiting for the start command
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::NotStarted,
            player: Player::new(tuning),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            speed: tuning.initial_speed,
            frame: 0,
            score: 0.0,
            coins: 0,
            obstacles_passed: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reset everything for a new run and enter `Running`
    pub fn reset_for_run(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
        self.phase = GamePhase::Running;
        self.record(GameEvent::RunStarted);
    }

    /// Buffer an event for the host, dropping the oldest past the cap
    pub fn record(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_BUFFERED_EVENTS {
            let excess = self.events.len() + 1 - MAX_BUFFERED_EVENTS;
            self.events.drain(..excess);
        }
        self.events.push(event);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Score as reported to the player and the chain
    #[inline]
    pub fn display_score(&self) -> u64 {
        self.score.floor() as u64
    }
}
