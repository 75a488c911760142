//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Injected RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod engine;
pub mod input;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, first_overlap};
pub use engine::{Engine, Snapshot};
pub use input::{Action, apply_action};
pub use state::{
    Collectible, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Player,
};
pub use tick::tick;
