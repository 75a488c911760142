//! Procedural obstacle and coin generation
//!
//! Draw order from the RNG is fixed (lane, kind, coin roll, coin lane) so a
//! seed always produces the same course.

use glam::Vec2;
use rand::Rng;

use super::state::{Collectible, GameEvent, GameState, Obstacle, ObstacleKind};
use crate::tuning::Tuning;

/// Whether this frame is a spawn frame at the current speed
pub fn is_spawn_frame(frame: u64, speed: f32, tuning: &Tuning) -> bool {
    let interval = tuning.spawn_interval(speed) as u64;
    frame % interval == 0
}

/// Lane for a coin rolled alongside an obstacle; never the obstacle's lane
pub fn coin_lane(rolled: u8, obstacle_lane: u8, lane_count: u8) -> u8 {
    if rolled == obstacle_lane {
        (obstacle_lane + 1) % lane_count
    } else {
        rolled
    }
}

/// Spawn one obstacle above the screen, and maybe a coin in another lane
pub fn spawn_obstacle<R: Rng + ?Sized>(state: &mut GameState, tuning: &Tuning, rng: &mut R) {
    let lane = rng.random_range(0..tuning.lane_count);
    let kind = if rng.random_bool(0.5) {
        ObstacleKind::Block
    } else {
        ObstacleKind::LowHazard
    };

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        kind,
        lane,
        pos: Vec2::new(tuning.lane_center(lane), tuning.obstacle_spawn_y),
        size: Vec2::new(tuning.obstacle_width, kind.height(tuning)),
        passed: false,
    });
    state.record(GameEvent::ObstacleSpawned { id, lane, kind });
    log::debug!(
        "frame {}: spawned {:?} #{} in lane {}",
        state.frame,
        kind,
        id,
        lane
    );

    if rng.random_bool(tuning.coin_chance) {
        let rolled = rng.random_range(0..tuning.lane_count);
        let lane = coin_lane(rolled, lane, tuning.lane_count);
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            lane,
            pos: Vec2::new(tuning.lane_center(lane), tuning.coin_spawn_y),
            size: Vec2::splat(tuning.coin_size),
            collected: false,
        });
        state.record(GameEvent::CollectibleSpawned { id, lane });
    }
}
