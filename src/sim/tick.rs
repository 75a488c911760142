//! Fixed timestep simulation tick
//!
//! Core game loop that advances a running state by one frame. Stage order is
//! part of the game's feel: the player moves first, then the world, then
//! collisions are resolved against the new positions.

use rand::Rng;

use super::collision::first_overlap;
use super::spawn::{is_spawn_frame, spawn_obstacle};
use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// Advance the game state by one tick
///
/// Does nothing unless the run is `Running`. Returns true if a tick was
/// simulated.
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, tuning: &Tuning, rng: &mut R) -> bool {
    if state.phase != GamePhase::Running {
        log::trace!("tick ignored in {:?}", state.phase);
        return false;
    }

    move_player(state, tuning);

    state.frame += 1;
    if is_spawn_frame(state.frame, state.speed, tuning) {
        spawn_obstacle(state, tuning, rng);
    }

    ramp_speed(state, tuning);
    advance_entities(state, tuning);
    prune_offscreen(state, tuning);

    if check_crash(state, tuning) {
        return true;
    }

    collect_coins(state, tuning);

    // Distance score
    state.score += state.speed as f64 * tuning.distance_score_factor;

    true
}

/// Ease toward the lane centre, then integrate the jump arc
fn move_player(state: &mut GameState, tuning: &Tuning) {
    let ground_y = tuning.ground_y();
    let player = &mut state.player;

    let target_x = tuning.lane_center(player.lane);
    player.pos.x += (target_x - player.pos.x) * tuning.lane_smoothing;

    player.pos.y += player.vy;
    if player.pos.y < ground_y {
        player.vy += tuning.gravity;
    } else {
        player.pos.y = ground_y;
        player.vy = 0.0;
        if player.airborne {
            player.airborne = false;
            state.record(GameEvent::Landed);
        }
    }
}

fn ramp_speed(state: &mut GameState, tuning: &Tuning) {
    let mut speed = state.speed + tuning.speed_increment;
    if let Some(max_speed) = tuning.max_speed {
        speed = speed.min(max_speed).max(state.speed);
    }
    state.speed = speed;
}

/// Scroll everything down by the current speed; x is pinned to the lane
fn advance_entities(state: &mut GameState, tuning: &Tuning) {
    let speed = state.speed;
    let player_bottom = tuning.ground_y() + tuning.player_height / 2.0;

    for obstacle in &mut state.obstacles {
        obstacle.pos.y += speed;
        obstacle.pos.x = tuning.lane_center(obstacle.lane);

        if !obstacle.passed && obstacle.bounds().min.y > player_bottom {
            obstacle.passed = true;
            state.obstacles_passed += 1;
        }
    }

    for coin in &mut state.collectibles {
        coin.pos.y += speed;
        coin.pos.x = tuning.lane_center(coin.lane);
    }
}

fn prune_offscreen(state: &mut GameState, tuning: &Tuning) {
    let despawn_y = tuning.despawn_y();
    state.obstacles.retain(|o| o.pos.y < despawn_y);
    state.collectibles.retain(|c| c.pos.y < despawn_y);
}

/// End the run on the first obstacle touching the player's hitbox
fn check_crash(state: &mut GameState, tuning: &Tuning) -> bool {
    let hitbox = state.player.hitbox(tuning);
    let Some(index) = first_overlap(&hitbox, state.obstacles.iter().map(|o| o.bounds())) else {
        return false;
    };

    let obstacle_id = state.obstacles[index].id;
    state.phase = GamePhase::Over;
    state.record(GameEvent::Crashed { obstacle_id });
    log::info!(
        "Run over at frame {}: hit obstacle #{} (score {}, coins {})",
        state.frame,
        obstacle_id,
        state.display_score(),
        state.coins
    );
    true
}

fn collect_coins(state: &mut GameState, tuning: &Tuning) {
    let hitbox = state.player.hitbox(tuning);

    let mut picked = Vec::new();
    for coin in state.collectibles.iter_mut().filter(|c| !c.collected) {
        if hitbox.overlaps(&coin.bounds()) {
            coin.collected = true;
            picked.push(coin.id);
        }
    }

    for id in picked {
        state.coins += 1;
        state.score += tuning.coin_bonus;
        state.record(GameEvent::CoinCollected { id });
        log::debug!("frame {}: collected coin #{}", state.frame, id);
    }
}
