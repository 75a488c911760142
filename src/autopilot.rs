//! Idle/demo mode player
//!
//! Looks at a snapshot and steers toward the lane with the most room ahead,
//! restarting whenever a run ends.
//! Only lane changes are used: on this track a jump moves the runner up the
//! screen, toward the traffic, so it never helps.

use crate::sim::{Action, GamePhase, Snapshot};
use crate::tuning::Tuning;

/// Room (in ticks at current speed) below which a lane counts as blocked
const DANGER_TICKS: f32 = 12.0;
/// Room above which the current lane is good enough to stay in
const COMFORT_TICKS: f32 = 45.0;

/// Distance from the player's hitbox top to the nearest obstacle still ahead
/// in `lane`; negative when one is alongside, infinite when the lane is clear
fn room_ahead(snapshot: &Snapshot<'_>, tuning: &Tuning, lane: u8) -> f32 {
    let hitbox = snapshot.player.hitbox(tuning);
    snapshot
        .obstacles
        .iter()
        .filter(|o| o.lane == lane)
        .map(|o| o.bounds())
        .filter(|b| b.min.y < hitbox.max.y)
        .map(|b| hitbox.min.y - b.max.y)
        .fold(f32::INFINITY, f32::min)
}

fn has_coin_ahead(snapshot: &Snapshot<'_>, lane: u8) -> bool {
    snapshot
        .collectibles
        .iter()
        .any(|c| c.lane == lane && !c.collected && c.pos.y < snapshot.player.pos.y)
}

/// Pick the next action for the current frame, if any
pub fn suggest(snapshot: &Snapshot<'_>, tuning: &Tuning) -> Option<Action> {
    match snapshot.phase {
        GamePhase::NotStarted => return Some(Action::Start),
        GamePhase::Over => return Some(Action::Restart),
        GamePhase::Running => {}
    }

    let speed = snapshot.speed.max(f32::EPSILON);
    let current = snapshot.player.lane;
    let rooms: Vec<f32> = (0..tuning.lane_count)
        .map(|lane| room_ahead(snapshot, tuning, lane) / speed)
        .collect();

    let neighbours = [
        current.checked_sub(1).map(|l| (l, Action::MoveLeft)),
        (current + 1 < tuning.lane_count).then_some((current + 1, Action::MoveRight)),
    ];

    if rooms[current as usize] >= COMFORT_TICKS {
        // Safe here; detour for a coin only through a safe neighbour
        return neighbours.into_iter().flatten().find_map(|(lane, action)| {
            (rooms[lane as usize] >= COMFORT_TICKS && has_coin_ahead(snapshot, lane))
                .then_some(action)
        });
    }

    // Head one lane at a time toward the roomiest lane, nearest first on ties
    let target = (0..tuning.lane_count).max_by(|&a, &b| {
        rooms[a as usize]
            .total_cmp(&rooms[b as usize])
            .then_with(|| current.abs_diff(b).cmp(&current.abs_diff(a)))
    })?;
    if target == current || rooms[target as usize] <= rooms[current as usize] {
        return None;
    }

    let (next, action) = if target < current {
        (current - 1, Action::MoveLeft)
    } else {
        (current + 1, Action::MoveRight)
    };
    (rooms[next as usize] > DANGER_TICKS).then_some(action)
}
