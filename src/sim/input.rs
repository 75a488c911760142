//! Player commands and how each phase responds to them

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;
use crate::{lane_left, lane_right};

/// A discrete input command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    /// Begin the first run
    Start,
    /// Begin a new run after game over
    Restart,
}

/// Apply one input to the state
///
/// Inputs that make no sense in the current phase (jumping before the run
/// starts, moving past the edge lane, restarting a live run) are ignored.
/// Returns true if the input changed anything.
pub fn apply_action(state: &mut GameState, tuning: &Tuning, action: Action) -> bool {
    match (action, state.phase) {
        (Action::MoveLeft, GamePhase::Running) => {
            let lane = lane_left(state.player.lane);
            change_lane(state, lane)
        }
        (Action::MoveRight, GamePhase::Running) => {
            let lane = lane_right(state.player.lane, tuning.lane_count);
            change_lane(state, lane)
        }
        (Action::Jump, GamePhase::Running) => {
            if state.player.airborne {
                return false;
            }
            state.player.vy = tuning.jump_impulse;
            state.player.airborne = true;
            state.record(GameEvent::Jumped);
            true
        }
        (Action::Start, GamePhase::NotStarted) | (Action::Restart, GamePhase::Over) => {
            state.reset_for_run(tuning);
            true
        }
        _ => false,
    }
}

fn change_lane(state: &mut GameState, lane: u8) -> bool {
    if lane == state.player.lane {
        return false;
    }
    state.player.lane = lane;
    state.record(GameEvent::LaneChanged { lane });
    true
}
