//! Keyboard mapping and input buffering
//!
//! Browser key events arrive between animation frames. They are queued here
//! and applied in arrival order right before the next tick, so a tick never
//! sees half an input.

use std::collections::VecDeque;

use crate::sim::{Action, GamePhase};

/// Map a `KeyboardEvent.code` to an action for the current phase
///
/// Space doubles as start, restart and jump depending on the phase.
pub fn action_for_key(code: &str, phase: GamePhase) -> Option<Action> {
    match (code, phase) {
        ("Space", GamePhase::NotStarted) => Some(Action::Start),
        ("Space", GamePhase::Over) => Some(Action::Restart),
        (_, GamePhase::NotStarted | GamePhase::Over) => None,
        ("ArrowLeft" | "KeyA", _) => Some(Action::MoveLeft),
        ("ArrowRight" | "KeyD", _) => Some(Action::MoveRight),
        ("Space" | "ArrowUp" | "KeyW", _) => Some(Action::Jump),
        _ => None,
    }
}

/// Maximum buffered actions; older ones are dropped first
pub const MAX_QUEUED_INPUTS: usize = 32;

/// FIFO of actions waiting for the next tick
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: VecDeque<Action>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        if self.pending.len() == MAX_QUEUED_INPUTS {
            self.pending.pop_front();
            log::warn!("Input queue full, dropped oldest action");
        }
        self.pending.push_back(action);
    }

    /// Take every queued action in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = Action> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_depends_on_phase() {
        assert_eq!(
            action_for_key("Space", GamePhase::NotStarted),
            Some(Action::Start)
        );
        assert_eq!(
            action_for_key("Space", GamePhase::Running),
            Some(Action::Jump)
        );
        assert_eq!(
            action_for_key("Space", GamePhase::Over),
            Some(Action::Restart)
        );
    }

    #[test]
    fn test_movement_keys() {
        let running = GamePhase::Running;
        assert_eq!(action_for_key("ArrowLeft", running), Some(Action::MoveLeft));
        assert_eq!(action_for_key("KeyA", running), Some(Action::MoveLeft));
        assert_eq!(action_for_key("ArrowRight", running), Some(Action::MoveRight));
        assert_eq!(action_for_key("KeyD", running), Some(Action::MoveRight));
        assert_eq!(action_for_key("ArrowUp", running), Some(Action::Jump));
        assert_eq!(action_for_key("KeyW", running), Some(Action::Jump));
        assert_eq!(action_for_key("KeyQ", running), None);
    }

    #[test]
    fn test_movement_ignored_outside_run() {
        assert_eq!(action_for_key("ArrowLeft", GamePhase::NotStarted), None);
        assert_eq!(action_for_key("KeyW", GamePhase::Over), None);
    }

    #[test]
    fn test_queue_is_fifo_and_bounded() {
        let mut queue = InputQueue::new();
        queue.push(Action::MoveLeft);
        queue.push(Action::Jump);
        assert_eq!(queue.drain().collect::<Vec<_>>(), vec![Action::MoveLeft, Action::Jump]);
        assert!(queue.is_empty());

        for _ in 0..MAX_QUEUED_INPUTS {
            queue.push(Action::MoveLeft);
        }
        queue.push(Action::MoveRight);
        assert_eq!(queue.len(), MAX_QUEUED_INPUTS);
        assert_eq!(queue.drain().last(), Some(Action::MoveRight));
    }
}
