//! Platform abstraction layer
//!
//! Handles the host-facing side of the game:
//! - Key codes to engine actions
//! - Buffering input between frames
//! - Driving the engine from display frames

pub mod frame;
pub mod input;

pub use frame::{GameLoop, LoopControl, Pacing};
pub use input::{InputQueue, action_for_key};
