//! Frame loop driver
//!
//! Sits between the host's per-frame callback and the engine: drains queued
//! input, runs the tick(s) for this frame and tells the host whether to keep
//! requesting frames.

use rand::Rng;
use rand_pcg::Pcg32;

use super::input::InputQueue;
use crate::sim::{Action, Engine, GameEvent, GamePhase, Snapshot};

/// Fixed simulation rate for `Pacing::fixed_default`
pub const SIM_HZ: f32 = 60.0;
/// Maximum substeps per frame to prevent spiral of death
pub const MAX_SUBSTEPS: u32 = 8;

/// How display frames map to simulation ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pacing {
    /// One tick per display frame; game speed follows the refresh rate
    PerFrame,
    /// Ticks at a fixed rate from elapsed wall time
    Fixed { tick_hz: f32, max_substeps: u32 },
}

impl Pacing {
    pub fn fixed_default() -> Self {
        Pacing::Fixed {
            tick_hz: SIM_HZ,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Request another frame
    Continue,
    /// Stop requesting frames until input wakes the loop
    Stop,
}

/// Owns the engine and its input queue for one host
pub struct GameLoop<R = Pcg32> {
    engine: Engine<R>,
    inputs: InputQueue,
    pacing: Pacing,
    accumulator: f32,
    last_time_ms: Option<f64>,
    running: bool,
    frame_events: Vec<GameEvent>,
}

impl<R: Rng> GameLoop<R> {
    pub fn new(engine: Engine<R>, pacing: Pacing) -> Self {
        Self {
            engine,
            inputs: InputQueue::new(),
            pacing,
            accumulator: 0.0,
            last_time_ms: None,
            running: false,
            frame_events: Vec::new(),
        }
    }

    /// Queue an action for the next frame
    ///
    /// Returns true when the loop was stopped and this action re-armed it; the
    /// host must then request a frame.
    pub fn push_input(&mut self, action: Action) -> bool {
        self.inputs.push(action);
        if !self.running && matches!(action, Action::Start | Action::Restart) {
            self.resume();
            return true;
        }
        false
    }

    /// Arm the loop; returns false if it was already running
    pub fn resume(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.accumulator = 0.0;
        self.last_time_ms = None;
        log::debug!("Frame loop resumed");
        true
    }

    /// Disarm the loop; stopping a stopped loop does nothing
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.accumulator = 0.0;
        self.last_time_ms = None;
        log::debug!("Frame loop stopped at frame {}", self.engine.snapshot().frame);
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one display frame at host time `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> LoopControl {
        if !self.running {
            return LoopControl::Stop;
        }

        for action in self.inputs.drain() {
            self.engine.handle_input(action);
        }

        let ticks = self.ticks_for_frame(now_ms);
        for _ in 0..ticks {
            if self.engine.step() != GamePhase::Running {
                break;
            }
        }
        self.frame_events = self.engine.take_events();

        if self.engine.phase() == GamePhase::Running {
            LoopControl::Continue
        } else {
            self.stop();
            LoopControl::Stop
        }
    }

    fn ticks_for_frame(&mut self, now_ms: f64) -> u32 {
        match self.pacing {
            Pacing::PerFrame => 1,
            Pacing::Fixed {
                tick_hz,
                max_substeps,
            } => {
                let tick_dt = 1.0 / tick_hz;
                let dt = match self.last_time_ms {
                    Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, 0.1),
                    None => tick_dt,
                };
                self.last_time_ms = Some(now_ms);
                self.accumulator += dt;

                let mut ticks = 0;
                while self.accumulator >= tick_dt && ticks < max_substeps {
                    self.accumulator -= tick_dt;
                    ticks += 1;
                }
                if ticks == max_substeps {
                    // Drop the backlog rather than trying to catch up
                    self.accumulator = 0.0;
                }
                ticks
            }
        }
    }

    /// Events produced during the last frame
    pub fn events(&self) -> &[GameEvent] {
        &self.frame_events
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<R> {
        &mut self.engine
    }
}
