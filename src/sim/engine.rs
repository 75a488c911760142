//! The simulation engine
//!
//! Owns one run's state, the tuning it runs under and the random source.
//! Hosts drive it with `handle_input` between frames and `step` once per
//! frame, and read it back through `snapshot`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::input::{Action, apply_action};
use super::state::{Collectible, GameEvent, GamePhase, GameState, Obstacle, Player};
use super::tick::tick;
use crate::tuning::{Tuning, TuningError};

/// Read-only view of the engine for rendering and HUD
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub collectibles: &'a [Collectible],
    /// Floored score
    pub score: u64,
    pub coins: u32,
    pub speed: f32,
    pub frame: u64,
}

/// Endless-runner simulation driven one tick at a time
pub struct Engine<R = Pcg32> {
    tuning: Tuning,
    state: GameState,
    rng: R,
    /// Runs begun on this engine; identifies the current run
    runs: u64,
}

impl Engine<Pcg32> {
    /// Engine with the default PCG generator seeded from `seed`
    pub fn seeded(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        Self::with_rng(tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine<R> {
    /// Engine drawing spawn randomness from `rng`
    ///
    /// Fails if `tuning` does not pass [`Tuning::validate`].
    pub fn with_rng(tuning: Tuning, rng: R) -> Result<Self, TuningError> {
        tuning.validate()?;
        let state = GameState::new(&tuning);
        Ok(Self {
            tuning,
            state,
            rng,
            runs: 0,
        })
    }

    /// Begin a fresh run regardless of the current phase
    pub fn start(&mut self) {
        self.state.reset_for_run(&self.tuning);
        self.runs += 1;
        log::info!("Run {} started", self.runs);
    }

    /// Apply one input; inputs invalid for the current phase are ignored
    pub fn handle_input(&mut self, action: Action) -> GamePhase {
        let was = self.state.phase;
        if apply_action(&mut self.state, &self.tuning, action) && was != self.state.phase {
            self.runs += 1;
            log::info!(
                "Run {} started ({:?} -> {:?} on {:?})",
                self.runs,
                was,
                self.state.phase,
                action
            );
        }
        self.state.phase
    }

    /// Advance one tick; a no-op unless the run is `Running`
    pub fn step(&mut self) -> GamePhase {
        tick(&mut self.state, &self.tuning, &mut self.rng);
        self.state.phase
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.state.phase,
            player: &self.state.player,
            obstacles: &self.state.obstacles,
            collectibles: &self.state.collectibles,
            score: self.state.display_score(),
            coins: self.state.coins,
            speed: self.state.speed,
            frame: self.state.frame,
        }
    }

    /// Score to report once the run has ended
    pub fn final_score(&self) -> Option<u64> {
        (self.state.phase == GamePhase::Over).then(|| self.state.display_score())
    }

    /// Events recorded since the last call
    ///
    /// Undrained events are capped at [`MAX_BUFFERED_EVENTS`](super::state::MAX_BUFFERED_EVENTS),
    /// oldest dropped first.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// 1-based number of the current run; 0 before the first start
    #[inline]
    pub fn run_number(&self) -> u64 {
        self.runs
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Full run state, for tests and tooling
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable run state for tests that stage exact layouts
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{MAX_BUFFERED_EVENTS, ObstacleKind};
    use glam::Vec2;
    use proptest::prelude::*;

    fn running(seed: u64) -> Engine {
        let mut engine = Engine::seeded(Tuning::default(), seed).unwrap();
        engine.handle_input(Action::Start);
        engine
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let no_lanes = Tuning {
            lane_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            Engine::seeded(no_lanes, 1),
            Err(TuningError::TooFewLanes { lane_count: 0 })
        ));

        let no_spawn_floor = Tuning {
            spawn_min_interval: 0,
            ..Default::default()
        };
        assert!(matches!(
            Engine::seeded(no_spawn_floor, 1),
            Err(TuningError::SpawnBoundsInverted { min: 0, .. })
        ));

        let bad_chance = Tuning {
            coin_chance: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            Engine::with_rng(bad_chance, Pcg32::seed_from_u64(1)),
            Err(TuningError::ProbabilityOutOfRange { field: "coin_chance", .. })
        ));
    }

    #[test]
    fn test_undrained_events_stay_bounded() {
        let mut engine = running(5);
        let lane = engine.state().player.lane;
        for _ in 0..20_000 {
            engine.state_mut().obstacles.retain(|o| o.lane != lane);
            engine.step();
            assert!(engine.state().events.len() <= MAX_BUFFERED_EVENTS);
        }
        assert_eq!(engine.phase(), GamePhase::Running);
        assert_eq!(engine.state().events.len(), MAX_BUFFERED_EVENTS);
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut engine = Engine::seeded(Tuning::default(), 1).unwrap();
        assert_eq!(engine.phase(), GamePhase::NotStarted);
        assert_eq!(engine.handle_input(Action::Restart), GamePhase::NotStarted);
        assert_eq!(engine.step(), GamePhase::NotStarted);
        assert_eq!(engine.handle_input(Action::Start), GamePhase::Running);

        assert_eq!(engine.run_number(), 1);

        engine.state_mut().phase = GamePhase::Over;
        assert_eq!(engine.handle_input(Action::Start), GamePhase::Over);
        assert_eq!(engine.handle_input(Action::Restart), GamePhase::Running);
        assert_eq!(engine.run_number(), 2);
    }

    #[test]
    fn test_first_spawn_lands_on_interval() {
        let mut engine = running(42);
        let tuning = engine.tuning().clone();
        let interval = tuning.spawn_interval(tuning.initial_speed);
        assert_eq!(interval, 90);

        for _ in 0..interval - 1 {
            engine.step();
        }
        assert!(engine.snapshot().obstacles.is_empty());

        engine.step();
        let snap = engine.snapshot();
        assert_eq!(snap.phase, GamePhase::Running);
        assert_eq!(snap.obstacles.len(), 1);
        // Spawned this tick, then moved once at the freshly ramped speed
        let expected_y = tuning.obstacle_spawn_y + snap.speed;
        assert!((snap.obstacles[0].pos.y - expected_y).abs() < 1e-4);
        assert_eq!(
            snap.obstacles[0].pos.x,
            tuning.lane_center(snap.obstacles[0].lane)
        );
    }

    #[test]
    fn test_overlapping_obstacle_ends_run_without_scoring() {
        let mut engine = running(1);
        let tuning = engine.tuning().clone();
        let state = engine.state_mut();
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Block,
            lane: 1,
            pos: Vec2::new(150.0, 500.0),
            size: Vec2::new(tuning.obstacle_width, tuning.block_height),
            passed: false,
        });

        assert_eq!(engine.step(), GamePhase::Over);
        let snap = engine.snapshot();
        assert_eq!(snap.score, 0);
        assert_eq!(snap.coins, 0);
        assert_eq!(snap.obstacles.len(), 1);
        assert_eq!(engine.final_score(), Some(0));
    }

    #[test]
    fn test_pickup_adds_exact_bonus() {
        let mut with_coin = running(9);
        let mut without_coin = running(9);
        let tuning = with_coin.tuning().clone();

        let state = with_coin.state_mut();
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            lane: 1,
            pos: Vec2::new(150.0, 500.0),
            size: Vec2::splat(tuning.coin_size),
            collected: false,
        });

        assert_eq!(with_coin.step(), GamePhase::Running);
        without_coin.step();

        let coin = &with_coin.state().collectibles[0];
        assert!(coin.collected);
        let bonus = with_coin.state().score - without_coin.state().score;
        assert!((bonus - tuning.coin_bonus).abs() < 1e-9);
        assert_eq!(with_coin.snapshot().coins, 1);
        assert!(
            with_coin
                .take_events()
                .contains(&GameEvent::CoinCollected { id })
        );

        // A collected coin never scores twice
        let before = with_coin.state().score;
        with_coin.step();
        let gained = with_coin.state().score - before;
        assert!(gained < tuning.coin_bonus);
        assert_eq!(with_coin.snapshot().coins, 1);
    }

    #[test]
    fn test_lane_is_discrete_and_x_smooths() {
        let mut engine = running(3);
        engine.handle_input(Action::MoveLeft);
        for _ in 0..40 {
            engine.step();
        }
        let tuning = engine.tuning().clone();
        let start_x = engine.snapshot().player.pos.x;
        assert_eq!(engine.snapshot().player.lane, 0);

        engine.handle_input(Action::MoveRight);
        engine.handle_input(Action::MoveRight);
        assert_eq!(engine.snapshot().player.lane, 2);
        assert_eq!(engine.snapshot().player.pos.x, start_x);

        engine.step();
        let x1 = engine.snapshot().player.pos.x;
        engine.step();
        let x2 = engine.snapshot().player.pos.x;
        let target = tuning.lane_center(2);
        assert!(start_x < x1 && x1 < x2 && x2 < target);
    }

    #[test]
    fn test_jump_returns_to_ground() {
        let mut engine = running(5);
        let ground = engine.tuning().ground_y();
        engine.handle_input(Action::Jump);
        assert!(engine.snapshot().player.airborne);

        let mut ticks = 0;
        while engine.snapshot().player.airborne {
            engine.step();
            ticks += 1;
            assert!(ticks < 200, "never landed");
        }
        let player = engine.snapshot().player;
        assert_eq!(player.pos.y, ground);
        assert_eq!(player.vy, 0.0);

        engine.step();
        assert_eq!(engine.snapshot().player.pos.y, ground);
    }

    #[test]
    fn test_restart_matches_fresh_start() {
        let mut fresh = Engine::seeded(Tuning::default(), 11).unwrap();
        fresh.start();

        let mut replayed = running(11);
        replayed.handle_input(Action::MoveRight);
        for _ in 0..200 {
            replayed.step();
        }
        replayed.state_mut().phase = GamePhase::Over;
        replayed.handle_input(Action::Restart);

        assert_eq!(replayed.state(), fresh.state());
        let snap = replayed.snapshot();
        assert_eq!(snap.score, 0);
        assert_eq!(snap.speed, Tuning::default().initial_speed);
        assert!(snap.obstacles.is_empty() && snap.collectibles.is_empty());
        assert!(!snap.player.airborne);
    }

    #[test]
    fn test_same_seed_same_course() {
        let mut a = running(2024);
        let mut b = running(2024);
        for i in 0..1500 {
            if i % 37 == 0 {
                a.handle_input(Action::MoveLeft);
                b.handle_input(Action::MoveLeft);
            }
            if i % 53 == 0 {
                a.handle_input(Action::MoveRight);
                b.handle_input(Action::MoveRight);
            }
            a.step();
            b.step();
        }
        assert_eq!(a.state(), b.state());
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::MoveLeft),
            Just(Action::MoveRight),
            Just(Action::Jump),
            Just(Action::Start),
            Just(Action::Restart),
        ]
    }

    proptest! {
        #[test]
        fn prop_run_invariants_hold(
            seed in any::<u64>(),
            script in prop::collection::vec(prop::option::of(action_strategy()), 1..600),
        ) {
            let mut engine = running(seed);
            let tuning = engine.tuning().clone();

            for input in script {
                let phase = engine.phase();
                let speed = engine.state().speed;
                let score = engine.state().score;

                if let Some(action) = input {
                    engine.handle_input(action);
                }
                let restarted = phase == GamePhase::Over && engine.phase() == GamePhase::Running;
                engine.step();
                let state = engine.state();

                prop_assert!(state.player.lane < tuning.lane_count);
                prop_assert!(state.player.pos.y <= tuning.ground_y());
                if phase == GamePhase::Running {
                    prop_assert!(state.speed >= speed);
                    prop_assert!(state.score >= score);
                }
                if !restarted {
                    prop_assert!(state.speed >= speed);
                }
                for o in &state.obstacles {
                    prop_assert_eq!(o.pos.x, tuning.lane_center(o.lane));
                }
                for c in &state.collectibles {
                    prop_assert_eq!(c.pos.x, tuning.lane_center(c.lane));
                }
            }
        }

        #[test]
        fn prop_stepping_after_game_over_is_idempotent(seed in any::<u64>(), extra in 1usize..50) {
            let mut engine = running(seed);
            let mut ticks = 0;
            while engine.phase() == GamePhase::Running && ticks < 20_000 {
                engine.step();
                ticks += 1;
            }
            prop_assume!(engine.phase() == GamePhase::Over);

            let frozen = engine.state().clone();
            for _ in 0..extra {
                prop_assert_eq!(engine.step(), GamePhase::Over);
            }
            prop_assert_eq!(engine.state(), &frozen);
        }
    }
}
