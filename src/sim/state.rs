//! Game state and core simulation types
//!
//! Everything the state machine mutates lives in one owned `GameState`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::order::{Order, Verdict};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayState {
    /// Title screens, nothing moving yet
    NotStarted,
    /// Conveyor running
    Playing,
    /// Conveyor frozen
    Paused,
    /// Out of lives, waiting for restart
    GameOver,
}

/// Full-screen overlay shown above the kitchen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    Start,
    Instructions,
    Controls,
    Paused,
    GameOver,
    /// No overlay, the kitchen is in play
    Hidden,
}

/// Transient notification sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    Muted,
    Unmuted,
    LevelUp,
}

/// Things that happened during a transition or tick, drained by the front-end
/// for sound and notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Restarted { game_number: u32 },
    Paused,
    Resumed,
    NewOrder(Order),
    Correct { score: u64 },
    Incorrect { lives: u8 },
    LevelUp { level: u8 },
    GameOver { score: u64, champion: u64 },
    OverlayChanged(Overlay),
    Notify(Notification),
    MuteToggled { muted: bool },
    PlateCleared,
    DropAccepted,
    DropRejected,
}

/// Complete game state
///
/// Serializes as a snapshot for logging. The RNG position and pending events
/// are left out, so a snapshot is not a save file.
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    /// Balance constants
    pub tuning: Tuning,
    pub score: u64,
    pub lives: u8,
    /// 1 to `MAX_LEVEL`
    pub level: u8,
    pub play_state: PlayState,
    pub overlay: Overlay,
    /// What the customer wants this round
    pub order: Order,
    /// Result of this round's submission, if any
    pub last_verdict: Option<Verdict>,
    /// Speed the conveyor returns to after each round
    pub default_speed: f32,
    /// Speed used for the current round
    pub speed: f32,
    /// Best score this session
    pub champion_score: u64,
    /// Games started this session (1-based)
    pub game_number: u32,
    pub muted: bool,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed and default balance
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let speed = tuning.default_speed;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            play_state: PlayState::NotStarted,
            overlay: Overlay::Start,
            order: Order::default(),
            last_verdict: None,
            default_speed: speed,
            speed,
            champion_score: 0,
            game_number: 1,
            muted: false,
            events: Vec::new(),
        }
    }

    /// Per-tick displacement for a play field `width` units wide
    pub fn step_size(&self, width: f32) -> f32 {
        self.speed * width
    }

    /// Reset the per-game counters for a new run
    pub(crate) fn reset_run(&mut self) {
        self.score = 0;
        self.level = 1;
        self.lives = STARTING_LIVES;
        self.default_speed = self.tuning.default_speed;
        self.speed = self.default_speed;
        self.last_verdict = None;
        self.order = Order::default();
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = GameState::new(1);
        assert_eq!(state.play_state, PlayState::NotStarted);
        assert_eq!(state.overlay, Overlay::Start);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.game_number, 1);
        assert!(state.order.is_empty());
    }

    #[test]
    fn test_step_size_scales_with_width() {
        let state = GameState::new(1);
        assert!((state.step_size(1000.0) - 2.0).abs() < 1e-5);
        assert!((state.step_size(500.0) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(1);
        state.push_event(GameEvent::Paused);
        assert_eq!(state.drain_events(), vec![GameEvent::Paused]);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_snapshot_skips_rng_and_events() {
        let mut state = GameState::new(5);
        state.push_event(GameEvent::Started);
        let snapshot = serde_json::to_value(&state).unwrap();
        assert_eq!(snapshot["seed"], 5);
        assert_eq!(snapshot["play_state"], "NotStarted");
        assert!(snapshot.get("events").is_none());
        assert!(snapshot.get("rng").is_none());
    }

    #[test]
    fn test_same_seed_same_orders() {
        let mut a = GameState::new(9);
        let mut b = GameState::new(9);
        for _ in 0..5 {
            assert_eq!(
                crate::sim::order::generate(3, &mut a.rng),
                crate::sim::order::generate(3, &mut b.rng)
            );
        }
    }
}
