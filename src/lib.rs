//! Cake Stack - a conveyor belt cake stacking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (orders, game state machine, kitchen conveyor)
//! - `tuning`: Data-driven scoring and speed balance
//! - `highscores`: Session leaderboard
//! - `audio`: Procedural sound effects

pub mod audio;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (24 Hz conveyor ticks)
    pub const SIM_DT: f32 = 1.0 / 24.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Lives at the start of every game
    pub const STARTING_LIVES: u8 = 3;
    /// Highest level; toppings unlock here
    pub const MAX_LEVEL: u8 = 3;

    /// The plate travels from -width * TRACK_EXTENT to +width * TRACK_EXTENT
    pub const TRACK_EXTENT: f32 = 1.0 / 3.0;
    /// Vertical position of the plate on the conveyor
    pub const PLATE_Y: f32 = -60.0;

    /// Drop zone around the plate (world units)
    pub const DROP_HALF_WIDTH: f32 = 60.0;
    pub const DROP_BELOW: f32 = 30.0;
    pub const DROP_ABOVE: f32 = 40.0;
    /// Extra drop height once a base is stacked
    pub const DROP_BASE_BONUS: f32 = 10.0;
    /// Extra drop height once frosting is stacked
    pub const DROP_FROSTING_BONUS: f32 = 30.0;

    /// Copies of each ingredient available on the shelf
    pub const PANTRY_STOCK: u8 = 2;
}
