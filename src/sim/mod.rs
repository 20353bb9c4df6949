//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod ingredient;
pub mod kitchen;
pub mod machine;
pub mod order;
pub mod state;
pub mod tick;

pub use ingredient::{Category, Ingredient, asset_key};
pub use kitchen::{DropRefusal, Kitchen};
pub use machine::{
    SubmitTrigger, clear_plate, drop_ingredient, pause, resume, show_overlay, start, submit,
    toggle_mute,
};
pub use order::{Order, Verdict, evaluate, generate};
pub use state::{GameEvent, GameState, Notification, Overlay, PlayState};
pub use tick::{Key, handle_key, tick};
