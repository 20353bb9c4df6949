//! Fixed timestep simulation tick and keyboard dispatch

use super::kitchen::Kitchen;
use super::machine::{self, SubmitTrigger};
use super::state::{GameState, Overlay, PlayState};

/// Keys the game responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Start, pause, resume or restart
    Space,
    Mute,
    Instructions,
    Home,
    /// Controls screen, or clear the plate mid-game
    Controls,
    Submit,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            " " => Some(Key::Space),
            "m" | "M" => Some(Key::Mute),
            "i" | "I" => Some(Key::Instructions),
            "h" | "H" => Some(Key::Home),
            "c" | "C" => Some(Key::Controls),
            "s" | "S" => Some(Key::Submit),
            _ => None,
        }
    }
}

/// Apply a key press. Returns false when the key means nothing in the
/// current play state.
pub fn handle_key(state: &mut GameState, kitchen: &mut Kitchen, key: Key, width: f32) -> bool {
    match key {
        Key::Space => match state.play_state {
            PlayState::NotStarted | PlayState::GameOver => machine::start(state, kitchen, width),
            PlayState::Playing => machine::pause(state),
            PlayState::Paused => machine::resume(state),
        },
        Key::Mute => machine::toggle_mute(state),
        Key::Instructions => machine::show_overlay(state, Overlay::Instructions),
        Key::Home => machine::show_overlay(state, Overlay::Start),
        Key::Controls => match state.play_state {
            PlayState::Playing => machine::clear_plate(state, kitchen),
            _ => machine::show_overlay(state, Overlay::Controls),
        },
        Key::Submit => machine::submit(state, kitchen, SubmitTrigger::Player),
    }
}

/// Advance the game state by one fixed timestep.
///
/// Order within a tick: move the plate, then detect the end of the round,
/// then draw the next order. Nothing moves unless playing.
pub fn tick(state: &mut GameState, kitchen: &mut Kitchen, width: f32) {
    if state.play_state != PlayState::Playing {
        return;
    }

    kitchen.update(state.step_size(width), width);
    if !kitchen.at_end() {
        return;
    }

    if kitchen.submitted() {
        state.speed = state.default_speed;
    } else {
        machine::submit(state, kitchen, SubmitTrigger::Timeout);
    }
    kitchen.clear_order();

    if state.play_state != PlayState::GameOver {
        machine::next_order(state);
    }
}
