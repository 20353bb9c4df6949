//! Play-state transitions
//!
//! Every transition returns whether it was accepted. A rejected transition
//! leaves the state untouched.

use glam::Vec2;

use super::ingredient::Ingredient;
use super::kitchen::Kitchen;
use super::order::{Verdict, evaluate, generate};
use super::state::{GameEvent, GameState, Notification, Overlay, PlayState};
use crate::consts::MAX_LEVEL;

/// What ended the round's assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// Player pressed submit; the plate speeds off
    Player,
    /// Plate reached the end of the track with whatever was stacked
    Timeout,
}

/// Start the first game, or restart after game over
pub fn start(state: &mut GameState, kitchen: &mut Kitchen, width: f32) -> bool {
    match state.play_state {
        PlayState::NotStarted => {
            log::info!("Game {} started", state.game_number);
            state.push_event(GameEvent::Started);
        }
        PlayState::GameOver => {
            state.reset_run();
            state.game_number += 1;
            kitchen.reset(width);
            log::info!("Game {} started", state.game_number);
            state.push_event(GameEvent::Restarted {
                game_number: state.game_number,
            });
        }
        PlayState::Playing | PlayState::Paused => return false,
    }

    state.play_state = PlayState::Playing;
    set_overlay(state, Overlay::Hidden);
    next_order(state);
    true
}

pub fn pause(state: &mut GameState) -> bool {
    if state.play_state != PlayState::Playing {
        return false;
    }
    state.play_state = PlayState::Paused;
    set_overlay(state, Overlay::Paused);
    state.push_event(GameEvent::Paused);
    log::info!("Paused at score {}", state.score);
    true
}

pub fn resume(state: &mut GameState) -> bool {
    if state.play_state != PlayState::Paused {
        return false;
    }
    state.play_state = PlayState::Playing;
    set_overlay(state, Overlay::Hidden);
    state.push_event(GameEvent::Resumed);
    true
}

/// Show a title-screen overlay. Instructions and the home screen are only
/// reachable before the first start; controls also while paused.
pub fn show_overlay(state: &mut GameState, overlay: Overlay) -> bool {
    let allowed = match overlay {
        Overlay::Start | Overlay::Instructions => state.play_state == PlayState::NotStarted,
        Overlay::Controls => matches!(
            state.play_state,
            PlayState::NotStarted | PlayState::Paused
        ),
        Overlay::Paused | Overlay::GameOver | Overlay::Hidden => false,
    };
    if allowed {
        set_overlay(state, overlay);
    }
    allowed
}

pub fn toggle_mute(state: &mut GameState) -> bool {
    state.muted = !state.muted;
    state.push_event(GameEvent::MuteToggled { muted: state.muted });
    state.push_event(GameEvent::Notify(if state.muted {
        Notification::Muted
    } else {
        Notification::Unmuted
    }));
    true
}

/// Evaluate the plate against the current order. Accepted once per round,
/// only while playing.
pub fn submit(state: &mut GameState, kitchen: &mut Kitchen, trigger: SubmitTrigger) -> bool {
    if state.play_state != PlayState::Playing || kitchen.submitted() {
        return false;
    }
    kitchen.mark_submitted();

    let attempt = kitchen.attempt().to_vec();
    kitchen.replenish_ingredients(&attempt);

    let verdict = evaluate(&state.order, &attempt);
    log::debug!(
        "{:?} submit: wanted {:?}, got {:?} -> {:?}",
        trigger,
        state.order.as_slice(),
        attempt,
        verdict
    );
    state.last_verdict = Some(verdict);
    match verdict {
        Verdict::Correct => correct_order(state),
        Verdict::Incorrect => incorrect_order(state),
    }

    // A timed-out plate already runs at the new default, not the pre-update one
    state.speed = match trigger {
        SubmitTrigger::Player => state.tuning.submitted_speed,
        SubmitTrigger::Timeout => state.default_speed,
    };
    true
}

/// Throw away what is on the plate without judging it
pub fn clear_plate(state: &mut GameState, kitchen: &mut Kitchen) -> bool {
    if state.play_state != PlayState::Playing || kitchen.submitted() {
        return false;
    }
    let attempt = kitchen.attempt().to_vec();
    kitchen.replenish_ingredients(&attempt);
    kitchen.clear_order();
    state.push_event(GameEvent::PlateCleared);
    true
}

/// Drag-and-drop release over the kitchen
pub fn drop_ingredient(
    state: &mut GameState,
    kitchen: &mut Kitchen,
    ingredient: Ingredient,
    pos: Vec2,
) -> bool {
    if state.play_state != PlayState::Playing {
        return false;
    }
    match kitchen.drop_ingredient(ingredient, pos) {
        Ok(()) => {
            state.push_event(GameEvent::DropAccepted);
            true
        }
        Err(refusal) => {
            log::debug!("Dropped {} refused: {:?}", ingredient.as_str(), refusal);
            state.push_event(GameEvent::DropRejected);
            false
        }
    }
}

/// Draw the next round's order for the current level
pub(crate) fn next_order(state: &mut GameState) {
    state.order = generate(state.level, &mut state.rng);
    state.last_verdict = None;
    log::debug!("New order: {}", state.order.asset_key());
    state.push_event(GameEvent::NewOrder(state.order.clone()));
}

fn set_overlay(state: &mut GameState, overlay: Overlay) {
    if state.overlay != overlay {
        state.overlay = overlay;
        state.push_event(GameEvent::OverlayChanged(overlay));
    }
}

fn correct_order(state: &mut GameState) {
    let tuning = &state.tuning;
    state.score += tuning.points_per_order;
    let score = state.score;

    let mut levelled = false;
    match state.level {
        1 => {
            if score >= tuning.level_two_score {
                state.level = 2;
                levelled = true;
            }
        }
        2 => {
            if score >= tuning.level_three_score {
                state.level = 3;
                state.default_speed = tuning.level_three_speed;
                levelled = true;
            } else {
                state.default_speed += tuning.level_two_speed_step;
            }
        }
        _ => {
            if score % tuning.level_three_interval == 0 {
                let units = (score / tuning.level_three_divisor + 1) as f32;
                state.default_speed += units * tuning.level_three_speed_step;
                log::debug!("Conveyor speed now {}", state.default_speed);
            }
        }
    }

    state.push_event(GameEvent::Correct { score });
    if levelled {
        debug_assert!(state.level <= MAX_LEVEL);
        log::info!("Level up: {} at score {}", state.level, score);
        state.push_event(GameEvent::LevelUp { level: state.level });
        state.push_event(GameEvent::Notify(Notification::LevelUp));
    }
}

fn incorrect_order(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.push_event(GameEvent::Incorrect { lives: state.lives });
    if state.lives == 0 {
        end_game(state);
    }
}

fn end_game(state: &mut GameState) {
    state.play_state = PlayState::GameOver;
    state.champion_score = state.champion_score.max(state.score);
    set_overlay(state, Overlay::GameOver);
    log::info!(
        "Game {} over with {} points (best {})",
        state.game_number,
        state.score,
        state.champion_score
    );
    state.push_event(GameEvent::GameOver {
        score: state.score,
        champion: state.champion_score,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::order::Order;

    const WIDTH: f32 = 960.0;

    fn playing() -> (GameState, Kitchen) {
        let mut state = GameState::new(42);
        let mut kitchen = Kitchen::new(WIDTH);
        assert!(start(&mut state, &mut kitchen, WIDTH));
        state.drain_events();
        (state, kitchen)
    }

    fn stack(state: &mut GameState, kitchen: &mut Kitchen, ingredients: &[Ingredient]) {
        for &ingredient in ingredients {
            let pos = kitchen.plate_pos();
            assert!(drop_ingredient(state, kitchen, ingredient, pos));
        }
    }

    /// Stack the current order, submit it and open the next round
    fn serve_correct(state: &mut GameState, kitchen: &mut Kitchen) {
        let order = state.order.clone();
        stack(state, kitchen, order.as_slice());
        assert!(submit(state, kitchen, SubmitTrigger::Player));
        kitchen.clear_order();
        next_order(state);
    }

    #[test]
    fn test_single_base_correct() {
        let (mut state, mut kitchen) = playing();
        state.order = Order::new(vec![Ingredient::ChocolateCake]);
        stack(&mut state, &mut kitchen, &[Ingredient::ChocolateCake]);

        assert!(submit(&mut state, &mut kitchen, SubmitTrigger::Player));
        assert_eq!(state.last_verdict, Some(Verdict::Correct));
        assert_eq!(state.score, 100);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.speed, state.tuning.submitted_speed);
    }

    #[test]
    fn test_second_submit_is_noop() {
        let (mut state, mut kitchen) = playing();
        let order = state.order.clone();
        stack(&mut state, &mut kitchen, order.as_slice());
        assert!(submit(&mut state, &mut kitchen, SubmitTrigger::Player));
        state.drain_events();

        let score = state.score;
        let lives = state.lives;
        assert!(!submit(&mut state, &mut kitchen, SubmitTrigger::Player));
        assert!(!submit(&mut state, &mut kitchen, SubmitTrigger::Timeout));
        assert_eq!(state.score, score);
        assert_eq!(state.lives, lives);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_empty_timeout_on_last_life_ends_game() {
        let (mut state, mut kitchen) = playing();
        state.lives = 1;
        state.score = 700;
        state.champion_score = 500;
        state.order = Order::new(vec![Ingredient::YellowCake]);

        assert!(submit(&mut state, &mut kitchen, SubmitTrigger::Timeout));
        assert_eq!(state.last_verdict, Some(Verdict::Incorrect));
        assert_eq!(state.lives, 0);
        assert_eq!(state.play_state, PlayState::GameOver);
        assert_eq!(state.overlay, Overlay::GameOver);
        assert_eq!(state.champion_score, 700);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver {
            score: 700,
            champion: 700
        }));
    }

    #[test]
    fn test_champion_keeps_higher_previous_score() {
        let (mut state, mut kitchen) = playing();
        state.lives = 1;
        state.score = 200;
        state.champion_score = 900;
        assert!(submit(&mut state, &mut kitchen, SubmitTrigger::Timeout));
        assert_eq!(state.champion_score, 900);
    }

    #[test]
    fn test_level_two_at_400_not_300() {
        let (mut state, mut kitchen) = playing();
        for _ in 0..3 {
            serve_correct(&mut state, &mut kitchen);
        }
        assert_eq!(state.score, 300);
        assert_eq!(state.level, 1);
        let events = state.drain_events();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelUp { .. })));

        serve_correct(&mut state, &mut kitchen);
        assert_eq!(state.score, 400);
        assert_eq!(state.level, 2);
        let level_ups = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .count();
        assert_eq!(level_ups, 1);
        // The next round asks for frosting too
        assert_eq!(state.order.len(), 2);
    }

    #[test]
    fn test_level_two_speeds_up_per_cake() {
        let (mut state, mut kitchen) = playing();
        state.level = 2;
        state.score = 400;
        state.order = Order::new(vec![Ingredient::YellowCake, Ingredient::ChocolateFrosting]);
        let before = state.default_speed;

        serve_correct(&mut state, &mut kitchen);
        assert!((state.default_speed - (before + 0.00048)).abs() < 1e-7);
    }

    #[test]
    fn test_timeout_runs_at_updated_default() {
        let (mut state, mut kitchen) = playing();
        state.level = 2;
        state.score = 400;
        state.order = Order::new(vec![Ingredient::YellowCake, Ingredient::ChocolateFrosting]);
        let order = state.order.clone();
        stack(&mut state, &mut kitchen, order.as_slice());

        assert!(submit(&mut state, &mut kitchen, SubmitTrigger::Timeout));
        assert_eq!(state.last_verdict, Some(Verdict::Correct));
        assert!((state.default_speed - (0.002 + 0.00048)).abs() < 1e-7);
        assert_eq!(state.speed, state.default_speed);
    }

    #[test]
    fn test_default_speed_never_drops_over_long_run() {
        let (mut state, mut kitchen) = playing();
        let mut last = state.default_speed;
        for _ in 0..40 {
            serve_correct(&mut state, &mut kitchen);
            assert!(state.default_speed > 0.0);
            // Promotion to level 3 resets to its base speed
            if state.level < 3 || state.score > state.tuning.level_three_score {
                assert!(state.default_speed >= last);
            }
            last = state.default_speed;
        }
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_level_three_promotion_sets_speed() {
        let (mut state, mut kitchen) = playing();
        state.level = 2;
        state.score = 900;
        state.default_speed = 0.004;
        state.order = Order::new(vec![Ingredient::YellowCake, Ingredient::ChocolateFrosting]);

        serve_correct(&mut state, &mut kitchen);
        assert_eq!(state.level, 3);
        assert_eq!(state.default_speed, 0.0033);
    }

    #[test]
    fn test_level_three_speed_formula() {
        let (mut state, mut kitchen) = playing();
        state.level = 3;
        state.default_speed = 0.0033;

        // 1100: not a multiple of 300
        state.score = 1000;
        state.order = Order::new(vec![Ingredient::YellowCake]);
        serve_correct(&mut state, &mut kitchen);
        assert_eq!(state.default_speed, 0.0033);

        // 1200: multiple of 300, floor(1200 / 500) + 1 = 3 units
        state.order = Order::new(vec![Ingredient::YellowCake]);
        serve_correct(&mut state, &mut kitchen);
        assert_eq!(state.score, 1200);
        assert!((state.default_speed - (0.0033 + 3.0 * 0.00024)).abs() < 1e-7);
    }

    #[test]
    fn test_wrong_cake_costs_a_life() {
        let (mut state, mut kitchen) = playing();
        state.order = Order::new(vec![Ingredient::ChocolateCake]);
        stack(&mut state, &mut kitchen, &[Ingredient::YellowCake]);

        assert!(submit(&mut state, &mut kitchen, SubmitTrigger::Player));
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.play_state, PlayState::Playing);
        // Ingredients go back on the shelf
        assert_eq!(kitchen.stock(Ingredient::YellowCake), crate::consts::PANTRY_STOCK);
    }

    #[test]
    fn test_restart_resets_run() {
        let (mut state, mut kitchen) = playing();
        state.score = 1500;
        state.level = 3;
        state.default_speed = 0.01;
        state.lives = 1;
        assert!(submit(&mut state, &mut kitchen, SubmitTrigger::Player));
        assert_eq!(state.play_state, PlayState::GameOver);

        assert!(start(&mut state, &mut kitchen, WIDTH));
        assert_eq!(state.play_state, PlayState::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.game_number, 2);
        assert_eq!(state.default_speed, state.tuning.default_speed);
        assert_eq!(state.champion_score, 1500);
        assert!(!kitchen.submitted());
        assert_eq!(state.order.len(), 1);
    }

    #[test]
    fn test_pause_resume() {
        let (mut state, _kitchen) = playing();
        assert!(!resume(&mut state));
        assert!(pause(&mut state));
        assert_eq!(state.overlay, Overlay::Paused);
        assert!(!pause(&mut state));
        assert!(resume(&mut state));
        assert_eq!(state.play_state, PlayState::Playing);
        assert_eq!(state.overlay, Overlay::Hidden);
    }

    #[test]
    fn test_start_rejected_mid_game() {
        let (mut state, mut kitchen) = playing();
        let order = state.order.clone();
        assert!(!start(&mut state, &mut kitchen, WIDTH));
        assert_eq!(state.order, order);
    }

    #[test]
    fn test_submit_requires_playing() {
        let mut state = GameState::new(1);
        let mut kitchen = Kitchen::new(WIDTH);
        assert!(!submit(&mut state, &mut kitchen, SubmitTrigger::Player));
        assert!(!kitchen.submitted());
    }

    #[test]
    fn test_overlays_only_on_title_or_pause() {
        let mut state = GameState::new(1);
        assert!(show_overlay(&mut state, Overlay::Instructions));
        assert!(show_overlay(&mut state, Overlay::Controls));
        assert!(show_overlay(&mut state, Overlay::Start));
        assert!(!show_overlay(&mut state, Overlay::Hidden));

        let mut kitchen = Kitchen::new(WIDTH);
        start(&mut state, &mut kitchen, WIDTH);
        assert!(!show_overlay(&mut state, Overlay::Instructions));
        assert!(!show_overlay(&mut state, Overlay::Controls));

        pause(&mut state);
        assert!(show_overlay(&mut state, Overlay::Controls));
        assert!(!show_overlay(&mut state, Overlay::Start));
    }

    #[test]
    fn test_clear_plate_restocks_shelf() {
        let (mut state, mut kitchen) = playing();
        stack(&mut state, &mut kitchen, &[Ingredient::ChocolateCake]);
        assert!(clear_plate(&mut state, &mut kitchen));
        assert!(kitchen.attempt().is_empty());
        assert_eq!(kitchen.stock(Ingredient::ChocolateCake), crate::consts::PANTRY_STOCK);

        kitchen.mark_submitted();
        assert!(!clear_plate(&mut state, &mut kitchen));
    }

    #[test]
    fn test_mute_toggle_emits_notification() {
        let mut state = GameState::new(1);
        assert!(toggle_mute(&mut state));
        assert!(state.muted);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Notify(Notification::Muted)));
        toggle_mute(&mut state);
        assert!(!state.muted);
    }

    #[test]
    fn test_drop_refused_when_paused() {
        let (mut state, mut kitchen) = playing();
        pause(&mut state);
        let pos = kitchen.plate_pos();
        assert!(!drop_ingredient(&mut state, &mut kitchen, Ingredient::YellowCake, pos));
        assert!(kitchen.attempt().is_empty());
    }
}
