//! Demo player: stacks the current order, sometimes fumbling it

use rand::Rng;

use super::ingredient::{BASES, Category, FROSTINGS, Ingredient, TOPPINGS};
use super::kitchen::Kitchen;
use super::machine;
use super::state::GameState;
use super::tick::{Key, handle_key};

/// Assemble this round's cake on the plate and submit it. With probability
/// `mistake_rate` one layer is swapped for a different ingredient of the
/// same kind. Returns false if the round was not open.
pub fn serve_round<R: Rng>(
    state: &mut GameState,
    kitchen: &mut Kitchen,
    rng: &mut R,
    mistake_rate: f64,
    width: f32,
) -> bool {
    let mut cake: Vec<Ingredient> = state.order.as_slice().to_vec();
    if !cake.is_empty() && rng.random_bool(mistake_rate.clamp(0.0, 1.0)) {
        let layer = rng.random_range(0..cake.len());
        cake[layer] = swap_for_sibling(cake[layer]);
    }

    for ingredient in cake {
        let pos = kitchen.plate_pos();
        if !machine::drop_ingredient(state, kitchen, ingredient, pos) {
            return false;
        }
    }
    handle_key(state, kitchen, Key::Submit, width)
}

fn swap_for_sibling(ingredient: Ingredient) -> Ingredient {
    let set: &[Ingredient] = match ingredient.category() {
        Category::Base => &BASES,
        Category::Frosting => &FROSTINGS,
        Category::Topping => &TOPPINGS,
    };
    let i = set.iter().position(|&s| s == ingredient).unwrap_or(0);
    set[(i + 1) % set.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::order::Verdict;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const WIDTH: f32 = 960.0;

    #[test]
    fn test_flawless_serve_is_correct() {
        let mut state = GameState::new(3);
        let mut kitchen = Kitchen::new(WIDTH);
        let mut rng = Pcg32::seed_from_u64(3);
        handle_key(&mut state, &mut kitchen, Key::Space, WIDTH);

        assert!(serve_round(&mut state, &mut kitchen, &mut rng, 0.0, WIDTH));
        assert_eq!(state.last_verdict, Some(Verdict::Correct));
    }

    #[test]
    fn test_fumbled_serve_is_incorrect() {
        let mut state = GameState::new(3);
        let mut kitchen = Kitchen::new(WIDTH);
        let mut rng = Pcg32::seed_from_u64(3);
        handle_key(&mut state, &mut kitchen, Key::Space, WIDTH);

        assert!(serve_round(&mut state, &mut kitchen, &mut rng, 1.0, WIDTH));
        assert_eq!(state.last_verdict, Some(Verdict::Incorrect));
    }

    #[test]
    fn test_sibling_stays_in_category() {
        for ingredient in Ingredient::ALL {
            let sibling = swap_for_sibling(ingredient);
            assert_ne!(sibling, ingredient);
            assert_eq!(sibling.category(), ingredient.category());
        }
    }

    #[test]
    fn test_not_open_before_start() {
        let mut state = GameState::new(3);
        let mut kitchen = Kitchen::new(WIDTH);
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(!serve_round(&mut state, &mut kitchen, &mut rng, 0.0, WIDTH));
    }
}
