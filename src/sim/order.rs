//! Order generation and attempt evaluation

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ingredient::{BASES, FROSTINGS, Ingredient, TOPPINGS, asset_key};

/// Target ingredient sequence for one round (base, then frosting, then topping)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Order(Vec<Ingredient>);

impl Order {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self(ingredients)
    }

    pub fn as_slice(&self) -> &[Ingredient] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sprite key of the finished cake, e.g. `p_cc_sf`
    pub fn asset_key(&self) -> String {
        asset_key(&self.0)
    }
}

/// Outcome of comparing an attempt against the current order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Pick a random order for `level`.
///
/// Level 1 orders are a bare base, level 2 adds a frosting and level 3
/// (and above) adds a topping.
pub fn generate<R: Rng>(level: u8, rng: &mut R) -> Order {
    let mut ingredients = Vec::with_capacity(3);
    ingredients.push(BASES[rng.random_range(0..BASES.len())]);
    if level >= 2 {
        ingredients.push(FROSTINGS[rng.random_range(0..FROSTINGS.len())]);
    }
    if level >= 3 {
        ingredients.push(TOPPINGS[rng.random_range(0..TOPPINGS.len())]);
    }
    Order(ingredients)
}

/// Exact match only: same length and same ingredient at every position
pub fn evaluate(order: &Order, attempt: &[Ingredient]) -> Verdict {
    if attempt.len() != order.len() {
        return Verdict::Incorrect;
    }
    if order.0.iter().zip(attempt).any(|(want, got)| want != got) {
        return Verdict::Incorrect;
    }
    Verdict::Correct
}
