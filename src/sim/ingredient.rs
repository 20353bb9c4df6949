//! Ingredient identifiers and their stacking categories

use serde::{Deserialize, Serialize};

/// Stacking layer an ingredient belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Base,
    Frosting,
    Topping,
}

impl Category {
    /// The category that may be stacked on top of `top` (`None` is the bare plate)
    pub fn after(top: Option<Category>) -> Option<Category> {
        match top {
            None => Some(Category::Base),
            Some(Category::Base) => Some(Category::Frosting),
            Some(Category::Frosting) => Some(Category::Topping),
            Some(Category::Topping) => None,
        }
    }
}

/// Every ingredient that can appear on the shelf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ingredient {
    ChocolateCake,
    YellowCake,
    ChocolateFrosting,
    MatchaFrosting,
    StrawberryFrosting,
    Candles,
    Sprinkles,
    Strawberry,
}

/// Asset code of the empty plate
pub const PLATE_CODE: &str = "p";

pub const BASES: [Ingredient; 2] = [Ingredient::ChocolateCake, Ingredient::YellowCake];

pub const FROSTINGS: [Ingredient; 3] = [
    Ingredient::ChocolateFrosting,
    Ingredient::MatchaFrosting,
    Ingredient::StrawberryFrosting,
];

pub const TOPPINGS: [Ingredient; 3] = [
    Ingredient::Candles,
    Ingredient::Sprinkles,
    Ingredient::Strawberry,
];

impl Ingredient {
    pub const COUNT: usize = 8;

    pub const ALL: [Ingredient; Self::COUNT] = [
        Ingredient::ChocolateCake,
        Ingredient::YellowCake,
        Ingredient::ChocolateFrosting,
        Ingredient::MatchaFrosting,
        Ingredient::StrawberryFrosting,
        Ingredient::Candles,
        Ingredient::Sprinkles,
        Ingredient::Strawberry,
    ];

    pub fn category(&self) -> Category {
        match self {
            Ingredient::ChocolateCake | Ingredient::YellowCake => Category::Base,
            Ingredient::ChocolateFrosting
            | Ingredient::MatchaFrosting
            | Ingredient::StrawberryFrosting => Category::Frosting,
            Ingredient::Candles | Ingredient::Sprinkles | Ingredient::Strawberry => {
                Category::Topping
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Ingredient::ChocolateCake => "chocolate_cake",
            Ingredient::YellowCake => "yellow_cake",
            Ingredient::ChocolateFrosting => "chocolate_frosting",
            Ingredient::MatchaFrosting => "matcha_frosting",
            Ingredient::StrawberryFrosting => "strawberry_frosting",
            Ingredient::Candles => "candles",
            Ingredient::Sprinkles => "sprinkles",
            Ingredient::Strawberry => "strawberry",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_str() == name)
    }

    /// Short code used in combo sprite file names
    pub fn asset_code(&self) -> &'static str {
        match self {
            Ingredient::ChocolateCake => "cc",
            Ingredient::YellowCake => "yc",
            Ingredient::ChocolateFrosting => "cf",
            Ingredient::MatchaFrosting => "mf",
            Ingredient::StrawberryFrosting => "sf",
            Ingredient::Candles => "c",
            Ingredient::Sprinkles => "sp",
            Ingredient::Strawberry => "st",
        }
    }

    /// Dense index for per-ingredient tables
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Sprite key for a plate carrying `stack`, e.g. `p_cc_mf_st`
pub fn asset_key(stack: &[Ingredient]) -> String {
    let mut key = String::from(PLATE_CODE);
    for ingredient in stack {
        key.push('_');
        key.push_str(ingredient.asset_code());
    }
    key
}
