//! Headless kitchen scene: the plate's trip along the conveyor, the stack
//! being assembled on it, and the shelf pantry ingredients are dragged from.
//!
//! The renderer reads positions from here; it never owns game rules.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ingredient::{Category, Ingredient, asset_key};
use crate::consts::*;

/// Why a drop onto the plate was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRefusal {
    /// Round already submitted or finished
    RoundClosed,
    /// No copies left on the shelf
    OutOfStock,
    /// Released outside the plate's drop zone
    MissedPlate,
    /// Wrong layer for the current top of the stack
    WrongLayer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kitchen {
    /// Plate center in world units (origin at screen center)
    plate_pos: Vec2,
    /// Ingredients on the plate, bottom first
    stack: Vec<Ingredient>,
    /// Shelf copies left per ingredient (indexed by `Ingredient::index`)
    pantry: [u8; Ingredient::COUNT],
    at_end: bool,
    submitted: bool,
}

impl Kitchen {
    /// Fresh kitchen with the plate at the start of the track
    pub fn new(width: f32) -> Self {
        Self {
            plate_pos: Vec2::new(-width * TRACK_EXTENT, PLATE_Y),
            stack: Vec::with_capacity(3),
            pantry: [PANTRY_STOCK; Ingredient::COUNT],
            at_end: false,
            submitted: false,
        }
    }

    /// Advance the plate one tick. Reaching the far end of the track flags
    /// the round as finished and wraps the plate back to the start.
    pub fn update(&mut self, step_size: f32, width: f32) {
        let end = width * TRACK_EXTENT;
        if self.plate_pos.x >= end {
            self.plate_pos.x = -end;
            self.at_end = true;
        } else {
            self.plate_pos.x += step_size;
        }
    }

    pub fn plate_pos(&self) -> Vec2 {
        self.plate_pos
    }

    /// Current attempt: the stack minus the plate itself
    pub fn attempt(&self) -> &[Ingredient] {
        &self.stack
    }

    /// Sprite key of what is currently on the plate
    pub fn plate_asset_key(&self) -> String {
        asset_key(&self.stack)
    }

    pub fn at_end(&self) -> bool {
        self.at_end
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    pub fn stock(&self, ingredient: Ingredient) -> u8 {
        self.pantry[ingredient.index()]
    }

    fn top_category(&self) -> Option<Category> {
        self.stack.last().map(|i| i.category())
    }

    /// Whether `pos` lies within the plate's drop zone. The zone grows
    /// upward as the cake gets taller.
    pub fn in_drop_zone(&self, pos: Vec2) -> bool {
        let bonus = match self.top_category() {
            Some(Category::Base) => DROP_BASE_BONUS,
            Some(Category::Frosting) => DROP_FROSTING_BONUS,
            _ => 0.0,
        };
        let d = pos - self.plate_pos;
        d.x.abs() <= DROP_HALF_WIDTH && d.y >= -DROP_BELOW && d.y <= DROP_ABOVE + bonus
    }

    /// Try to stack `ingredient` released at `pos`
    pub fn drop_ingredient(&mut self, ingredient: Ingredient, pos: Vec2) -> Result<(), DropRefusal> {
        if self.submitted || self.at_end {
            return Err(DropRefusal::RoundClosed);
        }
        if self.stock(ingredient) == 0 {
            return Err(DropRefusal::OutOfStock);
        }
        if !self.in_drop_zone(pos) {
            return Err(DropRefusal::MissedPlate);
        }
        if Category::after(self.top_category()) != Some(ingredient.category()) {
            return Err(DropRefusal::WrongLayer);
        }

        self.pantry[ingredient.index()] -= 1;
        self.stack.push(ingredient);
        Ok(())
    }

    /// Put ingredients back on the shelf
    pub fn replenish_ingredients(&mut self, ingredients: &[Ingredient]) {
        for ingredient in ingredients {
            let slot = &mut self.pantry[ingredient.index()];
            *slot = (*slot + 1).min(PANTRY_STOCK);
        }
    }

    /// Empty the plate and open a new round. Does not restock the shelf.
    pub fn clear_order(&mut self) {
        self.stack.clear();
        self.at_end = false;
        self.submitted = false;
    }

    /// Back to the initial layout (new game)
    pub fn reset(&mut self, width: f32) {
        *self = Self::new(width);
    }
}
