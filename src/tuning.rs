//! Data-driven game balance
//!
//! Speeds are fractions of the play-field width moved per tick, so they
//! survive a window resize unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
    #[error("level 3 threshold ({level_three}) must be above level 2 threshold ({level_two})")]
    ThresholdOrder { level_two: u64, level_three: u64 },
}

/// Scoring thresholds and conveyor speeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Points for a correct cake
    pub points_per_order: u64,
    /// Score that promotes level 1 to level 2
    pub level_two_score: u64,
    /// Score that promotes level 2 to level 3
    pub level_three_score: u64,
    /// Starting conveyor speed
    pub default_speed: f32,
    /// Speed the plate leaves with after a submit
    pub submitted_speed: f32,
    /// Added per correct cake while on level 2
    pub level_two_speed_step: f32,
    /// Conveyor speed on reaching level 3
    pub level_three_speed: f32,
    /// Level 3 speed-up unit
    pub level_three_speed_step: f32,
    /// Level 3 speeds up whenever the score is a multiple of this
    pub level_three_interval: u64,
    /// Level 3 speed-up grows by one unit every this many points
    pub level_three_divisor: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            points_per_order: 100,
            level_two_score: 400,
            level_three_score: 1000,
            default_speed: 0.002,
            submitted_speed: 0.03,
            level_two_speed_step: 0.00048,
            level_three_speed: 0.0033,
            level_three_speed_step: 0.00024,
            level_three_interval: 300,
            level_three_divisor: 500,
        }
    }
}

impl Tuning {
    /// Parse overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let speeds = [
            ("default_speed", self.default_speed),
            ("submitted_speed", self.submitted_speed),
            ("level_three_speed", self.level_three_speed),
        ];
        for (field, value) in speeds {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field });
            }
        }

        // A zero step just holds the conveyor speed; below zero it runs backwards
        let steps = [
            ("level_two_speed_step", self.level_two_speed_step),
            ("level_three_speed_step", self.level_three_speed_step),
        ];
        for (field, value) in steps {
            if !(value >= 0.0) {
                return Err(TuningError::Negative { field });
            }
        }

        let counts = [
            ("points_per_order", self.points_per_order),
            ("level_three_interval", self.level_three_interval),
            ("level_three_divisor", self.level_three_divisor),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(TuningError::NotPositive { field });
            }
        }

        if self.level_three_score <= self.level_two_score {
            return Err(TuningError::ThresholdOrder {
                level_two: self.level_two_score,
                level_three: self.level_three_score,
            });
        }
        Ok(())
    }
}
