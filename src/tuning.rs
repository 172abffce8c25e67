//! Data-driven game balance
//!
//! Every gameplay number that is a matter of feel rather than a rule lives
//! here. Loaded from JSON (missing fields take defaults) or built with
//! `Tuning::default()`.

use serde::{Deserialize, Serialize};

/// Inclusive range of integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Half-open range of durations in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min_ms: f32,
    pub max_ms: f32,
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ball ===
    /// Per-axis ball speed (px/frame)
    pub ball_speed: f32,
    /// Ball radius as a fraction of playfield width
    pub ball_radius_ratio: f32,

    // === Paddle ===
    /// Paddle width as a fraction of playfield width
    pub paddle_width_ratio: f32,
    pub paddle_height: f32,
    /// Distance from the bottom edge to the paddle's top
    pub paddle_bottom_offset: f32,

    pub starting_lives: u32,

    // === Bricks ===
    pub brick_height: f32,
    pub brick_margin: f32,
    /// Y of the first brick row
    pub brick_top: f32,
    pub rows: CountRange,
    pub cols: CountRange,
    /// Horizontal drift after a Moving brick is hit (px/frame)
    pub drift_speed: f32,

    // === Invader phase ===
    /// Every Nth round is an invader round
    pub invader_round_interval: u32,
    /// Formation speed while moving (px/frame)
    pub invader_speed: f32,
    /// Dwell time in each motion state
    pub invader_dwell: DurationRange,
    /// Chance per moving frame that a cannon fires
    pub laser_fire_chance: f64,
    pub laser_speed: f32,
    pub laser_trail_length: usize,

    // === Pickups ===
    pub item_fall_speed: f32,
    pub item_size: f32,
    /// A bonus drops at every multiple of this many lives
    pub bonus_lives_interval: u32,
    pub bonus_duration_ms: f32,
    /// Explosion radius as a fraction of (width + height)
    pub explosion_radius_factor: f32,

    // === Messages ===
    pub message_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_speed: 4.0,
            ball_radius_ratio: 0.015,

            paddle_width_ratio: 0.15,
            paddle_height: 8.0,
            paddle_bottom_offset: 25.0,

            starting_lives: 3,

            brick_height: 15.0,
            brick_margin: 5.0,
            brick_top: 40.0,
            rows: CountRange::new(5, 12),
            cols: CountRange::new(10, 19),
            drift_speed: 5.0,

            invader_round_interval: 2,
            invader_speed: 2.0,
            invader_dwell: DurationRange {
                min_ms: 1000.0,
                max_ms: 3000.0,
            },
            laser_fire_chance: 0.01,
            laser_speed: 4.0,
            laser_trail_length: 10,

            item_fall_speed: 2.0,
            item_size: 3.0,
            bonus_lives_interval: 5,
            bonus_duration_ms: 30_000.0,
            explosion_radius_factor: 0.085,

            message_speed: 4.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values that would break the simulation, logging each correction
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        // Lengths, speeds and durations the simulation divides by or steps with
        positive(&mut self.ball_speed, defaults.ball_speed, "ball_speed");
        positive(&mut self.ball_radius_ratio, defaults.ball_radius_ratio, "ball_radius_ratio");
        positive(&mut self.paddle_width_ratio, defaults.paddle_width_ratio, "paddle_width_ratio");
        positive(&mut self.paddle_height, defaults.paddle_height, "paddle_height");
        positive(&mut self.brick_height, defaults.brick_height, "brick_height");
        positive(&mut self.laser_speed, defaults.laser_speed, "laser_speed");
        positive(&mut self.item_fall_speed, defaults.item_fall_speed, "item_fall_speed");
        positive(&mut self.item_size, defaults.item_size, "item_size");
        positive(&mut self.bonus_duration_ms, defaults.bonus_duration_ms, "bonus_duration_ms");
        positive(&mut self.message_speed, defaults.message_speed, "message_speed");

        // Zero is allowed
        non_negative(
            &mut self.paddle_bottom_offset,
            defaults.paddle_bottom_offset,
            "paddle_bottom_offset",
        );
        non_negative(&mut self.brick_margin, defaults.brick_margin, "brick_margin");
        non_negative(&mut self.brick_top, defaults.brick_top, "brick_top");
        non_negative(&mut self.drift_speed, defaults.drift_speed, "drift_speed");
        non_negative(&mut self.invader_speed, defaults.invader_speed, "invader_speed");
        non_negative(
            &mut self.explosion_radius_factor,
            defaults.explosion_radius_factor,
            "explosion_radius_factor",
        );
        non_negative(
            &mut self.invader_dwell.min_ms,
            defaults.invader_dwell.min_ms,
            "invader_dwell.min_ms",
        );
        non_negative(
            &mut self.invader_dwell.max_ms,
            defaults.invader_dwell.max_ms,
            "invader_dwell.max_ms",
        );
        if self.invader_dwell.max_ms < self.invader_dwell.min_ms {
            log::warn!("tuning: invader_dwell range is inverted, swapping bounds");
            std::mem::swap(&mut self.invader_dwell.min_ms, &mut self.invader_dwell.max_ms);
        }

        self.rows = grid_range(self.rows, "rows");
        self.cols = grid_range(self.cols, "cols");

        if self.invader_round_interval == 0 {
            log::warn!("tuning: invader_round_interval must be positive, using default");
            self.invader_round_interval = defaults.invader_round_interval;
        }
        if self.bonus_lives_interval == 0 {
            log::warn!("tuning: bonus_lives_interval must be positive, using default");
            self.bonus_lives_interval = defaults.bonus_lives_interval;
        }
        if self.laser_fire_chance.is_nan() {
            log::warn!("tuning: laser_fire_chance is not a number, using default");
            self.laser_fire_chance = defaults.laser_fire_chance;
        } else if !(0.0..=1.0).contains(&self.laser_fire_chance) {
            log::warn!("tuning: laser_fire_chance outside [0, 1], clamping");
            self.laser_fire_chance = self.laser_fire_chance.clamp(0.0, 1.0);
        }
        if self.laser_trail_length == 0 {
            log::warn!("tuning: laser_trail_length must be at least 1, using 1");
            self.laser_trail_length = 1;
        } else if self.laser_trail_length > MAX_TRAIL_LENGTH {
            log::warn!("tuning: laser_trail_length capped at {MAX_TRAIL_LENGTH}");
            self.laser_trail_length = MAX_TRAIL_LENGTH;
        }

        self
    }
}

/// Largest row or column count a layout may use
pub const MAX_GRID_CELLS: u32 = 64;
/// Longest laser trail kept
pub const MAX_TRAIL_LENGTH: usize = 256;

/// Reset a value that must be finite and > 0
fn positive(value: &mut f32, default: f32, name: &str) {
    if !(value.is_finite() && *value > 0.0) {
        log::warn!("tuning: {name} must be a positive number (got {value}), using default");
        *value = default;
    }
}

/// Reset a value that must be finite and >= 0
fn non_negative(value: &mut f32, default: f32, name: &str) {
    if !(value.is_finite() && *value >= 0.0) {
        log::warn!("tuning: {name} must be a non-negative number (got {value}), using default");
        *value = default;
    }
}

/// Keep a grid range within [1, MAX_GRID_CELLS] and ordered
fn grid_range(mut range: CountRange, name: &str) -> CountRange {
    if range.min == 0 {
        log::warn!("tuning: {name}.min must be at least 1, using 1");
        range.min = 1;
    }
    if range.min > MAX_GRID_CELLS {
        log::warn!("tuning: {name}.min capped at {MAX_GRID_CELLS}");
        range.min = MAX_GRID_CELLS;
    }
    if range.max > MAX_GRID_CELLS {
        log::warn!("tuning: {name}.max capped at {MAX_GRID_CELLS}");
        range.max = MAX_GRID_CELLS;
    }
    if range.max < range.min {
        log::warn!("tuning: {name}.max < {name}.min, clamping to {}", range.min);
        range.max = range.min;
    }
    range
}
