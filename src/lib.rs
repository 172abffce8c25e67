//! Brick Invaders - A brick-breaker arcade game with an invader phase
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, layouts, collisions, phases)
//! - `renderer`: Drawing seam (`Surface` trait) plus a vertex-batch backend
//! - `game`: Frame driver (tick, draw, game over, restart)
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences

pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, LoopStatus};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game rule constants (not tunable)
pub mod consts {
    /// Nominal frame duration (the host schedules ~60 frames per second)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Points for destroying each brick variant
    pub const PLAIN_POINTS: u32 = 10;
    pub const GOLDEN_POINTS: u32 = 20;
    pub const SILVER_POINTS: u32 = 15;
    pub const CANNON_POINTS: u32 = 10;
    /// Points per brick caught in a bonus explosion
    pub const EXPLOSION_POINTS: u32 = 10;

    /// Hits needed to destroy multi-hit bricks
    pub const SILVER_MAX_HITS: u8 = 2;
    pub const CANNON_MAX_HITS: u8 = 8;

    /// Estimated glyph width used to decide when a message has left the screen
    pub const MESSAGE_CHAR_WIDTH: f32 = 10.0;

    /// Lives count that earns the "cat" message
    pub const CAT_LIVES: u32 = 10;

    /// Starting hues (degrees)
    pub const GLOBAL_START_HUE: f32 = 120.0;
    pub const BALL_START_HUE: f32 = 240.0;
    pub const PADDLE_START_HUE: f32 = 240.0;
}

/// Advance a hue by one degree, wrapping to 0 once it passes 360
#[inline]
pub fn advance_hue(hue: f32) -> f32 {
    let next = hue + 1.0;
    if next > 360.0 { 0.0 } else { next }
}
