//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod layout;
pub mod phase;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{BrickHits, check_hundreds_increase};
pub use entities::{
    Ball, BallEvent, Brick, BrickEffect, BrickKind, FallingItem, HitOutcome, ItemKind, Laser,
    Message, Paddle,
};
pub use phase::{InvaderMotion, MotionState};
pub use state::{Bounds, GamePhase, GameState, LayoutKind, RoundKind};
pub use tick::{TickInput, tick};
pub use timer::{TimerEvent, TimerToken, Timers};
