//! Game state and session-level types
//!
//! `GameState` owns everything the simulation mutates. It is passed
//! explicitly into `tick`; there is no ambient global state.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Ball, Brick, FallingItem, Laser, Message, Paddle};
use super::layout;
use super::phase::InvaderMotion;
use super::timer::{TimerToken, Timers};
use crate::consts::GLOBAL_START_HUE;
use crate::tuning::Tuning;

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Bonus explosion radius, relative to screen size
    pub fn explosion_radius(&self, factor: f32) -> f32 {
        (self.width + self.height) * factor
    }
}

/// Whether the game is still being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Lives exhausted; waiting for a restart
    GameOver,
}

/// Kind of the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundKind {
    Normal,
    /// Moving formation with laser-firing cannons
    Invader,
}

/// Which factory produced the current bricks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    Random,
    Heart,
    Invader,
}

/// Explosion power-up state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BonusState {
    pub active: bool,
    /// Expiry timer of the current activation
    pub timer: Option<TimerToken>,
}

/// Sideways drift triggered by a Moving brick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickDrift {
    pub enabled: bool,
    /// -1.0 (left) or 1.0 (right), fixed for the session
    pub direction: f32,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub bounds: Bounds,
    pub tuning: Tuning,
    /// Injected RNG; every random draw in the simulation goes through it
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Round counter, starts at 1
    pub round: u32,
    pub round_kind: RoundKind,
    pub layout: LayoutKind,
    /// Invader rounds entered so far
    pub invader_rounds: u32,
    pub score: u64,
    pub lives: u32,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Bricks in layout order
    pub bricks: Vec<Brick>,
    /// Falling heart slot (at most one)
    pub heart: Option<FallingItem>,
    /// Falling bonus slot (at most one)
    pub bonus_item: Option<FallingItem>,
    pub lasers: Vec<Laser>,
    pub messages: Vec<Message>,
    pub bonus: BonusState,
    /// Life totals that already dropped a bonus this game
    pub bonus_lives_triggered: BTreeSet<u32>,
    pub drift: BrickDrift,
    pub invader: InvaderMotion,
    pub timers: Timers,
    /// Simulation clock in milliseconds
    pub clock_ms: f64,
    /// Global cosmetic hue (degrees)
    pub hue: f32,
    /// Simulation frame counter
    pub frame: u64,
}

impl GameState {
    /// Create a new game with the given seed
    pub fn new(bounds: Bounds, seed: u64, tuning: Tuning) -> Self {
        Self::with_rng(seed, bounds, tuning.sanitized(), Pcg32::seed_from_u64(seed))
    }

    fn with_rng(seed: u64, bounds: Bounds, tuning: Tuning, mut rng: Pcg32) -> Self {
        let bricks = layout::build_random_layout(bounds, &tuning, &mut rng);
        let drift_direction = if rng.random_bool(0.5) { -1.0 } else { 1.0 };

        Self {
            seed,
            bounds,
            rng,
            phase: GamePhase::Playing,
            round: 1,
            round_kind: RoundKind::Normal,
            layout: LayoutKind::Random,
            invader_rounds: 0,
            score: 0,
            lives: tuning.starting_lives,
            ball: Ball::new(bounds, &tuning),
            paddle: Paddle::new(bounds, &tuning),
            bricks,
            heart: None,
            bonus_item: None,
            lasers: Vec::new(),
            messages: Vec::new(),
            bonus: BonusState::default(),
            bonus_lives_triggered: BTreeSet::new(),
            drift: BrickDrift {
                enabled: false,
                direction: drift_direction,
            },
            invader: InvaderMotion::stopped(),
            timers: Timers::new(),
            clock_ms: 0.0,
            hue: GLOBAL_START_HUE,
            frame: 0,
            tuning,
        }
    }

    /// Start a fresh session; the RNG stream continues so layouts differ
    pub fn reset(&mut self) {
        let rng = self.rng.clone();
        *self = Self::with_rng(self.seed, self.bounds, self.tuning.clone(), rng);
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn bonus_active(&self) -> bool {
        self.bonus.active
    }

    /// Take one life; returns the lives left
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn enter_game_over(&mut self) {
        if self.phase != GamePhase::GameOver {
            log::info!(
                "Game over: score {} on round {} (seed {})",
                self.score,
                self.round,
                self.seed
            );
            self.phase = GamePhase::GameOver;
        }
    }

    /// Queue a scrolling message in the current hue
    pub fn post_message(&mut self, text: impl Into<String>) {
        let message = Message::new(text, self.bounds, self.tuning.message_speed, self.hue);
        log::debug!("message: {}", message.text);
        self.messages.push(message);
    }

    /// Replace the bricks with a freshly built layout
    pub fn load_layout(&mut self, kind: LayoutKind) {
        self.bricks = match kind {
            LayoutKind::Random => layout::build_random_layout(self.bounds, &self.tuning, &mut self.rng),
            LayoutKind::Heart => layout::build_heart_layout(self.bounds, &self.tuning, &mut self.rng),
            LayoutKind::Invader => {
                layout::build_invader_layout(self.bounds, &self.tuning, &mut self.rng)
            }
        };
        self.layout = kind;
        log::debug!("Loaded {:?} layout with {} bricks", kind, self.bricks.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(Bounds::new(800.0, 600.0), 7, Tuning::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.round, 1);
        assert_eq!(state.round_kind, RoundKind::Normal);
        assert!(!state.bricks.is_empty());
        assert!(state.heart.is_none() && state.bonus_item.is_none());
        assert!(state.drift.direction == 1.0 || state.drift.direction == -1.0);
    }

    #[test]
    fn test_lose_life_saturates() {
        let mut state = GameState::new(Bounds::new(800.0, 600.0), 7, Tuning::default());
        state.lives = 1;
        assert_eq!(state.lose_life(), 0);
        assert_eq!(state.lose_life(), 0);
    }

    #[test]
    fn test_reset_restores_session() {
        let mut state = GameState::new(Bounds::new(800.0, 600.0), 7, Tuning::default());
        state.score = 420;
        state.lives = 0;
        state.round = 5;
        state.bonus_lives_triggered.insert(5);
        state.post_message("hello");
        state.enter_game_over();

        state.reset();
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.round, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.bonus_lives_triggered.is_empty());
        assert!(state.messages.is_empty());
        assert!(!state.bricks.is_empty());
    }

    #[test]
    fn test_explosion_radius() {
        let bounds = Bounds::new(800.0, 600.0);
        assert!((bounds.explosion_radius(0.085) - 119.0).abs() < 1e-3);
    }
}
