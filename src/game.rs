//! Frame driver
//!
//! Hosts own a [`Game`] and call [`Game::frame`] once per animation frame
//! (or [`Game::step`] several times followed by [`Game::draw`] when they run
//! a fixed-step accumulator).

use crate::renderer::{Surface, draw_frame, draw_game_over};
use crate::settings::Settings;
use crate::sim::{Bounds, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Outcome of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    Running,
    /// Lives exhausted; a click restarts
    GameOver,
}

/// A game session plus its presentation settings
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    settings: Settings,
}

impl Game {
    pub fn new(bounds: Bounds, seed: u64, tuning: Tuning, settings: Settings) -> Self {
        log::info!(
            "New game: {}x{} playfield, seed {}",
            bounds.width,
            bounds.height,
            seed
        );
        Self {
            state: GameState::new(bounds, seed, tuning),
            settings,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn status(&self) -> LoopStatus {
        if self.state.is_game_over() {
            LoopStatus::GameOver
        } else {
            LoopStatus::Running
        }
    }

    /// Advance the simulation one frame; a click on the game over screen
    /// restarts first
    pub fn step(&mut self, input: &TickInput, dt: f32) -> LoopStatus {
        if self.state.is_game_over() {
            if !input.click {
                return LoopStatus::GameOver;
            }
            self.restart();
        }
        tick(&mut self.state, input, dt);
        self.status()
    }

    /// Paint the playfield, or the game over screen once lives run out
    pub fn draw(&self, surface: &mut dyn Surface) {
        match self.status() {
            LoopStatus::Running => draw_frame(&self.state, &self.settings, surface),
            LoopStatus::GameOver => draw_game_over(&self.state, &self.settings, surface),
        }
    }

    /// One full frame: step then draw
    pub fn frame(&mut self, input: &TickInput, dt: f32, surface: &mut dyn Surface) -> LoopStatus {
        let status = self.step(input, dt);
        self.draw(surface);
        status
    }

    /// Reset the whole session: score, lives, round, layout, items, bonus
    pub fn restart(&mut self) {
        log::info!(
            "Restarting after round {} with score {}",
            self.state.round,
            self.state.score
        );
        self.state.reset();
    }
}
