//! Round progression and session-wide effects
//!
//! Owns the normal/invader round alternation, the invader formation's
//! stop-and-go motion, brick drift, the timed bonus and the message queue.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::{Brick, Laser};
use super::state::{GameState, LayoutKind, RoundKind};
use super::timer::{TimerEvent, TimerToken};
use crate::tuning::Tuning;

/// Invader formation motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    Stationary,
    Moving,
}

/// Stop-and-go motion of the invader formation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvaderMotion {
    pub state: MotionState,
    /// How long to stay in the current state
    pub dwell_ms: f32,
    /// Time spent in the current state
    pub elapsed_ms: f32,
    /// -1.0 (left) or 1.0 (right)
    pub direction: f32,
}

impl InvaderMotion {
    pub fn stopped() -> Self {
        Self {
            state: MotionState::Stationary,
            dwell_ms: 0.0,
            elapsed_ms: 0.0,
            direction: 1.0,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.state == MotionState::Moving
    }

    /// Switch state with a freshly drawn dwell time
    fn enter<R: Rng + ?Sized>(&mut self, state: MotionState, tuning: &Tuning, rng: &mut R) {
        self.state = state;
        self.elapsed_ms = 0.0;
        self.dwell_ms = draw_dwell(tuning, rng);
        if state == MotionState::Moving {
            self.direction = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        }
    }

    /// Advance the dwell clock, flipping state when it runs out
    fn advance<R: Rng + ?Sized>(&mut self, dt_ms: f32, tuning: &Tuning, rng: &mut R) {
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms >= self.dwell_ms {
            let next = match self.state {
                MotionState::Stationary => MotionState::Moving,
                MotionState::Moving => MotionState::Stationary,
            };
            self.enter(next, tuning, rng);
        }
    }
}

fn draw_dwell<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> f32 {
    let range = tuning.invader_dwell;
    if range.max_ms > range.min_ms {
        rng.random_range(range.min_ms..range.max_ms)
    } else {
        range.min_ms
    }
}

/// Start the next round once every brick is gone
pub fn advance_round_if_cleared(state: &mut GameState) -> Option<RoundKind> {
    if !state.bricks.is_empty() {
        return None;
    }

    if state.layout == LayoutKind::Heart {
        state.post_message("You broke my heart! :'-(");
    }

    state.round += 1;
    let kind = if state.round % state.tuning.invader_round_interval == 0 {
        enter_invader_round(state);
        RoundKind::Invader
    } else {
        enter_normal_round(state);
        RoundKind::Normal
    };
    log::info!("Round {} ({:?}), score {}", state.round, kind, state.score);
    Some(kind)
}

/// Build the invader formation and set it moving
pub fn enter_invader_round(state: &mut GameState) {
    state.invader_rounds += 1;
    if state.invader_rounds == 1 {
        state.post_message("Oh No !!! Please save the earth !!");
    } else {
        state.post_message("Another invader !!! Please save the earth again !!");
    }

    deactivate_bonus(state);
    state.drift.enabled = false;
    state.round_kind = RoundKind::Invader;
    state.load_layout(LayoutKind::Invader);

    let GameState {
        invader,
        tuning,
        rng,
        ..
    } = state;
    invader.enter(MotionState::Moving, tuning, rng);
}

/// Back to a random grid after an invader round
pub fn enter_normal_round(state: &mut GameState) {
    if state.invader_rounds == 1 {
        state.post_message("You saved us !");
    } else {
        state.post_message("you saved us again");
    }

    state.round_kind = RoundKind::Normal;
    state.drift.enabled = false;
    state.load_layout(LayoutKind::Random);
    state.invader = InvaderMotion::stopped();
}

/// Run the formation's motion state machine and cannon fire for one frame
pub fn update_invaders(state: &mut GameState, dt: f32) {
    if state.round_kind != RoundKind::Invader {
        return;
    }

    {
        let GameState {
            invader,
            tuning,
            rng,
            ..
        } = state;
        invader.advance(dt * 1000.0, tuning, rng);
    }

    if !state.invader.is_moving() {
        return;
    }

    translate_formation(state);

    if state.rng.random_bool(state.tuning.laser_fire_chance) {
        fire_cannon(state);
    }
}

/// Slide every brick sideways, bouncing off (and never past) either edge
fn translate_formation(state: &mut GameState) {
    if state.bricks.is_empty() {
        return;
    }

    let step = state.tuning.invader_speed * state.invader.direction;
    for brick in &mut state.bricks {
        brick.pos.x += step;
    }

    let left = state
        .bricks
        .iter()
        .map(|b| b.pos.x)
        .fold(f32::INFINITY, f32::min);
    let right = state
        .bricks
        .iter()
        .map(Brick::right)
        .fold(f32::NEG_INFINITY, f32::max);

    let shift = if left <= 0.0 {
        state.invader.direction = 1.0;
        -left
    } else if right >= state.bounds.width {
        state.invader.direction = -1.0;
        state.bounds.width - right
    } else {
        0.0
    };

    if shift != 0.0 {
        for brick in &mut state.bricks {
            brick.pos.x += shift;
        }
    }
}

/// A random surviving cannon fires from its bottom-center
fn fire_cannon(state: &mut GameState) {
    let cannons: Vec<usize> = state
        .bricks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.kind.is_cannon())
        .map(|(i, _)| i)
        .collect();
    if cannons.is_empty() {
        return;
    }

    let pick = cannons[state.rng.random_range(0..cannons.len())];
    let muzzle = state.bricks[pick].bottom_center();
    log::debug!("Cannon fired at ({:.0}, {:.0})", muzzle.x, muzzle.y);
    state.lasers.push(Laser::new(muzzle, &state.tuning));
}

/// Moving brick was hit: every brick starts drifting
pub fn start_drift(state: &mut GameState) {
    state.drift.enabled = true;
    state.post_message(
        "You spin me right round, baby, right round Like a record, baby, right round, round, round...",
    );
}

/// Drift bricks sideways, wrapping to the far edge once fully off-screen
pub fn update_drift(state: &mut GameState) {
    if !state.drift.enabled {
        return;
    }

    let step = state.tuning.drift_speed * state.drift.direction;
    let width = state.bounds.width;
    for brick in &mut state.bricks {
        brick.pos.x += step;
        if brick.pos.x < -brick.size.x {
            brick.pos.x = width;
        } else if brick.pos.x > width {
            brick.pos.x = -brick.size.x;
        }
    }
}

/// Turn on the explosion power-up and (re)start its expiry timer
pub fn activate_bonus(state: &mut GameState) {
    if let Some(previous) = state.bonus.timer.take() {
        state.timers.cancel(previous);
    }

    state.bonus.active = true;
    state.ball.glowing = true;
    state.paddle.glowing = true;
    state.post_message("Kaboom !!!");

    let token = state.timers.schedule(
        state.clock_ms,
        f64::from(state.tuning.bonus_duration_ms),
        TimerEvent::BonusExpired,
    );
    state.bonus.timer = Some(token);
    log::debug!("Bonus active until {:.0} ms ({token:?})", state.clock_ms + f64::from(state.tuning.bonus_duration_ms));
}

/// Turn the power-up off and drop any pending expiry
pub fn deactivate_bonus(state: &mut GameState) {
    if let Some(token) = state.bonus.timer.take() {
        state.timers.cancel(token);
    }
    state.bonus.active = false;
    state.ball.glowing = false;
    state.paddle.glowing = false;
}

/// Expiry for one bonus activation; ignored unless it is the current one
pub fn expire_bonus(state: &mut GameState, token: TimerToken) {
    if state.bonus.timer != Some(token) {
        log::debug!("Ignoring stale bonus timer {token:?}");
        return;
    }
    log::debug!("Bonus expired");
    deactivate_bonus(state);
}

/// Fire every timer due on the simulation clock
pub fn run_due_timers(state: &mut GameState) {
    for (token, event) in state.timers.drain_due(state.clock_ms) {
        match event {
            TimerEvent::BonusExpired => expire_bonus(state, token),
        }
    }
}

/// Scroll messages and drop the ones that left the screen
pub fn update_messages(state: &mut GameState) {
    for message in &mut state.messages {
        message.update();
    }
    state.messages.retain(|m| m.visible);
}
