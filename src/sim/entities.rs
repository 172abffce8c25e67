//! Playfield entities and their per-frame behavior
//!
//! Entities only know about themselves, the playfield bounds and (for the
//! ball) the paddle. Anything that touches several entities at once lives in
//! `collision`, `phase` or `tick`.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Bounds;
use crate::advance_hue;
use crate::consts::*;
use crate::tuning::Tuning;

/// What happened to the ball during an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallEvent {
    /// Still in play
    InPlay,
    /// Fell past the bottom edge
    Missed,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Velocity in px/frame; each component is always ±speed
    pub vel: Vec2,
    pub radius: f32,
    pub speed: f32,
    /// Glow while a bonus is active
    pub glowing: bool,
    pub hue: f32,
}

impl Ball {
    pub fn new(bounds: Bounds, tuning: &Tuning) -> Self {
        let speed = tuning.ball_speed;
        Self {
            pos: bounds.center(),
            vel: Vec2::new(speed, -speed),
            radius: bounds.width * tuning.ball_radius_ratio,
            speed,
            glowing: false,
            hue: BALL_START_HUE,
        }
    }

    /// Re-center the ball and send it up and to the right
    pub fn reset(&mut self, bounds: Bounds) {
        self.pos = bounds.center();
        self.vel = Vec2::new(self.speed, -self.speed);
    }

    /// Move one frame, bouncing off walls and the paddle
    pub fn update(&mut self, bounds: Bounds, paddle: &Paddle) -> BallEvent {
        self.pos += self.vel;
        self.hue = advance_hue(self.hue);

        // Walls flip the component toward the interior so the ball can't stick
        if self.pos.x - self.radius < 0.0 {
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x + self.radius > bounds.width {
            self.vel.x = -self.vel.x.abs();
        }
        if self.pos.y - self.radius < 0.0 {
            self.vel.y = self.vel.y.abs();
        }

        if self.pos.y > bounds.height {
            return BallEvent::Missed;
        }

        // Paddle always sends the ball straight back up, no spin
        if paddle.touches(self) {
            self.vel.y = -self.speed;
        }

        BallEvent::InPlay
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub glowing: bool,
    pub hue: f32,
}

impl Paddle {
    pub fn new(bounds: Bounds, tuning: &Tuning) -> Self {
        let width = bounds.width * tuning.paddle_width_ratio;
        Self {
            pos: Vec2::new(
                bounds.width / 2.0 - width / 2.0,
                bounds.height - tuning.paddle_bottom_offset,
            ),
            width,
            height: tuning.paddle_height,
            glowing: false,
            hue: PADDLE_START_HUE,
        }
    }

    /// Center the paddle under a pointer x (clamped on the next update)
    pub fn follow_pointer(&mut self, x: f32) {
        self.pos.x = x - self.width / 2.0;
    }

    /// Keep the paddle fully on-screen
    pub fn update(&mut self, bounds: Bounds) {
        if !self.pos.x.is_finite() {
            self.pos.x = 0.0;
        }
        let max_x = (bounds.width - self.width).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
        self.hue = advance_hue(self.hue);
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    /// Ball overlaps the paddle band and its center is within the paddle span
    pub fn touches(&self, ball: &Ball) -> bool {
        ball.pos.y + ball.radius > self.pos.y
            && ball.pos.y - ball.radius < self.bottom()
            && ball.pos.x > self.pos.x
            && ball.pos.x < self.right()
    }
}

/// Side effect a destroyed brick has on the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickEffect {
    /// Every brick starts drifting sideways
    StartDrift,
}

/// Result of one hit on a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub destroyed: bool,
    pub points: u32,
    pub effect: Option<BrickEffect>,
}

/// Brick variants and their behavior table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Plain,
    /// One hit, double points
    Golden,
    /// Two hits
    Silver { hits: u8 },
    /// One hit, no points, sets every brick drifting
    Moving,
    /// Eight hits, fires lasers during invader rounds
    Cannon { hits: u8 },
}

impl BrickKind {
    pub const fn silver() -> Self {
        BrickKind::Silver { hits: 0 }
    }

    pub const fn cannon() -> Self {
        BrickKind::Cannon { hits: 0 }
    }

    /// Hits needed to destroy this variant
    pub const fn max_hits(&self) -> u8 {
        match self {
            BrickKind::Silver { .. } => SILVER_MAX_HITS,
            BrickKind::Cannon { .. } => CANNON_MAX_HITS,
            _ => 1,
        }
    }

    /// Hits taken so far (single-hit variants never carry any)
    pub const fn hits(&self) -> u8 {
        match self {
            BrickKind::Silver { hits } | BrickKind::Cannon { hits } => *hits,
            _ => 0,
        }
    }

    /// Points awarded when this variant is destroyed
    pub const fn points(&self) -> u32 {
        match self {
            BrickKind::Plain => PLAIN_POINTS,
            BrickKind::Golden => GOLDEN_POINTS,
            BrickKind::Silver { .. } => SILVER_POINTS,
            BrickKind::Moving => 0,
            BrickKind::Cannon { .. } => CANNON_POINTS,
        }
    }

    pub const fn effect(&self) -> Option<BrickEffect> {
        match self {
            BrickKind::Moving => Some(BrickEffect::StartDrift),
            _ => None,
        }
    }

    pub const fn start_hue(&self) -> f32 {
        match self {
            BrickKind::Golden => 50.0,
            BrickKind::Moving => 180.0,
            _ => 0.0,
        }
    }

    pub const fn is_cannon(&self) -> bool {
        matches!(self, BrickKind::Cannon { .. })
    }
}

/// A brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BrickKind,
    pub hue: f32,
}

impl Brick {
    pub fn new(pos: Vec2, size: Vec2, kind: BrickKind) -> Self {
        Self {
            pos,
            size,
            kind,
            hue: kind.start_hue(),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Where pickups dropped by this brick appear
    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Apply one hit from the behavior table
    pub fn hit(&mut self) -> HitOutcome {
        if let BrickKind::Silver { hits } | BrickKind::Cannon { hits } = &mut self.kind {
            *hits = hits.saturating_add(1);
        }

        let destroyed = self.kind.hits() >= self.kind.max_hits() || self.kind.max_hits() == 1;
        if destroyed {
            HitOutcome {
                destroyed,
                points: self.kind.points(),
                effect: self.kind.effect(),
            }
        } else {
            HitOutcome {
                destroyed,
                points: 0,
                effect: None,
            }
        }
    }
}

/// Falling pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Extra life
    Heart,
    /// Timed explosion power-up
    Bonus,
}

/// A pickup falling toward the paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    pub kind: ItemKind,
    pub pos: Vec2,
    pub speed: f32,
    /// Sprite pixel size
    pub size: f32,
}

impl FallingItem {
    pub fn new(kind: ItemKind, pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            kind,
            pos,
            speed: tuning.item_fall_speed,
            size: tuning.item_size,
        }
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }
}

/// A laser fired by a cannon brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
    pub max_trail: usize,
}

/// Laser dimensions
pub const LASER_SIZE: Vec2 = Vec2::new(5.0, 10.0);

impl Laser {
    /// Spawn a laser whose top edge is centered on `muzzle`
    pub fn new(muzzle: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(muzzle.x - LASER_SIZE.x / 2.0, muzzle.y),
            vel: Vec2::new(0.0, tuning.laser_speed),
            size: LASER_SIZE,
            trail: VecDeque::with_capacity(tuning.laser_trail_length + 1),
            max_trail: tuning.laser_trail_length,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.trail.push_back(self.pos);
        while self.trail.len() > self.max_trail {
            self.trail.pop_front();
        }
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// A scrolling text notice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    /// Text baseline origin
    pub pos: Vec2,
    /// Leftward scroll (px/frame)
    pub speed: f32,
    /// Hue captured when the message was posted
    pub hue: f32,
    pub visible: bool,
}

impl Message {
    /// Start at the right edge, vertically centered
    pub fn new(text: impl Into<String>, bounds: Bounds, speed: f32, hue: f32) -> Self {
        Self {
            text: text.into(),
            pos: Vec2::new(bounds.width, bounds.height / 2.0),
            speed,
            hue,
            visible: true,
        }
    }

    pub fn update(&mut self) {
        self.pos.x -= self.speed;
        let width = self.text.chars().count() as f32 * MESSAGE_CHAR_WIDTH;
        if self.pos.x + width < 0.0 {
            self.visible = false;
        }
    }
}
