//! Collision tests and scoring rules
//!
//! Pure functions over entities: nothing here touches `GameState`, so the
//! step in `tick` decides what each result means for the session.

use glam::Vec2;

use super::entities::{Ball, Brick, BrickEffect, FallingItem, Laser, Paddle};

/// Ball-vs-brick results for one frame
#[derive(Debug, Clone, Default)]
pub struct BrickHits {
    /// Bricks the ball overlapped
    pub touched: u32,
    /// Bricks removed by those hits
    pub destroyed: u32,
    /// Points from destroyed bricks
    pub points: u32,
    /// Drop point of the last brick touched (bottom-center)
    pub last_touched: Option<Vec2>,
    /// Special effects of destroyed bricks, in collection order
    pub effects: Vec<BrickEffect>,
}

impl BrickHits {
    pub fn any(&self) -> bool {
        self.touched > 0
    }
}

/// Axis-aligned overlap between the ball's bounding box and a brick
pub fn ball_overlaps_brick(ball: &Ball, brick: &Brick) -> bool {
    ball.pos.y - ball.radius < brick.pos.y + brick.size.y
        && ball.pos.y + ball.radius > brick.pos.y
        && ball.pos.x + ball.radius > brick.pos.x
        && ball.pos.x - ball.radius < brick.right()
}

/// Hit every overlapping brick once, remove the destroyed ones and bounce
/// the ball vertically once no matter how many bricks it touched.
pub fn resolve_ball_bricks(ball: &mut Ball, bricks: &mut Vec<Brick>) -> BrickHits {
    let mut hits = BrickHits::default();
    let mut destroyed = vec![false; bricks.len()];

    for (index, brick) in bricks.iter_mut().enumerate() {
        if !ball_overlaps_brick(ball, brick) {
            continue;
        }
        hits.touched += 1;
        hits.last_touched = Some(brick.bottom_center());

        let outcome = brick.hit();
        if outcome.destroyed {
            destroyed[index] = true;
            hits.destroyed += 1;
            hits.points += outcome.points;
        }
        if let Some(effect) = outcome.effect {
            hits.effects.push(effect);
        }
    }

    if hits.any() {
        ball.vel.y = -ball.vel.y;
        let mut index = 0;
        bricks.retain(|_| {
            let keep = !destroyed[index];
            index += 1;
            keep
        });
    }

    hits
}

/// Remove every brick whose center lies strictly within `radius` of `center`;
/// returns how many were destroyed
pub fn explode_bricks(bricks: &mut Vec<Brick>, center: Vec2, radius: f32) -> u32 {
    let before = bricks.len();
    bricks.retain(|brick| brick.center().distance(center) >= radius);
    (before - bricks.len()) as u32
}

/// True when adding `points_won` crosses into a new hundred
pub fn check_hundreds_increase(old_score: u64, points_won: u64) -> bool {
    let new_score = old_score + points_won;
    new_score / 100 > old_score / 100
}

/// Falling item reached the paddle band within its span
pub fn item_caught(item: &FallingItem, paddle: &Paddle) -> bool {
    let sprite_bottom = item.pos.y + item.size * 8.0;
    sprite_bottom > paddle.pos.y
        && item.pos.y < paddle.bottom()
        && item.pos.x > paddle.pos.x
        && item.pos.x < paddle.right()
}

/// Laser's bottom edge is inside the paddle band and it overlaps horizontally
pub fn laser_hits_paddle(laser: &Laser, paddle: &Paddle) -> bool {
    laser.bottom() > paddle.pos.y
        && laser.pos.y < paddle.bottom()
        && laser.right() > paddle.pos.x
        && laser.pos.x < paddle.right()
}
