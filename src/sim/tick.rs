//! Fixed timestep simulation tick
//!
//! One call advances the whole session by a single frame.

use glam::Vec2;

use super::collision::{self, BrickHits};
use super::entities::{BallEvent, BrickEffect, FallingItem, ItemKind};
use super::phase;
use super::state::GameState;
use crate::advance_hue;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x in playfield coordinates (mouse or touch)
    pub pointer_x: Option<f32>,
    /// Click/tap this frame; only the game loop acts on it (restart)
    pub click: bool,
    /// Demo mode - the paddle tracks the ball
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.is_game_over() {
        return;
    }

    state.frame += 1;
    state.clock_ms += f64::from(dt) * 1000.0;
    phase::run_due_timers(state);

    // Paddle first, so the ball bounces off where the player put it
    let pointer = if input.autopilot {
        Some(state.ball.pos.x)
    } else {
        input.pointer_x
    };
    if let Some(x) = pointer {
        state.paddle.follow_pointer(x);
    }
    state.paddle.update(state.bounds);

    if state.ball.update(state.bounds, &state.paddle) == BallEvent::Missed {
        let lives = state.lose_life();
        log::info!("Ball lost, {lives} lives left");
        if lives == 0 {
            state.enter_game_over();
            return;
        }
        state.ball.reset(state.bounds);
    }

    let hits = collision::resolve_ball_bricks(&mut state.ball, &mut state.bricks);
    if hits.destroyed > 0 {
        log::debug!(
            "Ball destroyed {} of {} bricks touched",
            hits.destroyed,
            hits.touched
        );
    }
    let mut points_won = u64::from(hits.points);
    for effect in &hits.effects {
        match effect {
            BrickEffect::StartDrift => phase::start_drift(state),
        }
    }
    if state.bonus.active && hits.any() {
        let radius = state.bounds.explosion_radius(state.tuning.explosion_radius_factor);
        let exploded = collision::explode_bricks(&mut state.bricks, state.ball.pos, radius);
        if exploded > 0 {
            log::debug!("Explosion destroyed {exploded} bricks");
        }
        points_won += u64::from(exploded * EXPLOSION_POINTS);
    }

    let old_score = state.score;
    state.score += points_won;

    drop_pickups(state, &hits, old_score, points_won);
    update_falling_items(state);

    phase::advance_round_if_cleared(state);
    phase::update_drift(state);
    phase::update_invaders(state, dt);

    if update_lasers(state) {
        return;
    }

    phase::update_messages(state);

    state.hue = advance_hue(state.hue);
    for brick in &mut state.bricks {
        brick.hue = advance_hue(brick.hue);
    }
}

/// Heart on every new hundred, Bonus once per qualifying life total
fn drop_pickups(state: &mut GameState, hits: &BrickHits, old_score: u64, points_won: u64) {
    let drop_at = hits.last_touched.unwrap_or(state.ball.pos);

    if state.heart.is_none() && collision::check_hundreds_increase(old_score, points_won) {
        log::debug!("Heart dropped at score {}", state.score);
        state.heart = Some(FallingItem::new(ItemKind::Heart, drop_at, &state.tuning));
    }

    if hits.any() {
        try_drop_bonus(state, drop_at);
    }
}

/// Spawn a Bonus if the current life total qualifies and hasn't dropped one yet
fn try_drop_bonus(state: &mut GameState, at: Vec2) -> bool {
    let interval = state.tuning.bonus_lives_interval;
    let qualifies = state.lives > 0 && state.lives % interval == 0;
    if !qualifies || state.bonus_item.is_some() {
        return false;
    }
    if !state.bonus_lives_triggered.insert(state.lives) {
        return false;
    }
    log::debug!("Bonus dropped at {} lives", state.lives);
    state.bonus_item = Some(FallingItem::new(ItemKind::Bonus, at, &state.tuning));
    true
}

/// Move the heart and bonus, applying whichever one the paddle catches
fn update_falling_items(state: &mut GameState) {
    if let Some(mut heart) = state.heart.take() {
        heart.update();
        if collision::item_caught(&heart, &state.paddle) {
            state.lives += 1;
            log::debug!("Heart caught, {} lives", state.lives);
            if state.lives == CAT_LIVES {
                state.post_message("More lives than a cat !");
            }
            let at = state.ball.pos;
            try_drop_bonus(state, at);
        } else if heart.pos.y <= state.bounds.height {
            state.heart = Some(heart);
        }
    }

    if let Some(mut bonus) = state.bonus_item.take() {
        bonus.update();
        if collision::item_caught(&bonus, &state.paddle) {
            phase::activate_bonus(state);
        } else if bonus.pos.y <= state.bounds.height {
            state.bonus_item = Some(bonus);
        }
    }
}

/// Move lasers and resolve paddle hits; returns true when the game ended
fn update_lasers(state: &mut GameState) -> bool {
    let height = state.bounds.height;
    let paddle = state.paddle.clone();
    let mut paddle_hits = 0u32;

    state.lasers.retain_mut(|laser| {
        laser.update();
        if collision::laser_hits_paddle(laser, &paddle) {
            paddle_hits += 1;
            return false;
        }
        laser.bottom() <= height
    });

    for _ in 0..paddle_hits {
        let lives = state.lose_life();
        log::info!("Laser hit the paddle, {lives} lives left");
        state.post_message("Beware the lazers, it hurts !!");
        if lives == 0 {
            state.enter_game_over();
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Brick, BrickKind, Laser};
    use crate::sim::state::{Bounds, GamePhase, LayoutKind, RoundKind};
    use crate::tuning::Tuning;

    fn new_state(seed: u64) -> GameState {
        GameState::new(Bounds::new(800.0, 600.0), seed, Tuning::default())
    }

    /// Park the ball mid-screen, clear of every brick and the paddle
    fn park_ball(state: &mut GameState) {
        state.bricks.retain(|b| b.pos.y < 200.0);
        state.ball.pos = Vec2::new(400.0, 400.0);
        state.ball.vel = Vec2::new(4.0, 4.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state(99999);
        let mut b = new_state(99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        for _ in 0..3000 {
            tick(&mut a, &input, FRAME_DT);
            tick(&mut b, &input, FRAME_DT);
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.round, b.round);
        assert_eq!(a.bricks.len(), b.bricks.len());
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.ball.vel, b.ball.vel);
    }

    #[test]
    fn test_pointer_moves_paddle() {
        let mut state = new_state(1);
        park_ball(&mut state);
        let input = TickInput {
            pointer_x: Some(100.0),
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);
        assert_eq!(state.paddle.pos.x, 100.0 - state.paddle.width / 2.0);

        let input = TickInput {
            pointer_x: Some(10_000.0),
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);
        assert_eq!(state.paddle.right(), 800.0);
    }

    #[test]
    fn test_miss_costs_a_life_and_recenters() {
        let mut state = new_state(2);
        state.ball.pos = Vec2::new(50.0, 598.0);
        state.ball.vel = Vec2::new(4.0, 4.0);
        state.paddle.pos.x = 600.0;

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.lives, 2);
        assert_eq!(state.ball.pos, state.bounds.center());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_miss_ends_game() {
        let mut state = new_state(3);
        state.lives = 1;
        state.ball.pos = Vec2::new(50.0, 598.0);
        state.ball.vel = Vec2::new(4.0, 4.0);
        state.paddle.pos.x = 600.0;

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.lives, 0);
        assert!(state.is_game_over());

        // Frozen until restarted
        let frame = state.frame;
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.frame, frame);
    }

    #[test]
    fn test_brick_hit_scores() {
        let mut state = new_state(4);
        state.bricks = vec![
            Brick::new(Vec2::new(380.0, 280.0), Vec2::new(40.0, 15.0), BrickKind::Golden),
            Brick::new(Vec2::new(10.0, 40.0), Vec2::new(40.0, 15.0), BrickKind::Plain),
        ];
        state.ball.pos = Vec2::new(396.0, 304.0);
        state.ball.vel = Vec2::new(4.0, -4.0);

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.score, u64::from(GOLDEN_POINTS));
        assert_eq!(state.bricks.len(), 1);
        assert_eq!(state.ball.vel.y, 4.0);
    }

    #[test]
    fn test_bonus_explosion_scores_neighbors() {
        let mut state = new_state(5);
        state.bonus.active = true;
        state.bricks = vec![
            Brick::new(Vec2::new(380.0, 280.0), Vec2::new(40.0, 15.0), BrickKind::Plain),
            Brick::new(Vec2::new(430.0, 280.0), Vec2::new(40.0, 15.0), BrickKind::Plain),
            Brick::new(Vec2::new(10.0, 40.0), Vec2::new(40.0, 15.0), BrickKind::Plain),
        ];
        state.ball.pos = Vec2::new(396.0, 304.0);
        state.ball.vel = Vec2::new(4.0, -4.0);

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.score, u64::from(PLAIN_POINTS + EXPLOSION_POINTS));
        assert_eq!(state.bricks.len(), 1);
        assert_eq!(state.bricks[0].pos.x, 10.0);
    }

    #[test]
    fn test_no_explosion_without_direct_hit() {
        let mut state = new_state(6);
        state.bonus.active = true;
        park_ball(&mut state);
        // Within explosion range of the ball, but never touched
        state.bricks = vec![Brick::new(
            Vec2::new(420.0, 300.0),
            Vec2::new(40.0, 15.0),
            BrickKind::Plain,
        )];

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.score, 0);
        assert_eq!(state.bricks.len(), 1);
    }

    #[test]
    fn test_moving_brick_starts_drift() {
        let mut state = new_state(7);
        state.bricks = vec![
            Brick::new(Vec2::new(380.0, 280.0), Vec2::new(40.0, 15.0), BrickKind::Moving),
            Brick::new(Vec2::new(100.0, 40.0), Vec2::new(40.0, 15.0), BrickKind::Plain),
        ];
        state.ball.pos = Vec2::new(396.0, 304.0);
        state.ball.vel = Vec2::new(4.0, -4.0);

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!(state.drift.enabled);
        assert_eq!(state.score, 0);
        assert!(state.messages.iter().any(|m| m.text.starts_with("You spin me right round")));
        let expected = 100.0 + state.tuning.drift_speed * state.drift.direction;
        assert_eq!(state.bricks[0].pos.x, expected);
    }

    #[test]
    fn test_hundred_drops_heart_at_brick() {
        let mut state = new_state(8);
        state.score = 95;
        state.bricks = vec![
            Brick::new(Vec2::new(380.0, 280.0), Vec2::new(40.0, 15.0), BrickKind::Plain),
            Brick::new(Vec2::new(10.0, 40.0), Vec2::new(40.0, 15.0), BrickKind::Plain),
        ];
        state.ball.pos = Vec2::new(396.0, 304.0);
        state.ball.vel = Vec2::new(4.0, -4.0);

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.score, 105);
        let heart = state.heart.as_ref().expect("heart dropped");
        // Spawned at the brick's bottom-center, then fell one step
        assert_eq!(heart.pos, Vec2::new(400.0, 295.0 + heart.speed));
    }

    #[test]
    fn test_bonus_trigger_set_prevents_repeat() {
        let mut state = new_state(9);
        state.lives = 5;
        state.bricks = vec![
            Brick::new(Vec2::new(380.0, 280.0), Vec2::new(40.0, 15.0), BrickKind::silver()),
            Brick::new(Vec2::new(10.0, 40.0), Vec2::new(40.0, 15.0), BrickKind::Plain),
        ];
        state.ball.pos = Vec2::new(396.0, 304.0);
        state.ball.vel = Vec2::new(4.0, -4.0);

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!(state.bonus_item.is_some());
        assert!(state.bonus_lives_triggered.contains(&5));

        // Item gone, same life total, another hit: no second bonus
        state.bonus_item = None;
        state.ball.pos = Vec2::new(396.0, 304.0);
        state.ball.vel = Vec2::new(4.0, -4.0);
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!(state.bricks.len() == 1, "silver destroyed on second hit");
        assert!(state.bonus_item.is_none());
    }

    #[test]
    fn test_catching_heart_adds_life() {
        let mut state = new_state(10);
        park_ball(&mut state);
        let paddle_center = state.paddle.pos.x + state.paddle.width / 2.0;
        state.heart = Some(FallingItem::new(
            ItemKind::Heart,
            Vec2::new(paddle_center, state.paddle.pos.y - 24.0),
            &state.tuning,
        ));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.lives, 4);
        assert!(state.heart.is_none());
    }

    #[test]
    fn test_heart_to_fifth_life_drops_bonus_at_ball() {
        let mut state = new_state(11);
        park_ball(&mut state);
        state.lives = 4;
        let paddle_center = state.paddle.pos.x + state.paddle.width / 2.0;
        state.heart = Some(FallingItem::new(
            ItemKind::Heart,
            Vec2::new(paddle_center, state.paddle.pos.y - 24.0),
            &state.tuning,
        ));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.lives, 5);
        let bonus = state.bonus_item.as_ref().expect("bonus dropped");
        // Dropped at the ball, then fell one step
        assert_eq!(bonus.pos, state.ball.pos + Vec2::new(0.0, bonus.speed));
    }

    #[test]
    fn test_tenth_life_message() {
        let mut state = new_state(12);
        park_ball(&mut state);
        state.lives = 9;
        let paddle_center = state.paddle.pos.x + state.paddle.width / 2.0;
        state.heart = Some(FallingItem::new(
            ItemKind::Heart,
            Vec2::new(paddle_center, state.paddle.pos.y - 24.0),
            &state.tuning,
        ));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.lives, 10);
        assert!(state.messages.iter().any(|m| m.text == "More lives than a cat !"));
        assert!(state.bonus_item.is_some());
    }

    #[test]
    fn test_catching_bonus_activates() {
        let mut state = new_state(13);
        park_ball(&mut state);
        let paddle_center = state.paddle.pos.x + state.paddle.width / 2.0;
        state.bonus_item = Some(FallingItem::new(
            ItemKind::Bonus,
            Vec2::new(paddle_center, state.paddle.pos.y - 24.0),
            &state.tuning,
        ));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!(state.bonus_active());
        assert!(state.ball.glowing && state.paddle.glowing);
        assert!(state.bonus_item.is_none());
    }

    #[test]
    fn test_missed_items_fall_off_screen() {
        let mut state = new_state(14);
        park_ball(&mut state);
        state.paddle.pos.x = 0.0;
        state.heart = Some(FallingItem::new(ItemKind::Heart, Vec2::new(700.0, 599.0), &state.tuning));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!(state.heart.is_none());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_laser_hits_paddle() {
        let mut state = new_state(15);
        park_ball(&mut state);
        let paddle_center = state.paddle.pos.x + state.paddle.width / 2.0;
        state
            .lasers
            .push(Laser::new(Vec2::new(paddle_center, state.paddle.pos.y - 12.0), &state.tuning));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.lives, 2);
        assert!(state.lasers.is_empty());
        assert!(state.messages.iter().any(|m| m.text == "Beware the lazers, it hurts !!"));
    }

    #[test]
    fn test_laser_below_screen_is_harmless() {
        let mut state = new_state(16);
        park_ball(&mut state);
        state.paddle.pos.x = 0.0;
        state.lasers.push(Laser::new(Vec2::new(700.0, 588.0), &state.tuning));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!(state.lasers.is_empty());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_laser_on_last_life_ends_game() {
        let mut state = new_state(17);
        park_ball(&mut state);
        state.lives = 1;
        let paddle_center = state.paddle.pos.x + state.paddle.width / 2.0;
        state
            .lasers
            .push(Laser::new(Vec2::new(paddle_center, state.paddle.pos.y - 12.0), &state.tuning));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.lives, 0);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_clearing_bricks_starts_invader_round() {
        let mut state = new_state(18);
        state.bricks = vec![Brick::new(
            Vec2::new(380.0, 280.0),
            Vec2::new(40.0, 15.0),
            BrickKind::Plain,
        )];
        state.ball.pos = Vec2::new(396.0, 304.0);
        state.ball.vel = Vec2::new(4.0, -4.0);

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.round, 2);
        assert_eq!(state.round_kind, RoundKind::Invader);
        assert_eq!(state.layout, LayoutKind::Invader);
        assert!(state.bricks.iter().any(|b| b.kind.is_cannon()));
    }

    #[test]
    fn test_invader_round_with_overflowing_tuning_file() {
        let tuning = Tuning::from_json(r#"{"invader_dwell":{"min_ms":1000.0,"max_ms":1e39}}"#)
            .expect("valid json");
        let mut state = GameState::new(Bounds::new(800.0, 600.0), 21, tuning);
        state.bricks.clear();

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input, FRAME_DT);
        }
        assert!(state.invader_rounds >= 1);
        assert!(state.invader.dwell_ms.is_finite());
        assert!(state.invader.dwell_ms <= 3000.0);
    }

    #[test]
    fn test_json_snapshot_resumes_identically() {
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut live = new_state(22);
        phase::activate_bonus(&mut live);
        for _ in 0..500 {
            tick(&mut live, &input, FRAME_DT);
        }

        let json = serde_json::to_string(&live).expect("serializable");
        let mut restored: GameState = serde_json::from_str(&json).expect("deserializable");
        for _ in 0..2500 {
            tick(&mut live, &input, FRAME_DT);
            tick(&mut restored, &input, FRAME_DT);
        }

        assert_eq!(restored.score, live.score);
        assert_eq!(restored.lives, live.lives);
        assert_eq!(restored.round, live.round);
        assert_eq!(restored.bonus_active(), live.bonus_active());
        assert_eq!(restored.bricks.len(), live.bricks.len());
        assert_eq!(restored.ball.pos, live.ball.pos);
    }

    #[test]
    fn test_bonus_expires_on_sim_clock() {
        let mut state = new_state(19);
        phase::activate_bonus(&mut state);

        for _ in 0..(30 * 60 - 2) {
            park_ball(&mut state);
            tick(&mut state, &TickInput::default(), FRAME_DT);
        }
        assert!(state.bonus_active());
        for _ in 0..4 {
            park_ball(&mut state);
            tick(&mut state, &TickInput::default(), FRAME_DT);
        }
        assert!(!state.bonus_active());
    }

    #[test]
    fn test_hue_cycles() {
        let mut state = new_state(20);
        park_ball(&mut state);
        state.hue = 360.0;
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.hue, 0.0);
    }
}
