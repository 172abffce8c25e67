//! Per-entity drawing

use glam::Vec2;

use super::shapes::{self, BONUS_SPRITE, HEART_SPRITE};
use super::{Color, Surface, cannon_color};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Ball, Brick, BrickKind, FallingItem, GameState, ItemKind, Laser, Message, Paddle};

/// Glow blur radii
const BALL_GLOW_BLUR: f32 = 30.0;
const PADDLE_GLOW_BLUR: f32 = 15.0;
/// Opacity of the freshest laser trail segment
const LASER_TRAIL_ALPHA: f32 = 0.5;

/// Per-frame drawing parameters shared by every entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    /// Global hue (HUD, pickups)
    pub hue: f32,
    pub glow: bool,
    pub laser_trails: bool,
    pub hue_cycling: bool,
    pub font_px: f32,
}

impl FrameStyle {
    pub fn new(state: &GameState, settings: &Settings) -> Self {
        let hue_cycling = settings.effective_hue_cycling();
        Self {
            hue: if hue_cycling { state.hue } else { GLOBAL_START_HUE },
            glow: settings.effective_glow(),
            laser_trails: settings.laser_trails,
            hue_cycling,
            font_px: settings.hud_font_px,
        }
    }

    /// The live hue, or the fixed one when cycling is off
    fn pick_hue(&self, live: f32, fixed: f32) -> f32 {
        if self.hue_cycling { live } else { fixed }
    }
}

/// Something that can paint itself on a [`Surface`]
pub trait Draw {
    fn draw(&self, surface: &mut dyn Surface, style: &FrameStyle);
}

/// Glow in the complementary hue
fn glow_color(hue: f32) -> Color {
    Color::vivid((hue + 180.0) % 360.0)
}

impl Draw for Ball {
    fn draw(&self, surface: &mut dyn Surface, style: &FrameStyle) {
        let hue = style.pick_hue(self.hue, BALL_START_HUE);
        let glow = self.glowing && style.glow;
        if glow {
            surface.set_shadow(BALL_GLOW_BLUR, glow_color(hue));
        }
        surface.set_fill(Color::vivid(hue));
        surface.fill_circle(self.pos, self.radius);
        if glow {
            surface.set_shadow(0.0, Color::TRANSPARENT);
        }
    }
}

impl Draw for Paddle {
    fn draw(&self, surface: &mut dyn Surface, style: &FrameStyle) {
        let hue = style.pick_hue(self.hue, PADDLE_START_HUE);
        let glow = self.glowing && style.glow;
        if glow {
            surface.set_shadow(PADDLE_GLOW_BLUR, glow_color(hue));
        }
        surface.set_fill(Color::vivid(hue));
        surface.fill_rect(self.pos, Vec2::new(self.width, self.height));
        if glow {
            surface.set_shadow(0.0, Color::TRANSPARENT);
        }
    }
}

impl Draw for Brick {
    fn draw(&self, surface: &mut dyn Surface, style: &FrameStyle) {
        let hue = style.pick_hue(self.hue, self.kind.start_hue());
        let fill = match self.kind {
            BrickKind::Silver { hits } if hits > 0 => Color::hsl(hue, 0.0, 60.0),
            BrickKind::Silver { .. } => Color::hsl(hue, 0.0, 75.0),
            BrickKind::Cannon { hits } => cannon_color(hits),
            _ => Color::vivid(hue),
        };
        surface.set_fill(fill);
        surface.fill_rect(self.pos, self.size);

        match self.kind {
            BrickKind::Golden => {
                surface.set_fill(Color::YELLOW);
                surface.fill_path(&shapes::star(self.pos, self.size));
            }
            BrickKind::Moving => {
                let arrows = shapes::double_arrow(self.pos, self.size);
                surface.set_stroke(Color::BLACK);
                surface.stroke_path(&arrows.shaft);
                surface.set_fill(Color::BLACK);
                surface.fill_path(&arrows.left);
                surface.fill_path(&arrows.right);
            }
            _ => {}
        }
    }
}

impl Draw for FallingItem {
    fn draw(&self, surface: &mut dyn Surface, style: &FrameStyle) {
        surface.set_fill(Color::vivid(style.hue));
        match self.kind {
            ItemKind::Heart => shapes::fill_sprite(surface, &HEART_SPRITE, self.pos, self.size),
            ItemKind::Bonus => shapes::fill_sprite(surface, &BONUS_SPRITE, self.pos, self.size),
        }
    }
}

impl Draw for Laser {
    fn draw(&self, surface: &mut dyn Surface, style: &FrameStyle) {
        surface.set_fill(Color::GREEN);
        surface.fill_rect(self.pos, self.size);

        if !style.laser_trails || self.trail.len() < 2 {
            return;
        }
        // Oldest segment is the most opaque; the newest sits under the laser
        let step = LASER_TRAIL_ALPHA / self.trail.len() as f32;
        let mut alpha = LASER_TRAIL_ALPHA;
        for pos in self.trail.iter().take(self.trail.len() - 1) {
            surface.set_fill(Color::LIME.with_alpha(alpha));
            surface.fill_rect(*pos, self.size);
            alpha -= step;
        }
    }
}

impl Draw for Message {
    fn draw(&self, surface: &mut dyn Surface, style: &FrameStyle) {
        if !self.visible {
            return;
        }
        surface.set_fill(Color::vivid(self.hue));
        surface.fill_text(&self.text, self.pos, style.font_px);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandRecorder, DrawCommand};
    use crate::sim::Bounds;
    use crate::tuning::Tuning;

    fn style() -> FrameStyle {
        FrameStyle {
            hue: 120.0,
            glow: true,
            laser_trails: true,
            hue_cycling: true,
            font_px: 30.0,
        }
    }

    #[test]
    fn test_glowing_ball_sets_and_resets_shadow() {
        let mut ball = Ball::new(Bounds::new(800.0, 600.0), &Tuning::default());
        ball.glowing = true;
        ball.hue = 10.0;

        let mut recorder = CommandRecorder::default();
        ball.draw(&mut recorder, &style());
        assert_eq!(
            recorder.commands.first(),
            Some(&DrawCommand::SetShadow {
                blur: 30.0,
                color: Color::vivid(190.0)
            })
        );
        assert_eq!(
            recorder.commands.last(),
            Some(&DrawCommand::SetShadow {
                blur: 0.0,
                color: Color::TRANSPARENT
            })
        );

        let no_glow = FrameStyle {
            glow: false,
            ..style()
        };
        let mut recorder = CommandRecorder::default();
        ball.draw(&mut recorder, &no_glow);
        assert!(!recorder.commands.iter().any(|c| matches!(c, DrawCommand::SetShadow { .. })));
    }

    #[test]
    fn test_silver_darkens_after_hit() {
        let mut brick = Brick::new(Vec2::ZERO, Vec2::new(40.0, 15.0), BrickKind::silver());
        let mut recorder = CommandRecorder::default();
        brick.draw(&mut recorder, &style());
        assert_eq!(recorder.commands[0], DrawCommand::SetFill(Color::hsl(0.0, 0.0, 75.0)));

        brick.hit();
        let mut recorder = CommandRecorder::default();
        brick.draw(&mut recorder, &style());
        assert_eq!(recorder.commands[0], DrawCommand::SetFill(Color::hsl(0.0, 0.0, 60.0)));
    }

    #[test]
    fn test_cannon_color_tracks_hits() {
        let mut brick = Brick::new(Vec2::ZERO, Vec2::splat(20.0), BrickKind::cannon());
        for _ in 0..3 {
            brick.hit();
        }
        let mut recorder = CommandRecorder::default();
        brick.draw(&mut recorder, &style());
        assert_eq!(recorder.commands[0], DrawCommand::SetFill(Color::GREEN));
    }

    #[test]
    fn test_golden_and_moving_decorations() {
        let golden = Brick::new(Vec2::ZERO, Vec2::new(40.0, 15.0), BrickKind::Golden);
        let mut recorder = CommandRecorder::default();
        golden.draw(&mut recorder, &style());
        assert!(recorder.commands.contains(&DrawCommand::SetFill(Color::YELLOW)));
        assert!(recorder.commands.iter().any(|c| matches!(c, DrawCommand::FillPath(p) if p.len() == 5)));

        let moving = Brick::new(Vec2::ZERO, Vec2::new(40.0, 15.0), BrickKind::Moving);
        let mut recorder = CommandRecorder::default();
        moving.draw(&mut recorder, &style());
        assert_eq!(
            recorder.commands.iter().filter(|c| matches!(c, DrawCommand::FillPath(_))).count(),
            2
        );
        assert!(recorder.commands.iter().any(|c| matches!(c, DrawCommand::StrokePath(_))));
    }

    #[test]
    fn test_frozen_hue_without_cycling() {
        let frozen = FrameStyle {
            hue_cycling: false,
            ..style()
        };
        let mut brick = Brick::new(Vec2::ZERO, Vec2::new(40.0, 15.0), BrickKind::Plain);
        brick.hue = 200.0;
        let mut recorder = CommandRecorder::default();
        brick.draw(&mut recorder, &frozen);
        assert_eq!(recorder.commands[0], DrawCommand::SetFill(Color::vivid(0.0)));
    }

    #[test]
    fn test_laser_trail_fades() {
        let tuning = Tuning::default();
        let mut laser = Laser::new(Vec2::new(100.0, 0.0), &tuning);
        for _ in 0..4 {
            laser.update();
        }

        let mut recorder = CommandRecorder::default();
        laser.draw(&mut recorder, &style());
        let alphas: Vec<f32> = recorder
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetFill(color) if *color != Color::GREEN => Some(color.a),
                _ => None,
            })
            .collect();
        assert_eq!(alphas, vec![0.5, 0.375, 0.25]);

        let plain = FrameStyle {
            laser_trails: false,
            ..style()
        };
        let mut recorder = CommandRecorder::default();
        laser.draw(&mut recorder, &plain);
        assert_eq!(recorder.commands.len(), 2);
    }

    #[test]
    fn test_heart_sprite_pixels() {
        let tuning = Tuning::default();
        let heart = FallingItem::new(ItemKind::Heart, Vec2::new(10.0, 20.0), &tuning);
        let mut recorder = CommandRecorder::default();
        heart.draw(&mut recorder, &style());
        let filled = HEART_SPRITE.iter().flatten().filter(|&&p| p == 1).count();
        let rects = recorder
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count();
        assert_eq!(rects, filled);
    }
}
