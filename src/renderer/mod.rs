//! Rendering seam
//!
//! The simulation never draws. Hosts implement [`Surface`] (a 2D canvas, a
//! vertex batch for the GPU, a recorder in tests) and call [`draw_frame`],
//! which reads `GameState` and paints it back to front.

pub mod draw;
pub mod recorder;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use draw::{Draw, FrameStyle};
pub use recorder::{CommandRecorder, DrawCommand};
pub use vertex::{Vertex, VertexBatch};

use crate::settings::Settings;
use crate::sim::GameState;

/// Straight (non-premultiplied) RGBA color, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgb8(0, 0, 0);
    pub const RED: Color = Color::rgb8(255, 0, 0);
    pub const ORANGE: Color = Color::rgb8(255, 165, 0);
    pub const YELLOW: Color = Color::rgb8(255, 255, 0);
    pub const GREEN: Color = Color::rgb8(0, 128, 0);
    pub const LIME: Color = Color::rgb8(0, 255, 0);
    pub const BLUE: Color = Color::rgb8(0, 0, 255);
    pub const INDIGO: Color = Color::rgb8(75, 0, 130);
    pub const VIOLET: Color = Color::rgb8(238, 130, 238);
    pub const PINK: Color = Color::rgb8(255, 192, 203);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// CSS-style HSL: hue in degrees, saturation and lightness in percent
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);
        let h = hue.rem_euclid(360.0) / 60.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        Self::rgba(r + m, g + m, b + m, 1.0)
    }

    /// Fully saturated, mid-lightness hue (the game's signature look)
    pub fn vivid(hue: f32) -> Self {
        Self::hsl(hue, 100.0, 50.0)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// `rgba(...)` string for a 2D canvas context
    pub fn to_css(self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

/// Cannon bricks change color with every hit taken
pub const CANNON_COLORS: [Color; 8] = [
    Color::RED,
    Color::ORANGE,
    Color::YELLOW,
    Color::GREEN,
    Color::BLUE,
    Color::INDIGO,
    Color::VIOLET,
    Color::PINK,
];

pub fn cannon_color(hits: u8) -> Color {
    CANNON_COLORS[usize::from(hits).min(CANNON_COLORS.len() - 1)]
}

/// Minimal 2D drawing surface, modeled on a canvas context
pub trait Surface {
    /// Erase the whole playfield
    fn clear(&mut self);
    fn set_fill(&mut self, color: Color);
    fn set_stroke(&mut self, color: Color);
    /// Glow behind subsequent shapes; a blur of 0 turns it off
    fn set_shadow(&mut self, blur: f32, color: Color);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2);
    fn fill_circle(&mut self, center: Vec2, radius: f32);
    /// Fill a closed polygon
    fn fill_path(&mut self, points: &[Vec2]);
    /// Stroke an open polyline
    fn stroke_path(&mut self, points: &[Vec2]);
    /// Text with its baseline-left corner at `pos`
    fn fill_text(&mut self, text: &str, pos: Vec2, font_px: f32);
}

/// HUD text positions
const SCORE_POS: Vec2 = Vec2::new(10.0, 30.0);
const LIVES_RIGHT_INSET: f32 = 150.0;
/// Game over text sits left of center by this much
const GAME_OVER_INSET: f32 = 75.0;

/// Paint one frame: ball, paddle, bricks, HUD, messages, pickups, lasers
pub fn draw_frame(state: &GameState, settings: &Settings, surface: &mut dyn Surface) {
    let style = FrameStyle::new(state, settings);

    surface.clear();
    state.ball.draw(surface, &style);
    state.paddle.draw(surface, &style);
    for brick in &state.bricks {
        brick.draw(surface, &style);
    }

    if settings.show_hud {
        surface.set_fill(Color::vivid(style.hue));
        surface.fill_text(&format!("Score: {}", state.score), SCORE_POS, style.font_px);
        surface.fill_text(
            &format!("Lives: {}", state.lives),
            Vec2::new(state.bounds.width - LIVES_RIGHT_INSET, SCORE_POS.y),
            style.font_px,
        );
    }

    for message in &state.messages {
        message.draw(surface, &style);
    }
    if let Some(heart) = &state.heart {
        heart.draw(surface, &style);
    }
    if let Some(bonus) = &state.bonus_item {
        bonus.draw(surface, &style);
    }
    for laser in &state.lasers {
        laser.draw(surface, &style);
    }
}

/// Paint the game over screen with the final score
pub fn draw_game_over(state: &GameState, settings: &Settings, surface: &mut dyn Surface) {
    let style = FrameStyle::new(state, settings);
    let center = state.bounds.center();

    surface.clear();
    surface.set_fill(Color::vivid(style.hue));
    surface.fill_text(
        "Game Over",
        Vec2::new(center.x - GAME_OVER_INSET, center.y - 20.0),
        style.font_px,
    );
    surface.fill_text(
        &format!("Score: {}", state.score),
        Vec2::new(center.x - GAME_OVER_INSET, center.y + 20.0),
        style.font_px,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Bounds, FallingItem, ItemKind, Laser};
    use crate::tuning::Tuning;

    fn close(a: Color, b: Color) -> bool {
        (a.r - b.r).abs() < 1e-3
            && (a.g - b.g).abs() < 1e-3
            && (a.b - b.b).abs() < 1e-3
            && (a.a - b.a).abs() < 1e-3
    }

    fn new_state() -> GameState {
        GameState::new(Bounds::new(800.0, 600.0), 21, Tuning::default())
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(Color::vivid(0.0), Color::RED));
        assert!(close(Color::vivid(120.0), Color::LIME));
        assert!(close(Color::vivid(240.0), Color::BLUE));
        assert!(close(Color::vivid(360.0), Color::RED));
        // Zero saturation is gray
        let silver = Color::hsl(0.0, 0.0, 75.0);
        assert!((silver.r - 0.75).abs() < 1e-6 && silver.r == silver.g && silver.g == silver.b);
    }

    #[test]
    fn test_css() {
        assert_eq!(Color::RED.to_css(), "rgba(255, 0, 0, 1)");
        assert_eq!(Color::LIME.with_alpha(0.5).to_css(), "rgba(0, 255, 0, 0.5)");
    }

    #[test]
    fn test_cannon_color_saturates() {
        assert_eq!(cannon_color(0), Color::RED);
        assert_eq!(cannon_color(7), Color::PINK);
        assert_eq!(cannon_color(42), Color::PINK);
    }

    #[test]
    fn test_frame_z_order() {
        let mut state = new_state();
        state.post_message("hi");
        state.heart = Some(FallingItem::new(
            ItemKind::Heart,
            Vec2::new(100.0, 100.0),
            &state.tuning,
        ));
        state.lasers.push(Laser::new(Vec2::new(200.0, 200.0), &state.tuning));

        let mut recorder = CommandRecorder::default();
        draw_frame(&state, &Settings::default(), &mut recorder);

        let commands = &recorder.commands;
        assert_eq!(commands.first(), Some(&DrawCommand::Clear));
        let ball = recorder
            .position(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .expect("ball drawn");
        let score = recorder
            .position(|c| matches!(c, DrawCommand::FillText { text, .. } if text.starts_with("Score:")))
            .expect("score drawn");
        let message = recorder
            .position(|c| matches!(c, DrawCommand::FillText { text, .. } if text == "hi"))
            .expect("message drawn");
        let last = commands.len() - 1;
        assert!(ball < score && score < message && message < last);
        assert!(matches!(commands[last], DrawCommand::FillRect { .. }));
    }

    #[test]
    fn test_hud_text() {
        let mut state = new_state();
        state.score = 120;
        let mut recorder = CommandRecorder::default();
        draw_frame(&state, &Settings::default(), &mut recorder);
        assert_eq!(
            recorder.texts(),
            vec![
                ("Score: 120".to_string(), Vec2::new(10.0, 30.0)),
                ("Lives: 3".to_string(), Vec2::new(650.0, 30.0)),
            ]
        );

        let hidden = Settings {
            show_hud: false,
            ..Settings::default()
        };
        let mut recorder = CommandRecorder::default();
        draw_frame(&state, &hidden, &mut recorder);
        assert!(recorder.texts().is_empty());
    }

    #[test]
    fn test_game_over_screen() {
        let mut state = new_state();
        state.score = 250;
        let mut recorder = CommandRecorder::default();
        draw_game_over(&state, &Settings::default(), &mut recorder);
        assert_eq!(
            recorder.texts(),
            vec![
                ("Game Over".to_string(), Vec2::new(325.0, 280.0)),
                ("Score: 250".to_string(), Vec2::new(325.0, 320.0)),
            ]
        );
    }
}
