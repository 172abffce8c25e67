//! Recording surface
//!
//! Keeps every call as a [`DrawCommand`] so drawing can be inspected without
//! a canvas or GPU.

use glam::Vec2;

use super::{Color, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    SetFill(Color),
    SetStroke(Color),
    SetShadow { blur: f32, color: Color },
    FillRect { pos: Vec2, size: Vec2 },
    FillCircle { center: Vec2, radius: f32 },
    FillPath(Vec<Vec2>),
    StrokePath(Vec<Vec2>),
    FillText { text: String, pos: Vec2, font_px: f32 },
}

#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    /// Index of the first command matching `pred`
    pub fn position(&self, pred: impl Fn(&DrawCommand) -> bool) -> Option<usize> {
        self.commands.iter().position(pred)
    }

    /// Every text drawn, in order
    pub fn texts(&self) -> Vec<(String, Vec2)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, pos, .. } => Some((text.clone(), *pos)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for CommandRecorder {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn set_fill(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetFill(color));
    }

    fn set_stroke(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetStroke(color));
    }

    fn set_shadow(&mut self, blur: f32, color: Color) {
        self.commands.push(DrawCommand::SetShadow { blur, color });
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::FillRect { pos, size });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        self.commands.push(DrawCommand::FillCircle { center, radius });
    }

    fn fill_path(&mut self, points: &[Vec2]) {
        self.commands.push(DrawCommand::FillPath(points.to_vec()));
    }

    fn stroke_path(&mut self, points: &[Vec2]) {
        self.commands.push(DrawCommand::StrokePath(points.to_vec()));
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font_px: f32) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            pos,
            font_px,
        });
    }
}
