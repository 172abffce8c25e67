//! Presentation preferences
//!
//! Purely cosmetic: nothing here changes the simulation.

use serde::{Deserialize, Serialize};

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Shadow glow on ball/paddle while a bonus is active
    pub glow: bool,
    /// Fading trails behind lasers
    pub laser_trails: bool,
    /// Hue cycling on HUD, ball, paddle, bricks and pickups
    pub hue_cycling: bool,

    // === HUD ===
    /// Score and lives text
    pub show_hud: bool,
    /// HUD font size in pixels
    pub hud_font_px: f32,

    // === Accessibility ===
    /// Reduced motion (no glow pulses, frozen hue)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            glow: true,
            laser_trails: true,
            hue_cycling: true,

            show_hud: true,
            hud_font_px: 30.0,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Effective glow (respects reduced_motion)
    pub fn effective_glow(&self) -> bool {
        self.glow && !self.reduced_motion
    }

    /// Effective hue cycling (respects reduced_motion)
    pub fn effective_hue_cycling(&self) -> bool {
        self.hue_cycling && !self.reduced_motion
    }
}
