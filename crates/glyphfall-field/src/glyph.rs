//! A single falling character.

use glyphfall_core::Rgba;

use crate::config::FULL_OPACITY;

/// One falling glyph on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallingGlyph {
    /// Horizontal pixel position; fixed for the entity's lifetime.
    pub column_x: i32,
    /// Vertical pixel position of the glyph's top edge.
    pub y: i32,
    /// Character drawn in this slot.
    pub glyph: char,
    /// Pixels advanced per frame.
    pub speed: i32,
    /// Base color; its own alpha channel is ignored in favor of `alpha`.
    pub color: Rgba,
    /// Current opacity. Can dip to zero or below for the remainder of the
    /// step that faded it out.
    pub alpha: i16,
}

impl FallingGlyph {
    pub fn new(column_x: i32, y: i32, glyph: char, speed: i32, color: Rgba) -> Self {
        Self {
            column_x,
            y,
            glyph,
            speed,
            color,
            alpha: FULL_OPACITY,
        }
    }

    /// Whether the glyph has any opacity left.
    pub fn is_visible(&self) -> bool {
        self.alpha > 0
    }

    /// Color to draw with, carrying the current opacity.
    pub fn draw_color(&self) -> Rgba {
        self.color.with_alpha(self.alpha.clamp(0, FULL_OPACITY) as u8)
    }
}
