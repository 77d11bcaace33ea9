//! Color conversion for terminal output.

use glyphfall_core::Rgba;
use ratatui::style::Color;

/// Convert a glyph color to a terminal color.
///
/// Terminal cells carry no opacity, so the color is composited over black:
/// a half-faded green becomes a darker green.
pub fn to_terminal_color(color: Rgba) -> Color {
    let (r, g, b) = color.blend_over_black();
    Color::Rgb(r, g, b)
}
