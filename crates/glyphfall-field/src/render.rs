//! Drawing seam between the field and whatever puts glyphs on screen.

use glyphfall_core::Rgba;
use ratatui::{Frame, buffer::Buffer, layout::Rect, style::Style};

use crate::Field;
use crate::color::to_terminal_color;

/// Something that can put one glyph on screen.
pub trait GlyphRenderer {
    /// Draw `glyph` with its top-left corner at pixel `(x, y)`.
    fn draw_glyph(&mut self, glyph: char, x: i32, y: i32, color: Rgba);
}

impl<F: FnMut(char, i32, i32, Rgba)> GlyphRenderer for F {
    fn draw_glyph(&mut self, glyph: char, x: i32, y: i32, color: Rgba) {
        self(glyph, x, y, color)
    }
}

/// Renders glyphs into a ratatui buffer.
///
/// A glyph cell of `cell_size` pixels maps to one terminal row and
/// `glyph_cols` terminal columns. Glyphs that fall partly outside `area` are
/// skipped.
pub struct TerminalRenderer<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    cell_size: i32,
    glyph_cols: u16,
}

impl<'a> TerminalRenderer<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, cell_size: i32, glyph_cols: u16) -> Self {
        let area = area.intersection(buf.area);
        Self {
            buf,
            area,
            cell_size: cell_size.max(1),
            glyph_cols: glyph_cols.max(1),
        }
    }

    /// Terminal cell for a pixel position, if it is fully on screen.
    fn cell_for(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        if x < 0 || y < 0 {
            return None;
        }
        let col = (x / self.cell_size) as u32 * self.glyph_cols as u32;
        let row = (y / self.cell_size) as u32;
        if col + self.glyph_cols as u32 > self.area.width as u32 || row >= self.area.height as u32
        {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }
}

impl GlyphRenderer for TerminalRenderer<'_> {
    fn draw_glyph(&mut self, glyph: char, x: i32, y: i32, color: Rgba) {
        let Some((cx, cy)) = self.cell_for(x, y) else {
            return;
        };
        let mut utf8 = [0u8; 4];
        self.buf.set_stringn(
            cx,
            cy,
            glyph.encode_utf8(&mut utf8),
            self.glyph_cols as usize,
            Style::new().fg(to_terminal_color(color)),
        );
    }
}

/// Render the field over the whole frame, advancing it one step unless
/// `paused`.
pub fn render(field: &mut Field, frame: &mut Frame, paused: bool) {
    let area = frame.area();
    let cell_size = field.config().cell_size;
    let glyph_cols = field.config().glyphs.columns_per_glyph();
    let mut renderer = TerminalRenderer::new(frame.buffer_mut(), area, cell_size, glyph_cols);
    if paused {
        field.draw(&mut renderer);
    } else {
        field.step(&mut renderer);
    }
}
