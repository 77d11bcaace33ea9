//! The falling-entity field behind the glyphfall screensaver.
//!
//! A [`Field`] owns a fixed set of [`FallingGlyph`]s. Each frame it hands
//! every visible glyph to a [`GlyphRenderer`], then moves, fades and respawns
//! it. [`TerminalRenderer`] draws into a ratatui buffer.

mod color;
mod config;
mod field;
mod glyph;
mod render;

pub use color::to_terminal_color;
pub use config::{FULL_OPACITY, FadeRange, FieldConfig, Palette, RespawnOffset, Spawn, SpeedRange};
pub use field::Field;
pub use glyph::FallingGlyph;
pub use render::{GlyphRenderer, TerminalRenderer, render};
