//! Core types shared by the glyphfall crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully opaque classic green.
    pub const GREEN: Rgba = Rgba::new(0, 255, 0, 255);

    /// Fully opaque black.
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with the alpha channel replaced.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Composite this color over an opaque black background.
    ///
    /// Terminals have no alpha channel, so fading is expressed by darkening
    /// each channel in proportion to opacity.
    pub fn blend_over_black(self) -> (u8, u8, u8) {
        let scale = |c: u8| ((c as u16 * self.a as u16 + 127) / 255) as u8;
        (scale(self.r), scale(self.g), scale(self.b))
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::GREEN
    }
}

/// The four flavors of the falling-character effect.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// A single falling letter.
    Stream,
    /// Ragged streams of letters in every column.
    Columns,
    /// Dense grid of randomly colored ASCII that fades out.
    Fade,
    /// Dense grid of fading CJK, Katakana and Hangul glyphs.
    #[default]
    Unicode,
}

impl Variant {
    /// All variants in cycle order.
    pub const ALL: [Variant; 4] = [
        Variant::Stream,
        Variant::Columns,
        Variant::Fade,
        Variant::Unicode,
    ];

    /// Cycle to the next variant.
    pub fn next(self) -> Self {
        match self {
            Variant::Stream => Variant::Columns,
            Variant::Columns => Variant::Fade,
            Variant::Fade => Variant::Unicode,
            Variant::Unicode => Variant::Stream,
        }
    }

    /// Lowercase name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Stream => "stream",
            Variant::Columns => "columns",
            Variant::Fade => "fade",
            Variant::Unicode => "unicode",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which alphabet glyphs are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphSet {
    /// `A` through `Z`.
    Uppercase,
    /// Printable ASCII from space up to `}`.
    PrintableAscii,
    /// CJK unified ideographs, Katakana and Hangul syllables.
    Cjk,
}

impl GlyphSet {
    /// Terminal columns one glyph of this set occupies.
    pub fn columns_per_glyph(self) -> u16 {
        match self {
            GlyphSet::Uppercase | GlyphSet::PrintableAscii => 1,
            GlyphSet::Cjk => 2,
        }
    }
}
