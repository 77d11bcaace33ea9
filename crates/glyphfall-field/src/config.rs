//! Field configuration and the per-variant presets.

use glyphfall_core::{GlyphSet, Rgba, Variant};
use rand::Rng;

/// Opacity a freshly spawned glyph starts with.
pub const FULL_OPACITY: i16 = 255;

/// How entities are laid out when the field is first built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawn {
    /// A single entity in the first column at a random height.
    Single,
    /// A random number of entities per column, `stride_cells` cells apart,
    /// sharing one speed per column.
    Ragged { stride_cells: i32 },
    /// A fixed number of entities per column, one cell apart, each with its
    /// own speed and color.
    Grid { per_column: usize },
}

/// Where glyph colors come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Fixed(Rgba),
    /// Uniformly random opaque RGB.
    Random,
}

impl Palette {
    pub fn sample<R: Rng>(self, rng: &mut R) -> Rgba {
        match self {
            Palette::Fixed(color) => color,
            Palette::Random => Rgba::new(rng.random(), rng.random(), rng.random(), 255),
        }
    }
}

/// Inclusive range of vertical pixels advanced per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedRange {
    pub min: i32,
    pub max: i32,
}

impl SpeedRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Draw a speed. Always at least one pixel per frame.
    pub fn sample<R: Rng>(self, rng: &mut R) -> i32 {
        let lo = self.min.max(1);
        let hi = self.max.max(lo);
        rng.random_range(lo..=hi)
    }
}

/// Inclusive range of opacity lost per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeRange {
    pub min: i16,
    pub max: i16,
}

impl FadeRange {
    pub const fn new(min: i16, max: i16) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng>(self, rng: &mut R) -> i16 {
        let lo = self.min.max(0);
        let hi = self.max.max(lo);
        rng.random_range(lo..=hi)
    }
}

/// Distribution of the vertical offset a respawned glyph restarts at,
/// measured in whole cells above the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespawnOffset {
    pub min_cells: i32,
    pub max_cells: i32,
}

impl RespawnOffset {
    pub const fn new(min_cells: i32, max_cells: i32) -> Self {
        Self {
            min_cells,
            max_cells,
        }
    }

    /// Draw a restart `y`. Never positive, saturating for extreme values.
    pub fn sample<R: Rng>(self, rng: &mut R, cell_size: i32) -> i32 {
        let lo = self.min_cells.max(0);
        let hi = self.max_cells.max(lo);
        cell_size
            .max(1)
            .saturating_mul(rng.random_range(lo..=hi))
            .saturating_neg()
    }
}

/// Everything that shapes a [`Field`](crate::Field).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConfig {
    /// Visible width in pixels.
    pub width: i32,
    /// Visible height in pixels.
    pub height: i32,
    /// Pixel size of one glyph cell; also the column spacing.
    pub cell_size: i32,
    pub spawn: Spawn,
    pub glyphs: GlyphSet,
    pub palette: Palette,
    pub speed: SpeedRange,
    /// Whether speed is drawn again on respawn.
    pub reroll_speed: bool,
    /// Per-frame opacity loss; `None` disables fading.
    pub fade: Option<FadeRange>,
    pub respawn: RespawnOffset,
}

impl FieldConfig {
    /// The configuration each variant ships with, for a `width` x `height`
    /// pixel area.
    pub fn preset(variant: Variant, width: i32, height: i32) -> Self {
        match variant {
            Variant::Stream => Self {
                width,
                height,
                cell_size: 12,
                spawn: Spawn::Single,
                glyphs: GlyphSet::Uppercase,
                palette: Palette::Fixed(Rgba::GREEN),
                speed: SpeedRange::new(2, 6),
                reroll_speed: false,
                fade: None,
                respawn: RespawnOffset::new(1, 1),
            },
            Variant::Columns => Self {
                width,
                height,
                cell_size: 12,
                spawn: Spawn::Ragged { stride_cells: 10 },
                glyphs: GlyphSet::Uppercase,
                palette: Palette::Fixed(Rgba::GREEN),
                speed: SpeedRange::new(2, 6),
                reroll_speed: true,
                fade: None,
                respawn: RespawnOffset::new(0, 9),
            },
            Variant::Fade => Self {
                width,
                height,
                cell_size: 16,
                spawn: Spawn::Grid { per_column: 20 },
                glyphs: GlyphSet::PrintableAscii,
                palette: Palette::Random,
                speed: SpeedRange::new(10, 14),
                reroll_speed: true,
                fade: Some(FadeRange::new(0, 4)),
                respawn: RespawnOffset::new(0, 9),
            },
            Variant::Unicode => Self {
                width,
                height,
                cell_size: 24,
                spawn: Spawn::Grid { per_column: 20 },
                glyphs: GlyphSet::Cjk,
                palette: Palette::Fixed(Rgba::GREEN),
                speed: SpeedRange::new(2, 6),
                reroll_speed: true,
                fade: Some(FadeRange::new(0, 4)),
                respawn: RespawnOffset::new(0, 9),
            },
        }
    }

    /// Number of glyph columns across the visible width.
    pub fn columns(&self) -> i32 {
        self.width.max(0) / self.cell_size.max(1)
    }

    /// Number of glyph rows down the visible height.
    pub fn rows(&self) -> i32 {
        self.height.max(0) / self.cell_size.max(1)
    }

    /// Size the visible area to a terminal of `cols` x `rows` character cells.
    ///
    /// One glyph cell maps to one terminal row and to as many terminal
    /// columns as the glyph set is wide.
    pub fn fit_terminal(&mut self, cols: u16, rows: u16) {
        let per_glyph = self.glyphs.columns_per_glyph().max(1);
        self.width = i32::from(cols / per_glyph).saturating_mul(self.cell_size);
        self.height = i32::from(rows).saturating_mul(self.cell_size);
    }
}
