//! The falling-entity field and its per-frame update.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::config::{FULL_OPACITY, FieldConfig, Spawn};
use crate::glyph::FallingGlyph;
use crate::render::GlyphRenderer;

/// A fixed population of falling glyphs and the generator that drives them.
#[derive(Debug, Clone)]
pub struct Field {
    config: FieldConfig,
    glyphs: Vec<FallingGlyph>,
    rng: StdRng,
    /// Update steps taken so far.
    frame: u64,
    /// Respawns performed so far.
    respawns: u64,
}

impl Field {
    /// Build a field and populate it according to `config.spawn`.
    ///
    /// The same `config` and `seed` always produce the same field and the same
    /// sequence of frames.
    pub fn new(config: FieldConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let glyphs = populate(&config, &mut rng);
        debug!(
            seed,
            entities = glyphs.len(),
            columns = config.columns(),
            width = config.width,
            height = config.height,
            "field populated"
        );
        Self {
            config,
            glyphs,
            rng,
            frame: 0,
            respawns: 0,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn glyphs(&self) -> &[FallingGlyph] {
        &self.glyphs
    }

    /// Number of update steps taken.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of respawns performed across all steps.
    pub fn respawns(&self) -> u64 {
        self.respawns
    }

    /// Draw every visible glyph at its current position without advancing.
    pub fn draw<R: GlyphRenderer + ?Sized>(&self, renderer: &mut R) {
        for g in self.glyphs.iter().filter(|g| g.is_visible()) {
            renderer.draw_glyph(g.glyph, g.column_x, g.y, g.draw_color());
        }
    }

    /// Run one frame: draw each glyph, then advance, fade and respawn it.
    ///
    /// Each glyph is drawn with its state from before this step.
    pub fn step<R: GlyphRenderer + ?Sized>(&mut self, renderer: &mut R) {
        let Self {
            config,
            glyphs,
            rng,
            ..
        } = self;

        let mut respawned = 0u64;
        for g in glyphs.iter_mut() {
            if g.is_visible() {
                renderer.draw_glyph(g.glyph, g.column_x, g.y, g.draw_color());
            }

            g.y = g.y.saturating_add(g.speed);
            if let Some(fade) = config.fade {
                g.alpha = g.alpha.saturating_sub(fade.sample(rng));
            }

            if g.y > config.height || g.alpha <= 0 {
                respawn(g, config, rng);
                respawned += 1;
            }
        }

        self.frame += 1;
        self.respawns += respawned;
        trace!(frame = self.frame, respawned, "field step");
    }
}

/// Reset a glyph in place above the top edge with freshly drawn attributes.
fn respawn<R: Rng>(g: &mut FallingGlyph, config: &FieldConfig, rng: &mut R) {
    g.y = config.respawn.sample(rng, config.cell_size);
    g.glyph = glyphfall_glyphs::random_glyph(config.glyphs, rng);
    if config.reroll_speed {
        g.speed = config.speed.sample(rng);
    }
    g.color = config.palette.sample(rng);
    g.alpha = FULL_OPACITY;
}

fn populate<R: Rng>(config: &FieldConfig, rng: &mut R) -> Vec<FallingGlyph> {
    let cell = config.cell_size.max(1);
    let spawn_one = |x: i32, y: i32, speed: i32, rng: &mut R| {
        let glyph = glyphfall_glyphs::random_glyph(config.glyphs, rng);
        FallingGlyph::new(x, y, glyph, speed, config.palette.sample(rng))
    };

    match config.spawn {
        Spawn::Single => {
            let y = rng.random_range(0..config.height.max(1));
            let speed = config.speed.sample(rng);
            vec![spawn_one(0, y, speed, &mut *rng)]
        }
        Spawn::Ragged { stride_cells } => {
            let max_rows = config.rows();
            let mut glyphs = Vec::new();
            for col in 0..config.columns() {
                let count = if max_rows > 0 {
                    rng.random_range(0..max_rows)
                } else {
                    0
                };
                let speed = config.speed.sample(rng);
                for j in 0..count {
                    let y = j.saturating_mul(cell).saturating_mul(stride_cells);
                    glyphs.push(spawn_one(col * cell, y.saturating_neg(), speed, &mut *rng));
                }
            }
            glyphs
        }
        Spawn::Grid { per_column } => {
            let per_column = i32::try_from(per_column).unwrap_or(i32::MAX);
            let mut glyphs = Vec::new();
            for col in 0..config.columns() {
                for i in 0..per_column {
                    let speed = config.speed.sample(rng);
                    let y = i.saturating_mul(cell).saturating_neg();
                    glyphs.push(spawn_one(col * cell, y, speed, &mut *rng));
                }
            }
            glyphs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FadeRange, Palette, RespawnOffset, SpeedRange};
    use glyphfall_core::{GlyphSet, Rgba, Variant};

    type Draw = (char, i32, i32, Rgba);

    fn field_with(config: FieldConfig, glyphs: Vec<FallingGlyph>) -> Field {
        Field {
            config,
            glyphs,
            rng: StdRng::seed_from_u64(0),
            frame: 0,
            respawns: 0,
        }
    }

    fn discard(_: char, _: i32, _: i32, _: Rgba) {}

    fn recorder(draws: &mut Vec<Draw>) -> impl FnMut(char, i32, i32, Rgba) + '_ {
        move |glyph: char, x: i32, y: i32, color: Rgba| draws.push((glyph, x, y, color))
    }

    #[test]
    fn test_single_stream_population() {
        let field = Field::new(FieldConfig::preset(Variant::Stream, 800, 600), 42);
        assert_eq!(field.glyphs().len(), 1);
        let g = &field.glyphs()[0];
        assert_eq!(g.column_x, 0);
        assert!((0..600).contains(&g.y));
        assert!(g.glyph.is_ascii_uppercase());
        assert!((2..=6).contains(&g.speed));
    }

    #[test]
    fn test_ragged_population_shares_column_speed() {
        let config = FieldConfig::preset(Variant::Columns, 800, 600);
        let field = Field::new(config.clone(), 9);
        for col in 0..config.columns() {
            let column: Vec<_> = field
                .glyphs()
                .iter()
                .filter(|g| g.column_x == col * 12)
                .collect();
            assert!(column.len() < config.rows() as usize);
            for (j, g) in column.iter().enumerate() {
                assert_eq!(g.y, -(j as i32) * 120);
                assert_eq!(g.speed, column[0].speed);
            }
        }
    }

    #[test]
    fn test_grid_population() {
        let field = Field::new(FieldConfig::preset(Variant::Fade, 800, 600), 5);
        assert_eq!(field.glyphs().len(), 50 * 20);
        for (idx, g) in field.glyphs().iter().enumerate() {
            assert_eq!(g.column_x, (idx / 20) as i32 * 16);
            assert_eq!(g.y, -((idx % 20) as i32) * 16);
            assert_eq!(g.alpha, 255);
            assert!((10..=14).contains(&g.speed));
        }
    }

    #[test]
    fn test_exit_bottom_respawns_same_step() {
        let config = FieldConfig::preset(Variant::Columns, 800, 600);
        let mut field = field_with(
            config,
            vec![FallingGlyph::new(24, 590, 'Q', 15, Rgba::GREEN)],
        );
        let mut draws = Vec::new();
        field.step(&mut recorder(&mut draws));

        // Drawn at the pre-update position.
        assert_eq!(draws, vec![('Q', 24, 590, Rgba::GREEN)]);
        let g = &field.glyphs()[0];
        assert!(g.y <= 0, "y = {}", g.y);
        assert_eq!(g.y % 12, 0);
        assert_eq!(g.column_x, 24);
        assert_eq!(field.respawns(), 1);
    }

    #[test]
    fn test_stream_respawn_keeps_speed() {
        let config = FieldConfig::preset(Variant::Stream, 800, 600);
        let mut field = field_with(config, vec![FallingGlyph::new(0, 598, 'A', 5, Rgba::GREEN)]);
        field.step(&mut discard);
        let g = &field.glyphs()[0];
        assert_eq!(g.y, -12);
        assert_eq!(g.speed, 5);
    }

    #[test]
    fn test_fade_out_respawns_at_full_opacity() {
        let mut config = FieldConfig::preset(Variant::Unicode, 800, 600);
        config.fade = Some(FadeRange::new(4, 4));
        let mut g = FallingGlyph::new(48, 100, '雨', 3, Rgba::GREEN);
        g.alpha = 3;
        let mut field = field_with(config, vec![g]);

        let mut draws = Vec::new();
        field.step(&mut recorder(&mut draws));

        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].3.a, 3);
        let g = &field.glyphs()[0];
        assert_eq!(g.alpha, 255);
        assert!(g.y <= 0);
        assert!(glyphfall_glyphs::contains(GlyphSet::Cjk, g.glyph));
    }

    #[test]
    fn test_no_fade_keeps_opacity() {
        let mut field = Field::new(FieldConfig::preset(Variant::Columns, 240, 120), 1);
        for _ in 0..200 {
            field.step(&mut discard);
        }
        assert!(field.glyphs().iter().all(|g| g.alpha == 255));
    }

    #[test]
    fn test_random_palette_rerolls_color() {
        let config = FieldConfig {
            palette: Palette::Random,
            respawn: RespawnOffset::new(0, 0),
            speed: SpeedRange::new(1000, 1000),
            fade: None,
            ..FieldConfig::preset(Variant::Fade, 160, 160)
        };
        let mut field = Field::new(config, 77);
        let before: Vec<Rgba> = field.glyphs().iter().map(|g| g.color).collect();
        field.step(&mut discard);
        let after: Vec<Rgba> = field.glyphs().iter().map(|g| g.color).collect();
        // Every glyph overshot the bottom, so every color was drawn again.
        assert_eq!(field.respawns(), before.len() as u64);
        assert_ne!(before, after);
        assert!(field.glyphs().iter().all(|g| g.y == 0));
    }

    #[test]
    fn test_untouched_field_is_reproducible() {
        let config = FieldConfig::preset(Variant::Unicode, 800, 600);
        let a = Field::new(config.clone(), 1234);
        let b = Field::new(config, 1234);
        assert_eq!(a.glyphs(), b.glyphs());
        assert_eq!(a.frame(), 0);

        let mut drawn = 0;
        a.draw(&mut |_: char, _: i32, _: i32, _: Rgba| drawn += 1);
        assert_eq!(drawn, a.glyphs().len());
        assert_eq!(a.glyphs(), b.glyphs());
    }

    #[test]
    fn test_extreme_offsets_respawn_above_the_top() {
        let mut config = FieldConfig::preset(Variant::Fade, 0, 0);
        config.respawn = RespawnOffset::new(200_000_000, 200_000_000);
        config.fit_terminal(80, 24);
        let mut field = Field::new(config, 11);
        for _ in 0..100 {
            field.step(&mut discard);
        }
        assert!(field.respawns() > 0);
        assert!(field.glyphs().iter().all(|g| g.y <= 0));

        let config = FieldConfig::preset(Variant::Stream, 800, 600);
        let mut field = field_with(
            config,
            vec![FallingGlyph::new(0, i32::MAX - 1, 'Z', 6, Rgba::GREEN)],
        );
        field.step(&mut discard);
        assert_eq!(field.glyphs()[0].y, -12);
    }

    #[test]
    fn test_zero_sized_area() {
        let mut field = Field::new(FieldConfig::preset(Variant::Stream, 0, 0), 3);
        assert_eq!(field.glyphs().len(), 1);
        field.step(&mut discard);

        assert!(Field::new(FieldConfig::preset(Variant::Columns, 0, 0), 3).glyphs().is_empty());
        assert!(Field::new(FieldConfig::preset(Variant::Fade, 0, 0), 3).glyphs().is_empty());
    }
}
