//! Persistent settings for the glyphfall screensaver.
//!
//! Settings live in `config.toml` under the platform config directory. A
//! missing file means defaults; a malformed one is an error.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr, bail};
use directories::ProjectDirs;
use glyphfall_core::Variant;
use glyphfall_field::{FadeRange, FieldConfig, RespawnOffset, Spawn, SpeedRange};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default frame cadence, roughly 60 frames per second.
pub const DEFAULT_FRAME_MS: u64 = 16;

/// Largest accepted `cell_size`, in pixels.
pub const MAX_CELL_SIZE: i32 = 1024;
/// Largest accepted speed, in pixels per frame.
pub const MAX_SPEED: i32 = 10_000;
/// Largest accepted respawn offset, in cells above the top.
pub const MAX_RESPAWN_CELLS: i32 = 1000;
/// Largest accepted opacity loss per frame.
pub const MAX_FADE: i16 = 255;
/// Largest accepted `per_column`.
pub const MAX_PER_COLUMN: usize = 1000;

const CONFIG_FILE: &str = "config.toml";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which flavor of the effect to start with.
    pub variant: Variant,
    /// Milliseconds between frames.
    pub frame_ms: u64,
    /// Fixed seed for reproducible runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Tweaks applied on top of the variant's preset.
    pub overrides: Overrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            frame_ms: DEFAULT_FRAME_MS,
            seed: None,
            overrides: Overrides::default(),
        }
    }
}

/// Optional adjustments to a preset. Unset keys keep the preset's value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respawn_min_cells: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respawn_max_cells: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_min: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_max: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_min: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_max: Option<i16>,
    /// Glyphs per column for grid variants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_column: Option<usize>,
}

impl Overrides {
    /// Apply every set key to `config`.
    ///
    /// Setting either fade bound turns fading on for variants that do not
    /// fade by default.
    pub fn apply(&self, config: &mut FieldConfig) {
        if let Some(cell) = self.cell_size {
            config.cell_size = cell;
        }
        config.respawn = RespawnOffset::new(
            self.respawn_min_cells.unwrap_or(config.respawn.min_cells),
            self.respawn_max_cells.unwrap_or(config.respawn.max_cells),
        );
        config.speed = SpeedRange::new(
            self.speed_min.unwrap_or(config.speed.min),
            self.speed_max.unwrap_or(config.speed.max),
        );
        if self.fade_min.is_some() || self.fade_max.is_some() {
            let base = config.fade.unwrap_or(FadeRange::new(0, 4));
            config.fade = Some(FadeRange::new(
                self.fade_min.unwrap_or(base.min),
                self.fade_max.unwrap_or(base.max),
            ));
        }
        if let (Some(n), Spawn::Grid { per_column }) = (self.per_column, &mut config.spawn) {
            *per_column = n;
        }
    }
}

impl Config {
    /// Location of the config file, if the platform has a config directory.
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "glyphfall").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("no config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let config =
            Self::from_toml(&text).wrap_err_with(|| format!("invalid config in {}", path.display()))?;
        debug!(path = %path.display(), variant = %config.variant, "loaded config");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let Some(path) = Self::path() else {
            bail!("no config directory on this platform");
        };
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).wrap_err_with(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Reject settings the field cannot honor.
    ///
    /// Ranges are checked as they come out of every variant's preset with the
    /// overrides applied, so a single bound cannot invert a preset's range.
    pub fn validate(&self) -> Result<()> {
        if self.frame_ms == 0 {
            bail!("frame_ms must be at least 1");
        }
        let o = &self.overrides;
        if o.cell_size.is_some_and(|c| !(1..=MAX_CELL_SIZE).contains(&c)) {
            bail!("cell_size must be between 1 and {MAX_CELL_SIZE}");
        }
        if [o.speed_min, o.speed_max]
            .into_iter()
            .flatten()
            .any(|s| !(1..=MAX_SPEED).contains(&s))
        {
            bail!("speeds must be between 1 and {MAX_SPEED}");
        }
        if [o.respawn_min_cells, o.respawn_max_cells]
            .into_iter()
            .flatten()
            .any(|c| !(0..=MAX_RESPAWN_CELLS).contains(&c))
        {
            bail!("respawn offsets must be between 0 and {MAX_RESPAWN_CELLS} cells above the top");
        }
        if [o.fade_min, o.fade_max]
            .into_iter()
            .flatten()
            .any(|f| !(0..=MAX_FADE).contains(&f))
        {
            bail!("fade steps must be between 0 and {MAX_FADE}");
        }
        if o.per_column.is_some_and(|n| n > MAX_PER_COLUMN) {
            bail!("per_column must be at most {MAX_PER_COLUMN}");
        }

        for variant in Variant::ALL {
            let field = self.field_config(variant, 0, 0);
            check_order(variant, "speed", field.speed.min, field.speed.max)?;
            check_order(
                variant,
                "respawn",
                field.respawn.min_cells,
                field.respawn.max_cells,
            )?;
            if let Some(fade) = field.fade {
                check_order(variant, "fade", fade.min, fade.max)?;
            }
        }
        Ok(())
    }

    /// The field configuration for `variant` with overrides applied.
    pub fn field_config(&self, variant: Variant, width: i32, height: i32) -> FieldConfig {
        let mut config = FieldConfig::preset(variant, width, height);
        self.overrides.apply(&mut config);
        config
    }
}

fn check_order<T: PartialOrd + std::fmt::Display>(
    variant: Variant,
    name: &str,
    min: T,
    max: T,
) -> Result<()> {
    if min > max {
        bail!("{name} range {min}..={max} is inverted for the {variant} variant");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("glyphfall-test-{}-{name}", std::process::id()))
            .join(CONFIG_FILE)
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.variant, Variant::Unicode);
        assert_eq!(config.frame_ms, 16);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::from_toml(
            r#"
            variant = "fade"
            seed = 42

            [overrides]
            respawn_max_cells = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.variant, Variant::Fade);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.frame_ms, DEFAULT_FRAME_MS);
        assert_eq!(config.overrides.respawn_max_cells, Some(4));
        assert_eq!(config.overrides.cell_size, None);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_toml("frame_ms = 0").is_err());
        assert!(Config::from_toml("variant = \"rain\"").is_err());
        assert!(Config::from_toml("[overrides]\nspeed_min = 0").is_err());
        assert!(Config::from_toml("[overrides]\nspeed_min = 5\nspeed_max = 2").is_err());
        assert!(Config::from_toml("[overrides]\nrespawn_min_cells = -1").is_err());
        assert!(Config::from_toml("[overrides]\ncell_size = 0").is_err());
        assert!(Config::from_toml("[overrides]\nfade_min = 3\nfade_max = 1").is_err());
    }

    #[test]
    fn test_rejects_oversized_values() {
        assert!(
            Config::from_toml(
                "[overrides]\nrespawn_min_cells = 200000000\nrespawn_max_cells = 200000000"
            )
            .is_err()
        );
        assert!(Config::from_toml("[overrides]\ncell_size = 100000000").is_err());
        assert!(Config::from_toml("[overrides]\nspeed_max = 2000000000").is_err());
        assert!(Config::from_toml("[overrides]\nfade_max = 1000").is_err());
        assert!(Config::from_toml("[overrides]\nper_column = 1000000").is_err());

        let at_caps = Config::from_toml(
            "[overrides]\ncell_size = 1024\nrespawn_max_cells = 1000\nspeed_max = 10000\nper_column = 1000",
        );
        assert!(at_caps.is_ok());
    }

    #[test]
    fn test_rejects_one_sided_inversions() {
        // Unicode speeds are 2..=6, so a lone minimum of 8 inverts them.
        let err = Config::from_toml("[overrides]\nspeed_min = 8").unwrap_err();
        assert!(err.to_string().contains("speed"), "{err}");
        // Presets fade by 0..=4 at most.
        assert!(Config::from_toml("[overrides]\nfade_min = 5").is_err());
        // The stream preset restarts exactly one cell up.
        assert!(Config::from_toml("[overrides]\nrespawn_min_cells = 2").is_err());
        // Fade speeds are 10..=14.
        assert!(Config::from_toml("[overrides]\nspeed_max = 8").is_err());

        assert!(Config::from_toml("[overrides]\nspeed_min = 8\nspeed_max = 20").is_ok());
        assert!(Config::from_toml("[overrides]\nrespawn_max_cells = 3").is_ok());
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = scratch_path("missing");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = scratch_path("save");
        let config = Config {
            variant: Variant::Columns,
            frame_ms: 33,
            seed: Some(7),
            overrides: Overrides {
                cell_size: Some(10),
                fade_max: Some(2),
                ..Default::default()
            },
        };
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_overrides_apply() {
        let config = Config {
            overrides: Overrides {
                cell_size: Some(8),
                respawn_min_cells: Some(2),
                speed_max: Some(3),
                per_column: Some(5),
                ..Default::default()
            },
            ..Default::default()
        };
        let field = config.field_config(Variant::Unicode, 80, 80);
        assert_eq!(field.cell_size, 8);
        assert_eq!(field.respawn, RespawnOffset::new(2, 9));
        assert_eq!(field.speed, SpeedRange::new(2, 3));
        assert_eq!(field.spawn, Spawn::Grid { per_column: 5 });
        assert_eq!(field.fade, Some(FadeRange::new(0, 4)));
    }

    #[test]
    fn test_fade_override_enables_fading() {
        let config = Config {
            overrides: Overrides {
                fade_max: Some(2),
                per_column: Some(5),
                ..Default::default()
            },
            ..Default::default()
        };
        let field = config.field_config(Variant::Columns, 120, 120);
        assert_eq!(field.fade, Some(FadeRange::new(0, 2)));
        // Ragged layouts have no fixed per-column count.
        assert_eq!(field.spawn, Spawn::Ragged { stride_cells: 10 });
    }
}
