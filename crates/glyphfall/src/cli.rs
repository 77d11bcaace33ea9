//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use glyphfall_config::Config;
use glyphfall_core::Variant;

/// Falling-character terminal screensaver.
///
/// Keys: space pauses, v cycles the variant, r reseeds, q or Esc quits.
#[derive(Debug, Parser)]
#[command(name = "glyphfall", version, about)]
pub struct Args {
    /// Variant to start with.
    #[arg(short, long, value_enum)]
    pub variant: Option<Variant>,

    /// Seed for a reproducible animation.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Milliseconds between frames.
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub frame_ms: Option<u64>,

    /// Read settings from this file instead of the default location.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the effective settings to the config file and exit.
    #[arg(long)]
    pub save_config: bool,
}

impl Args {
    /// Load the config file and layer command-line flags over it.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(frame_ms) = self.frame_ms {
            config.frame_ms = frame_ms;
        }
        config.validate()?;
        Ok(config)
    }

    /// Save `config` where it was read from.
    pub fn save(&self, config: &Config) -> Result<PathBuf> {
        match &self.config {
            Some(path) => {
                config.save_to(path)?;
                Ok(path.clone())
            }
            None => config.save(),
        }
    }
}
