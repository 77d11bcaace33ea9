//! Optional file logging.
//!
//! The animation owns the terminal, so log output goes to a file, and only
//! when `GLYPHFALL_LOG` holds a filter such as `debug` or `glyphfall_field=trace`.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::{Result, WrapErr};
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "GLYPHFALL_LOG";

const LOG_FILE: &str = "glyphfall.log";

/// Install the global subscriber if logging was requested.
///
/// Returns the log file path when logging is on.
pub fn init() -> Result<Option<PathBuf>> {
    let Some(directives) = std::env::var_os(LOG_ENV) else {
        return Ok(None);
    };
    let filter = parse_filter(&directives.to_string_lossy())?;
    let (path, file) = open_log(&log_dir())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(Some(path))
}

/// Parse a `GLYPHFALL_LOG` value into a filter.
fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .wrap_err_with(|| format!("invalid {LOG_ENV} filter {directives:?}"))
}

/// Directory the log file lives in.
fn log_dir() -> PathBuf {
    ProjectDirs::from("", "", "glyphfall")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir)
}

/// Open the log file in `dir` for appending, creating both as needed.
fn open_log(dir: &Path) -> Result<(PathBuf, File)> {
    fs::create_dir_all(dir).wrap_err_with(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("failed to open {}", path.display()))?;
    Ok((path, file))
}
