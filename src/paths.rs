use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{self, ConfigError, Limits, LoadedConfig};

pub const SYSTEM_CONFIG: &str = "/aero/app-list.txt";
pub const CONFIG_FILE_NAME: &str = "app-list.txt";

/// Where the app list may live, most specific first.
pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }
    let mut candidates = vec![PathBuf::from(SYSTEM_CONFIG)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("aero").join(CONFIG_FILE_NAME));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join("aero").join(CONFIG_FILE_NAME));
    }
    candidates
}

/// Loads the first candidate that can be read.
pub fn load_first(
    candidates: &[PathBuf],
    limits: &Limits,
) -> Result<(PathBuf, LoadedConfig), ConfigError> {
    let mut last_err = None;
    for path in candidates {
        match config::load_with(path, limits) {
            Ok(loaded) => return Ok((path.clone(), loaded)),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "config candidate skipped");
                last_err = Some(err);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| ConfigError::NotFound {
        path: PathBuf::from(SYSTEM_CONFIG),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no candidate paths"),
    }))
}
