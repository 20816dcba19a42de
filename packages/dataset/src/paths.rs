#![allow(clippy::module_name_repetitions)]
//! Default locations for uploaded datasets.

use std::path::{Path, PathBuf};

/// Environment variable overriding the dataset directory.
pub const DATA_DIR_ENV: &str = "SURVEY_INSIGHTS_DATA_DIR";

/// Dataset directory used when [`DATA_DIR_ENV`] is not set.
pub const DEFAULT_DATA_DIR: &str = "data/uploads";

/// Returns the directory uploaded datasets are stored in.
///
/// Reads [`DATA_DIR_ENV`], falling back to [`DEFAULT_DATA_DIR`] relative to
/// the working directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from)
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
