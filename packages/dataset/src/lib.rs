#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset repository for uploaded survey exports.
//!
//! The analytics engine never touches the filesystem itself. It is handed a
//! [`DatasetStore`], a capability object that lists, loads, and saves
//! datasets by plain name. [`DirectoryStore`] backs it with a directory of
//! CSV files and [`MemoryStore`] keeps everything in process.

pub mod directory;
pub mod memory;
pub mod parse;
pub mod paths;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;
pub use survey_insights_dataset_models::Dataset;

use thiserror::Error;

/// File extension accepted for uploaded datasets.
pub const DATASET_EXTENSION: &str = "csv";

/// Errors that can occur while resolving or storing a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// No dataset exists under this name.
    #[error("Dataset '{name}' not found")]
    NotFound {
        /// Requested dataset name.
        name: String,
    },

    /// The dataset content could not be parsed as tabular data.
    #[error("Dataset '{name}' is malformed: {message}")]
    Malformed {
        /// Dataset name.
        name: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The dataset name is not acceptable for this store.
    #[error("Invalid dataset name '{name}': {reason}")]
    InvalidName {
        /// Offending name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read/write-by-name access to survey datasets.
///
/// Implementations must be deterministic: the same store state always lists
/// the same names in the same order.
pub trait DatasetStore: Send + Sync {
    /// Lists the names of all available datasets, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the backing storage cannot be read.
    fn list(&self) -> Result<Vec<String>, DatasetError>;

    /// Loads and parses the dataset stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotFound`] if nothing is stored under `name`
    /// and [`DatasetError::Malformed`] if the content is not parseable.
    fn load(&self, name: &str) -> Result<Dataset, DatasetError>;

    /// Stores `contents` under `name`, replacing any existing dataset.
    ///
    /// The contents are parsed before anything is written, so a malformed
    /// upload never replaces a good dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidName`] for names that are not plain
    /// `.csv` file names, [`DatasetError::Malformed`] for unparseable
    /// contents, and [`DatasetError::Io`] if the write fails.
    fn save(&self, name: &str, contents: &[u8]) -> Result<(), DatasetError>;
}

/// Returns `true` if `name` carries the dataset file extension
/// (case-insensitive).
#[must_use]
pub fn has_dataset_extension(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DATASET_EXTENSION))
}

/// Checks that `name` is a single plain file name.
///
/// # Errors
///
/// Returns [`DatasetError::InvalidName`] for empty names, names containing
/// path separators, or relative path components.
pub fn check_plain_name(name: &str) -> Result<(), DatasetError> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name.contains(['/', '\\']) {
        Some("name must not contain path separators")
    } else if name == "." || name == ".." || name.starts_with('.') {
        Some("name must not start with '.'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DatasetError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Checks that `name` is acceptable for an upload: a plain `.csv` file name.
///
/// # Errors
///
/// Returns [`DatasetError::InvalidName`] if the name is not a plain file
/// name or lacks the `.csv` extension.
pub fn check_upload_name(name: &str) -> Result<(), DatasetError> {
    check_plain_name(name)?;

    if !has_dataset_extension(name) {
        return Err(DatasetError::InvalidName {
            name: name.to_string(),
            reason: format!("only .{DATASET_EXTENSION} files are accepted"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_csv_extension() {
        assert!(has_dataset_extension("respostas.csv"));
        assert!(has_dataset_extension("RESPOSTAS.CSV"));
        assert!(!has_dataset_extension("respostas.xlsx"));
        assert!(!has_dataset_extension("csv"));
    }

    #[test]
    fn rejects_path_like_names() {
        assert!(check_plain_name("../secret.csv").is_err());
        assert!(check_plain_name("dir/file.csv").is_err());
        assert!(check_plain_name("dir\\file.csv").is_err());
        assert!(check_plain_name(".hidden.csv").is_err());
        assert!(check_plain_name("  ").is_err());
        assert!(check_plain_name("turma_2024.csv").is_ok());
    }

    #[test]
    fn upload_names_must_be_csv() {
        assert!(matches!(
            check_upload_name("notas.txt"),
            Err(DatasetError::InvalidName { .. })
        ));
        assert!(check_upload_name("notas.csv").is_ok());
    }
}
