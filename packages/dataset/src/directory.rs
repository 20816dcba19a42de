//! Directory-backed [`DatasetStore`].
//!
//! Each dataset is a `.csv` file directly inside the store's root
//! directory. The dataset name is the file name.

use std::path::{Path, PathBuf};

use survey_insights_dataset_models::Dataset;

use crate::parse::parse_csv;
use crate::paths::ensure_dir;
use crate::{DatasetError, DatasetStore, check_plain_name, check_upload_name, has_dataset_extension};

/// A [`DatasetStore`] over a directory of CSV files.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Creates a store rooted at `root`. The directory is created lazily on
    /// the first save.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding the dataset files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, DatasetError> {
        check_plain_name(name)?;
        Ok(self.root.join(name))
    }
}

impl DatasetStore for DirectoryStore {
    fn list(&self) -> Result<Vec<String>, DatasetError> {
        if !self.root.exists() {
            log::debug!("Dataset directory {} does not exist yet", self.root.display());
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && has_dataset_extension(name)
                && !name.starts_with('.')
            {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    fn load(&self, name: &str) -> Result<Dataset, DatasetError> {
        let path = self.path_for(name)?;

        if !path.is_file() {
            return Err(DatasetError::NotFound {
                name: name.to_string(),
            });
        }

        let bytes = std::fs::read(&path)?;
        let dataset = parse_csv(name, &bytes)?;

        log::info!(
            "Loaded dataset '{name}' ({} rows, {} columns)",
            dataset.row_count(),
            dataset.columns().len()
        );

        Ok(dataset)
    }

    fn save(&self, name: &str, contents: &[u8]) -> Result<(), DatasetError> {
        check_upload_name(name)?;
        let path = self.path_for(name)?;

        let dataset = parse_csv(name, contents)?;

        ensure_dir(&self.root)?;

        // Write next to the target and rename so readers never observe a
        // partially written file.
        let tmp = self.root.join(format!(".{name}.tmp"));
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &path)?;

        log::info!(
            "Saved dataset '{name}' ({} rows) to {}",
            dataset.row_count(),
            path.display()
        );

        Ok(())
    }
}
