//! In-process [`DatasetStore`] holding raw CSV bytes in memory.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use survey_insights_dataset_models::Dataset;

use crate::parse::parse_csv;
use crate::{DatasetError, DatasetStore, check_upload_name};

/// A [`DatasetStore`] that keeps datasets in memory.
///
/// Contents are stored as raw bytes and parsed on every load, so it behaves
/// exactly like [`crate::DirectoryStore`] minus the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dataset without validation, returning the store.
    ///
    /// Useful for seeding a store with content that should fail to parse.
    #[must_use]
    pub fn with_file(self, name: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), contents.into());
        self
    }
}

impl DatasetStore for MemoryStore {
    fn list(&self) -> Result<Vec<String>, DatasetError> {
        // BTreeMap keys are already sorted.
        Ok(self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect())
    }

    fn load(&self, name: &str) -> Result<Dataset, DatasetError> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        let bytes = files.get(name).ok_or_else(|| DatasetError::NotFound {
            name: name.to_string(),
        })?;
        parse_csv(name, bytes)
    }

    fn save(&self, name: &str, contents: &[u8]) -> Result<(), DatasetError> {
        check_upload_name(name)?;
        parse_csv(name, contents)?;

        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), contents.to_vec());

        log::debug!("Stored dataset '{name}' in memory ({} bytes)", contents.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_sorted_names() {
        let store = MemoryStore::new()
            .with_file("z.csv", "a\n1\n")
            .with_file("m.csv", "a\n1\n");
        assert_eq!(store.list().unwrap(), vec!["m.csv", "z.csv"]);
    }

    #[test]
    fn loads_seeded_file() {
        let store = MemoryStore::new().with_file("t.csv", "curso\nADS\nGRH\n");
        assert_eq!(store.load("t.csv").unwrap().row_count(), 2);
    }

    #[test]
    fn seeded_garbage_is_malformed_on_load() {
        let store = MemoryStore::new().with_file("bad.csv", b"a\n\xff\n".to_vec());
        assert!(matches!(
            store.load("bad.csv"),
            Err(DatasetError::Malformed { .. })
        ));
    }

    #[test]
    fn save_validates_before_storing() {
        let store = MemoryStore::new();
        assert!(store.save("x.txt", b"a\n1\n").is_err());
        assert!(store.save("x.csv", b"a,b\n1,2,3\n").is_err());
        assert!(store.list().unwrap().is_empty());

        store.save("x.csv", b"a\n1\n").unwrap();
        assert_eq!(store.list().unwrap(), vec!["x.csv"]);
    }
}
