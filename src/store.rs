//! Flat-file JSON document storage.
//!
//! Two documents live in the data directory:
//! ```text
//! <DATA_DIR>/
//!   ingredients.json
//!   recipes.json
//! ```
//!
//! Every operation reads or rewrites a whole document. There is no file
//! locking and no write-ahead step: two concurrent writers are last-write-wins
//! on the entire file.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Documents managed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocName {
    Ingredients,
    Recipes,
}

impl DocName {
    /// Returns the filename for this document.
    pub fn filename(&self) -> &'static str {
        match self {
            DocName::Ingredients => "ingredients.json",
            DocName::Recipes => "recipes.json",
        }
    }
}

/// Errors that can occur reading or writing a document.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error reading or writing a file.
    Io(PathBuf, io::Error),
    /// The file contents are not valid JSON for the expected document.
    Parse(PathBuf, serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StoreError::Parse(path, e) => {
                write!(f, "Failed to parse document {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(_, e) => Some(e),
            StoreError::Parse(_, e) => Some(e),
        }
    }
}

/// File-resident JSON document store.
///
/// Documents are rewritten in full, pretty-printed, on every save. A missing
/// file reads as the document type's `Default` (fresh install).
#[derive(Debug, Clone)]
pub struct DocumentStore {
    data_dir: PathBuf,
}

impl DocumentStore {
    /// Creates a store rooted at the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the full path for a document.
    fn doc_path(&self, name: DocName) -> PathBuf {
        self.data_dir.join(name.filename())
    }

    /// Loads a document, returning `T::default()` if the file doesn't exist.
    pub fn load<T>(&self, name: DocName) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.doc_path(name);

        match fs::read_to_string(&path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| StoreError::Parse(path, e))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(StoreError::Io(path, e)),
        }
    }

    /// Saves a document, replacing the file contents entirely.
    ///
    /// Creates the data directory if it doesn't exist. The write is a single
    /// whole-file rewrite with no rename step; a crash mid-write can leave a
    /// truncated document.
    pub fn save<T>(&self, name: DocName, doc: &T) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StoreError::Io(self.data_dir.clone(), e))?;

        let path = self.doc_path(name);
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| StoreError::Parse(path.clone(), e))?;

        fs::write(&path, json).map_err(|e| StoreError::Io(path, e))
    }

    /// Loads a document, applies the mutator, and saves the result.
    ///
    /// This is the read-modify-write unit for every mutation: callers never
    /// touch the file in two steps, so adding a lock or an atomic write later
    /// only changes this function.
    pub fn update<T, F, R>(&self, name: DocName, mutate: F) -> Result<R, StoreError>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> R,
    {
        let mut doc: T = self.load(name)?;
        let out = mutate(&mut doc);
        self.save(name, &doc)?;
        Ok(out)
    }
}
