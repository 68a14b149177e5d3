//! Store location settings.
//!
//! # Responsibility
//! - Resolve where the JSON document of a store lives on disk.
//!
//! # Invariants
//! - The document file is always `<data_dir>/<slot>.json`.

use std::path::{Path, PathBuf};

/// Slot name used when none is configured.
pub const DEFAULT_SLOT: &str = "todo-app";

/// Location of a store's JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub slot: String,
}

impl StoreConfig {
    /// Uses `data_dir` with the default `todo-app` slot.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            slot: DEFAULT_SLOT.to_string(),
        }
    }

    /// Replaces the slot, which names the document file inside `data_dir`.
    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    /// Full path of the JSON document file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.slot))
    }

    /// Directory holding the document file.
    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_path()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
