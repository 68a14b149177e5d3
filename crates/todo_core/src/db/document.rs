//! In-memory JSON document with optional file backing.

use super::{DbError, DbResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A single JSON object whose top-level keys are collections.
///
/// Unknown top-level keys are carried through every write untouched.
#[derive(Debug)]
pub struct JsonDb {
    path: Option<PathBuf>,
    root: Map<String, Value>,
}

impl JsonDb {
    pub(super) fn new(path: Option<PathBuf>, root: Map<String, Value>) -> Self {
        Self { path, root }
    }

    /// Backing file, or `None` for in-memory documents.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns whether `collection` exists in the document.
    pub fn has(&self, collection: &str) -> bool {
        self.root.contains_key(collection)
    }

    /// Decodes `collection` into owned records.
    ///
    /// Returns `Ok(None)` when the collection is absent. The returned records
    /// never alias the document.
    pub fn read_collection<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> DbResult<Option<Vec<T>>> {
        let Some(value) = self.root.get(collection) else {
            return Ok(None);
        };
        if !value.is_array() {
            return Err(DbError::InvalidDocument(format!(
                "collection `{collection}` is not an array"
            )));
        }
        let records = Vec::<T>::deserialize(value)?;
        Ok(Some(records))
    }

    /// Replaces `collection` and persists the whole document.
    ///
    /// On persistence failure the previous collection value is restored.
    pub fn write_collection<T: Serialize>(
        &mut self,
        collection: &str,
        records: &[T],
    ) -> DbResult<()> {
        let value = serde_json::to_value(records)?;
        let previous = self.root.insert(collection.to_string(), value);

        if let Err(err) = self.flush() {
            match previous {
                Some(previous) => {
                    self.root.insert(collection.to_string(), previous);
                }
                None => {
                    self.root.remove(collection);
                }
            }
            return Err(err);
        }
        Ok(())
    }

    /// Creates `collection` as an empty array when it is missing.
    ///
    /// Returns `true` when the collection was created.
    pub fn ensure_collection(&mut self, collection: &str) -> DbResult<bool> {
        if self.has(collection) {
            return Ok(false);
        }
        self.write_collection::<Value>(collection, &[])?;
        Ok(true)
    }

    fn flush(&self) -> DbResult<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let rendered = serde_json::to_vec_pretty(&self.root)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&rendered)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|err| DbError::Io(err.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::JsonDb;
    use serde_json::{json, Map, Value};

    fn memory_db() -> JsonDb {
        JsonDb::new(None, Map::new())
    }

    #[test]
    fn missing_collection_reads_as_none() {
        let db = memory_db();
        assert!(!db.has("todos"));
        assert!(db.read_collection::<Value>("todos").unwrap().is_none());
    }

    #[test]
    fn ensure_collection_only_creates_once() {
        let mut db = memory_db();
        assert!(db.ensure_collection("todos").unwrap());
        db.write_collection("todos", &[json!({"id": "a"})]).unwrap();
        assert!(!db.ensure_collection("todos").unwrap());
        assert_eq!(db.read_collection::<Value>("todos").unwrap().unwrap().len(), 1);
    }

    #[test]
    fn non_array_collection_is_rejected() {
        let mut root = Map::new();
        root.insert("todos".to_string(), json!({"id": "a"}));
        let db = JsonDb::new(None, root);
        assert!(db.read_collection::<Value>("todos").is_err());
    }
}
