//! Document bootstrap utilities.
//!
//! # Responsibility
//! - Open file-backed or in-memory JSON documents.
//! - Reject files whose root is not a JSON object.
//!
//! # Invariants
//! - Opening never writes the document file; it may create the parent
//!   directory. The file is created by the first collection write.
//! - A missing or blank file opens as an empty document.

use super::{DbError, DbResult, JsonDb};
use log::{error, info};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

/// Opens a JSON document file, creating its parent directory if needed.
///
/// # Side effects
/// - May create the parent directory of `path`.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<JsonDb> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    match load_root(path) {
        Ok(root) => {
            info!(
                "event=db_open module=db status=ok mode=file duration_ms={} collections={}",
                started_at.elapsed().as_millis(),
                root.len()
            );
            Ok(JsonDb::new(Some(path.to_path_buf()), root))
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens an empty document that is never written to disk.
pub fn open_db_in_memory() -> DbResult<JsonDb> {
    info!("event=db_open module=db status=ok mode=memory duration_ms=0");
    Ok(JsonDb::new(None, Map::new()))
}

fn load_root(path: &Path) -> DbResult<Map<String, Value>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
        Err(err) => return Err(err.into()),
    };
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(&raw)? {
        Value::Object(root) => Ok(root),
        other => Err(DbError::InvalidDocument(format!(
            "document root must be an object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
