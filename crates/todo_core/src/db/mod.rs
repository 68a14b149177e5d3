//! JSON document storage bootstrap.
//!
//! # Responsibility
//! - Open file-backed or in-memory JSON documents keyed by collection name.
//! - Persist document changes atomically (temp file + rename).
//!
//! # Invariants
//! - The document root is always a JSON object.
//! - A failed write leaves both the file and the in-memory document at the
//!   last successfully written state.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod document;
mod open;

pub use document::JsonDb;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidDocument(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::InvalidDocument(message) => write!(f, "invalid json document: {message}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidDocument(_) => None,
        }
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for DbError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
