//! To-do item model, field patches and filter modes.
//!
//! # Responsibility
//! - Define the persisted record shape (`id`, `title`, `createdAt`,
//!   `updatedAt`, `done`).
//! - Provide explicit field setters (`TodoPatch`) instead of free-form merges.
//!
//! # Invariants
//! - `id` is never empty and never changes after creation.
//! - `title` is never empty after normalization.
//! - Records written by this crate satisfy `updated_at >= created_at`.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Length of generated identifiers, in hex characters.
pub const TODO_ID_LEN: usize = 10;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Validation failures for to-do records and patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Identifier is empty.
    EmptyId,
    /// Title is empty after whitespace normalization.
    EmptyTitle,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "todo id cannot be empty"),
            Self::EmptyTitle => write!(f, "todo title cannot be empty"),
        }
    }
}

impl Error for TodoValidationError {}

/// Opaque random identifier of a to-do item.
///
/// Serialized as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Generates a fresh identifier of `TODO_ID_LEN` lowercase hex characters.
    pub fn generate() -> Self {
        let mut value = Uuid::new_v4().simple().to_string();
        value.truncate(TODO_ID_LEN);
        Self(value)
    }

    /// Wraps an existing identifier, e.g. one typed by a user.
    pub fn parse(value: impl Into<String>) -> Result<Self, TodoValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TodoValidationError::EmptyId);
        }
        Ok(Self(value))
    }

    /// Borrows the identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One to-do record, identical in memory and on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub done: bool,
}

impl TodoItem {
    /// Creates an open item stamped with `now` for both timestamps.
    ///
    /// The title is normalized with [`normalize_title`].
    pub fn new(title: &str, now: DateTime<Utc>) -> Result<Self, TodoValidationError> {
        Self::with_id(TodoId::generate(), title, now)
    }

    /// Creates an open item with a caller-provided identifier.
    pub fn with_id(
        id: TodoId,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, TodoValidationError> {
        let item = Self {
            id,
            title: normalize_title(title),
            created_at: now,
            updated_at: now,
            done: false,
        };
        item.validate()?;
        Ok(item)
    }

    /// Checks the invariants a new or edited item must satisfy.
    ///
    /// # Contract
    /// - The id and the title are non-empty after trimming.
    /// - Timestamp ordering is not checked.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        self.validate_stored()?;
        if self.title.trim().is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Checks the invariants a persisted record must satisfy to load.
    ///
    /// Only the id is required. Blank titles and out-of-order timestamps in
    /// existing files still load so the records can be edited or removed.
    pub fn validate_stored(&self) -> Result<(), TodoValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(TodoValidationError::EmptyId);
        }
        Ok(())
    }

    /// Returns whether the item still needs doing.
    pub fn is_active(&self) -> bool {
        !self.done
    }
}

/// Field changes applied by an update.
///
/// Unset fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub done: Option<bool>,
}

impl TodoPatch {
    /// Creates a patch that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title. It is normalized by [`TodoPatch::normalized`].
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the completion flag.
    pub fn done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }

    /// Returns whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.done.is_none()
    }

    /// Normalizes the title (if any) and rejects titles that end up empty.
    pub fn normalized(self) -> Result<Self, TodoValidationError> {
        let title = match self.title {
            Some(raw) => {
                let title = normalize_title(&raw);
                if title.is_empty() {
                    return Err(TodoValidationError::EmptyTitle);
                }
                Some(title)
            }
            None => None,
        };
        Ok(Self {
            title,
            done: self.done,
        })
    }

    /// Merges set fields into `item` and stamps `updated_at`.
    ///
    /// `id` and `created_at` are never touched.
    pub fn apply_to(&self, item: &mut TodoItem, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(done) = self.done {
            item.done = done;
        }
        item.updated_at = now;
    }
}

/// Which subset of items a read projection returns.
///
/// Names are matched two ways. [`FromStr`] is lenient for typed input: it
/// trims and ignores ASCII case, so `" Active "` parses. Path segments in
/// [`crate::route::filter_from_path`] are strict: only the exact lowercase
/// name selects a filter, and `/todos/Active` falls back to `All`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub const ALL: [FilterMode; 3] = [Self::All, Self::Active, Self::Completed];

    /// Canonical lowercase name, as used in paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Returns whether `item` belongs to this filter's subset.
    pub fn matches(self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.done,
            Self::Completed => item.done,
        }
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown filter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFilterError(pub String);

impl Display for ParseFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown filter `{}`; expected all|active|completed",
            self.0
        )
    }
}

impl Error for ParseFilterError {}

impl FromStr for FilterMode {
    type Err = ParseFilterError;

    // Lenient: trimmed and case-insensitive.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// Trims a title and collapses inner whitespace runs to a single space.
pub fn normalize_title(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned()
}
