//! To-do repository contracts and JSON document implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the persisted `todos` collection.
//! - Keep document encoding inside the persistence boundary.
//!
//! # Invariants
//! - Every write persists the full collection before returning `Ok`.
//! - Read paths reject records without an id instead of masking them.
//! - Title rules apply to creates and title edits, not to loaded records.
//! - Collection order is insertion order.

use crate::db::{DbError, JsonDb};
use crate::model::todo::{TodoId, TodoItem, TodoPatch, TodoValidationError};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Name of the collection holding to-do records.
pub const TODOS_COLLECTION: &str = "todos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for to-do persistence and lookups.
#[derive(Debug)]
pub enum RepoError {
    /// A new or edited record broke a model rule.
    Validation(TodoValidationError),
    Db(DbError),
    /// No record has the given id.
    NotFound(TodoId),
    DuplicateId(TodoId),
    /// The stored collection could not be decoded or holds a record without an id.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::DuplicateId(id) => write!(f, "todo already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateId(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Repository interface for the persisted to-do collection.
pub trait TodoRepository {
    /// Returns whether the collection has been initialized.
    fn has_todos(&self) -> bool;
    /// Creates the collection as an empty list when missing.
    fn init_todos(&mut self) -> RepoResult<()>;
    /// Returns an owned copy of every record in collection order.
    fn list_todos(&self) -> RepoResult<Vec<TodoItem>>;
    /// Appends `todo` after validating it.
    ///
    /// # Contract
    /// - Fails with `DuplicateId` when the id is already stored.
    fn create_todo(&mut self, todo: &TodoItem) -> RepoResult<()>;
    /// Merges `patch` into the record and returns the updated record.
    fn update_todo(&mut self, id: &TodoId, patch: &TodoPatch, now: DateTime<Utc>)
        -> RepoResult<TodoItem>;
    /// Removes the record, or fails with `NotFound` without writing.
    fn delete_todo(&mut self, id: &TodoId) -> RepoResult<()>;
    /// Sets `done` on every record and returns the new collection.
    fn set_all_done(&mut self, done: bool, now: DateTime<Utc>) -> RepoResult<Vec<TodoItem>>;
}

/// JSON-document-backed to-do repository.
#[derive(Debug)]
pub struct JsonTodoRepository {
    db: JsonDb,
}

impl JsonTodoRepository {
    /// Wraps an opened document. The collection is not created here.
    pub fn new(db: JsonDb) -> Self {
        Self { db }
    }

    fn load(&self) -> RepoResult<Vec<TodoItem>> {
        let records = self
            .db
            .read_collection::<TodoItem>(TODOS_COLLECTION)
            .map_err(|err| match err {
                DbError::Json(err) => RepoError::InvalidData(err.to_string()),
                other => RepoError::Db(other),
            })?
            .unwrap_or_default();

        for record in &records {
            record.validate_stored().map_err(|err| {
                RepoError::InvalidData(format!("record `{}`: {err}", record.id))
            })?;
        }
        Ok(records)
    }

    fn store(&mut self, records: &[TodoItem]) -> RepoResult<()> {
        self.db.write_collection(TODOS_COLLECTION, records)?;
        Ok(())
    }
}

impl TodoRepository for JsonTodoRepository {
    fn has_todos(&self) -> bool {
        self.db.has(TODOS_COLLECTION)
    }

    fn init_todos(&mut self) -> RepoResult<()> {
        self.db.ensure_collection(TODOS_COLLECTION)?;
        Ok(())
    }

    fn list_todos(&self) -> RepoResult<Vec<TodoItem>> {
        self.load()
    }

    fn create_todo(&mut self, todo: &TodoItem) -> RepoResult<()> {
        todo.validate()?;

        let mut records = self.load()?;
        if records.iter().any(|record| record.id == todo.id) {
            return Err(RepoError::DuplicateId(todo.id.clone()));
        }
        records.push(todo.clone());
        self.store(&records)
    }

    fn update_todo(
        &mut self,
        id: &TodoId,
        patch: &TodoPatch,
        now: DateTime<Utc>,
    ) -> RepoResult<TodoItem> {
        let mut records = self.load()?;
        let Some(record) = records.iter_mut().find(|record| &record.id == id) else {
            return Err(RepoError::NotFound(id.clone()));
        };

        patch.apply_to(record, now);
        if patch.title.is_some() {
            record.validate()?;
        }
        let updated = record.clone();

        self.store(&records)?;
        Ok(updated)
    }

    fn delete_todo(&mut self, id: &TodoId) -> RepoResult<()> {
        let mut records = self.load()?;
        let Some(position) = records.iter().position(|record| &record.id == id) else {
            return Err(RepoError::NotFound(id.clone()));
        };

        records.remove(position);
        self.store(&records)
    }

    fn set_all_done(&mut self, done: bool, now: DateTime<Utc>) -> RepoResult<Vec<TodoItem>> {
        let mut records = self.load()?;
        for record in &mut records {
            record.done = done;
            record.updated_at = now;
        }

        self.store(&records)?;
        Ok(records)
    }
}
