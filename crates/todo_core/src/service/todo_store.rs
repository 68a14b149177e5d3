//! To-do store: in-memory list mirrored into a persistent collection.
//!
//! # Responsibility
//! - Own the ordered in-memory list and the display filter.
//! - Expose read projections (filtered list, counts).
//! - Run every write against the repository first, then mirror it in memory.
//!
//! # Invariants
//! - After every operation that returns, the in-memory list and the persisted
//!   collection hold the same items by identifier, in the same order.
//! - When the repository write fails, the in-memory list is left untouched.
//! - Unknown identifiers fail with `RepoError::NotFound` before any write.
//!
//! # See also
//! - `repo::todo_repo` for the persistence contract.

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::db::open_db;
use crate::model::todo::{FilterMode, TodoId, TodoItem, TodoPatch};
use crate::repo::todo_repo::{JsonTodoRepository, RepoError, RepoResult, TodoRepository};
use log::{debug, error, info};

/// Stateful to-do store over a repository implementation.
pub struct TodoStore<R: TodoRepository> {
    repo: R,
    clock: Box<dyn Clock>,
    todos: Vec<TodoItem>,
    filter: FilterMode,
}

impl TodoStore<JsonTodoRepository> {
    /// Opens the JSON document described by `config` and loads the store.
    pub fn open_json(config: &StoreConfig) -> RepoResult<Self> {
        let db = open_db(config.db_path())?;
        Self::open(JsonTodoRepository::new(db))
    }
}

impl<R: TodoRepository> TodoStore<R> {
    /// Loads the store using the system clock.
    pub fn open(repo: R) -> RepoResult<Self> {
        Self::open_with_clock(repo, Box::new(SystemClock))
    }

    /// Loads the store, initializing an empty collection when none exists.
    ///
    /// The in-memory list is an owned copy of the persisted records.
    pub fn open_with_clock(mut repo: R, clock: Box<dyn Clock>) -> RepoResult<Self> {
        let todos = if repo.has_todos() {
            repo.list_todos()?
        } else {
            repo.init_todos()?;
            Vec::new()
        };
        info!(
            "event=store_open module=store status=ok total={}",
            todos.len()
        );

        Ok(Self {
            repo,
            clock,
            todos,
            filter: FilterMode::default(),
        })
    }

    /// Items selected by the current filter, in list order.
    pub fn filtered_todos(&self) -> Vec<&TodoItem> {
        self.todos
            .iter()
            .filter(|todo| self.filter.matches(todo))
            .collect()
    }

    /// Every item in list order.
    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    /// Looks up an item by id in memory.
    pub fn get(&self, id: &TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    /// Number of items, ignoring the filter.
    pub fn total(&self) -> usize {
        self.todos.len()
    }

    /// Number of items not yet done.
    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.is_active()).count()
    }

    /// Number of done items.
    ///
    /// # Contract
    /// - `active_count() + completed_count() == total()`.
    pub fn completed_count(&self) -> usize {
        self.total() - self.active_count()
    }

    /// Current filter. Starts at `FilterMode::All` on every open.
    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Read access to the backing repository, e.g. to compare with memory.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates an open item and appends it to both sides.
    pub fn create_todo(&mut self, title: &str) -> RepoResult<TodoItem> {
        let todo = TodoItem::new(title, self.clock.now())?;

        if let Err(err) = self.repo.create_todo(&todo) {
            error!(
                "event=todo_create module=store status=error error={}",
                err
            );
            return Err(err);
        }
        self.todos.push(todo.clone());

        debug!(
            "event=todo_create module=store status=ok id={} total={}",
            todo.id,
            self.todos.len()
        );
        Ok(todo)
    }

    /// Merges `patch` into the item with `id` on both sides.
    ///
    /// # Contract
    /// - An empty patch changes nothing and skips persistence.
    /// - On success the in-memory item is the record the repository persisted.
    pub fn update_todo(&mut self, id: &TodoId, patch: TodoPatch) -> RepoResult<&TodoItem> {
        let position = self.position_of(id)?;
        let patch = patch.normalized()?;
        if patch.is_empty() {
            return Ok(&self.todos[position]);
        }

        let now = self.clock.now();
        let updated = match self.repo.update_todo(id, &patch, now) {
            Ok(updated) => updated,
            Err(err) => {
                error!(
                    "event=todo_update module=store status=error id={} error={}",
                    id, err
                );
                return Err(err);
            }
        };
        self.todos[position] = updated;

        debug!("event=todo_update module=store status=ok id={}", id);
        Ok(&self.todos[position])
    }

    /// Removes the item with `id` from both sides and returns it.
    pub fn delete_todo(&mut self, id: &TodoId) -> RepoResult<TodoItem> {
        let position = self.position_of(id)?;

        if let Err(err) = self.repo.delete_todo(id) {
            error!(
                "event=todo_delete module=store status=error id={} error={}",
                id, err
            );
            return Err(err);
        }
        let removed = self.todos.remove(position);

        debug!(
            "event=todo_delete module=store status=ok id={} total={}",
            id,
            self.todos.len()
        );
        Ok(removed)
    }

    /// Changes which subset `filtered_todos` returns. Not persisted.
    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
    }

    /// Sets `done = checked` on every item, then reloads the list from the
    /// persisted result.
    pub fn complete_all(&mut self, checked: bool) -> RepoResult<()> {
        let now = self.clock.now();
        let records = match self.repo.set_all_done(checked, now) {
            Ok(records) => records,
            Err(err) => {
                error!(
                    "event=todo_complete_all module=store status=error checked={} error={}",
                    checked, err
                );
                return Err(err);
            }
        };
        self.todos = records;

        info!(
            "event=todo_complete_all module=store status=ok checked={} total={}",
            checked,
            self.todos.len()
        );
        Ok(())
    }

    /// Deletes every completed item and returns how many were removed.
    ///
    /// Identifiers are collected before deleting, so the remaining items keep
    /// their relative order. A failure stops the sweep; items deleted before
    /// it stay deleted on both sides.
    pub fn clear_completed(&mut self) -> RepoResult<usize> {
        let completed: Vec<TodoId> = self
            .todos
            .iter()
            .filter(|todo| todo.done)
            .map(|todo| todo.id.clone())
            .collect();

        for id in &completed {
            self.delete_todo(id)?;
        }

        info!(
            "event=todo_clear_completed module=store status=ok removed={} total={}",
            completed.len(),
            self.todos.len()
        );
        Ok(completed.len())
    }

    fn position_of(&self, id: &TodoId) -> RepoResult<usize> {
        self.todos
            .iter()
            .position(|todo| &todo.id == id)
            .ok_or_else(|| RepoError::NotFound(id.clone()))
    }
}
