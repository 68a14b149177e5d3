//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define CRUD contracts over the persisted `todos` collection.
//! - Isolate JSON document details from the store.
//!
//! # Invariants
//! - Write paths validate records before persisting them.
//! - Lookups by an unknown identifier return `RepoError::NotFound`.

pub mod todo_repo;
