//! Domain model for the to-do list.
//!
//! # Responsibility
//! - Define the canonical to-do record shared by the store and persistence.
//! - Define the display filter used by read projections.
//!
//! # Invariants
//! - Every item is identified by a stable, immutable `TodoId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod todo;
