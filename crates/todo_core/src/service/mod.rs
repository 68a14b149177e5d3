//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into store-level operations.
//! - Keep the presentation layer decoupled from storage details.

pub mod todo_store;
