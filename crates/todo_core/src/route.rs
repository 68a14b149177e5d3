//! Filter selection from `/todos/<filter>` paths.
//!
//! # Responsibility
//! - Map a presentation path onto a `FilterMode`.
//!
//! # Invariants
//! - `/todos` and `/todos/` redirect to `/todos/all`.
//! - Unknown filter segments resolve to `FilterMode::All` and keep their path.

use crate::model::todo::FilterMode;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TODOS_ROOT_PATH: &str = "/todos";

static TODOS_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/todos(?:/([^/?#]+))?/?$").expect("valid todos path regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Path is not under `/todos`.
    NotTodos(String),
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotTodos(path) => write!(f, "path `{path}` is not a todos path"),
        }
    }
}

impl Error for RouteError {}

/// Result of resolving a todos path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilter {
    pub filter: FilterMode,
    /// Path the presentation layer should show.
    pub canonical_path: String,
    /// Whether the input was the bare `/todos` path.
    pub redirected: bool,
}

/// Resolves `path` to the filter it selects.
pub fn filter_from_path(path: &str) -> Result<ResolvedFilter, RouteError> {
    let trimmed = path.trim();
    let captures = TODOS_PATH_RE
        .captures(trimmed)
        .ok_or_else(|| RouteError::NotTodos(trimmed.to_string()))?;

    let Some(segment) = captures.get(1).map(|m| m.as_str()) else {
        return Ok(ResolvedFilter {
            filter: FilterMode::All,
            canonical_path: path_for(FilterMode::All),
            redirected: true,
        });
    };

    // Strict match, unlike `FilterMode::from_str`: `Active` is not `active`.
    let filter = FilterMode::ALL
        .into_iter()
        .find(|mode| mode.as_str() == segment)
        .unwrap_or_default();

    Ok(ResolvedFilter {
        filter,
        canonical_path: format!("{TODOS_ROOT_PATH}/{segment}"),
        redirected: false,
    })
}

/// Path that selects `filter`.
pub fn path_for(filter: FilterMode) -> String {
    format!("{TODOS_ROOT_PATH}/{}", filter.as_str())
}
