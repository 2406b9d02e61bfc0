//! Error types for tugrewrite.
//!
//! ## Taxonomy
//!
//! - **Shape errors** ([`ShapeError`]): a node was built or edited with a
//!   structurally required child missing or of the wrong kind. These are
//!   programmer errors. Infallible edit paths panic with the error message;
//!   fallible builders return it.
//! - **External failures** ([`RewriteError`]): parsing, file I/O, and
//!   configuration problems, always returned as `Result`.
//!
//! Dialect mismatches and stale caches are not errors. A visitor that cannot
//! handle a tree returns it unchanged, and a stale cache is recomputed.

use std::path::PathBuf;

use thiserror::Error;

/// A structurally invalid node construction or edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// A typed child slot received a node of another variant.
    #[error("expected {expected} node, found {found}")]
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
    },

    /// An element index was outside the padded sequence.
    #[error("index {index} out of bounds for {len} elements")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A required child was not supplied.
    #[error("{node} requires a {child}")]
    MissingChild {
        node: &'static str,
        child: &'static str,
    },
}

/// Unified error type for operations that touch the outside world.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// Shape violation surfaced through a fallible API.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Source text could not be parsed.
    #[error("parse error in {} at byte {offset}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        offset: usize,
        message: String,
    },

    /// Invalid configuration value or file.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A recipe reported a failure through its execution context.
    #[error("recipe '{recipe}' failed: {message}")]
    Recipe { recipe: String, message: String },

    /// File system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RewriteError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        RewriteError::Config {
            message: message.into(),
        }
    }

    /// Create a recipe failure.
    pub fn recipe(recipe: impl Into<String>, message: impl Into<String>) -> Self {
        RewriteError::Recipe {
            recipe: recipe.into(),
            message: message.into(),
        }
    }
}

/// Result alias used across the tugrewrite crates.
pub type RewriteResult<T> = Result<T, RewriteError>;
