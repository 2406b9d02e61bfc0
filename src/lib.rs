//! Tugrewrite: lossless semantic trees and composable rewrite recipes.
//!
//! The tree substrate lives in the workspace crates and is re-exported here:
//! - [`tugrewrite_core`]: ids, markers, source metadata, the derived-view
//!   cache, run configuration, and errors
//! - [`tugrewrite_lst`]: the padding model, nodes, cursor, visitor dispatch,
//!   and the reference Groovy parser and printer
//!
//! This crate adds recipe composition on top:
//! - [`Recipe`]: a precondition plus a main visitor
//! - [`Precondition`]: memoized matcher passes combined with AND/OR
//! - [`Pipeline`]: recipes in sequence over one tree, in parallel over many
//!
//! # Example
//!
//! ```ignore
//! let cu = parse_groovy("build.gradle", &source)?;
//! let pipeline = Pipeline::new(RunConfig::default()).with_recipe(MyRecipe::new());
//! let result = pipeline.run(&cu, &mut ExecutionContext::new(RunConfig::default()));
//! println!("{}", print_tree(&J::CompilationUnit(result.after)));
//! ```

// Substrate - re-exported from the workspace crates
pub use tugrewrite_core::{cache, config, error, id, marker, source};
pub use tugrewrite_lst::{
    cursor, padding, parser, printer, search, space, tree, types, types_in_use, visitor,
};

pub use tugrewrite_core::{
    ConfigSource, ConfigValue, DerivedCache, Marker, Markers, Markup, MarkupLevel,
    RecipesThatMadeChanges, ResolvedRunConfig, RewriteError, RewriteResult, RunConfig,
    RunOverrides, SearchResult, ShapeError, SourceMetadata, TreeId,
};
pub use tugrewrite_lst::{
    parse_file, parse_groovy, print_marked, print_tree, Container, Cursor, Gate, LeftPadded,
    RightPadded, Space, Traversal, Tree, TreeVisitor, TypedTree, J,
};

// Recipe composition
pub mod execution;
pub mod pipeline;
pub mod precondition;
pub mod recipe;

pub use execution::ExecutionContext;
pub use pipeline::{Pipeline, RunResult, RunSummary};
pub use precondition::{Matcher, Precondition};
pub use recipe::{apply_recipe, Recipe, RecipeVisitor};
