//! Compile-only test to verify public API surface.
//!
//! This file serves as a compile-time contract for the public API.
//! If this file fails to compile, the public API has regressed.
//!
//! Run with: cargo test -- api_surface

#![allow(unused_imports)]

// ============================================================================
// Core Infrastructure Types
// ============================================================================

// ids, markers, and source metadata
use tugrewrite::id::TreeId;
use tugrewrite::marker::{
    Marker, Markers, Markup, MarkupLevel, RecipesThatMadeChanges, SearchResult,
};
use tugrewrite::source::{Checksum, FileAttributes, SourceMetadata, UTF8_BOM};

// derived views
use tugrewrite::cache::DerivedCache;

// configuration
use tugrewrite::config::{
    ConfigSource, ConfigValue, ResolvedRunConfig, RunConfig, RunOverrides, ENV_MARK_PROVENANCE,
    ENV_MAX_CYCLES, ENV_PARALLEL,
};

// errors
use tugrewrite::error::{RewriteError, RewriteResult, ShapeError};

// ============================================================================
// Tree Model
// ============================================================================

use tugrewrite::padding::{all_identical, Container, Identical, Keyed, LeftPadded, RightPadded};
use tugrewrite::space::{Comment, CommentStyle, Space};
use tugrewrite::tree::{
    Binary, BinaryOperator, Block, ClassDeclaration, CompilationUnit, CompilationUnitBuilder,
    Dialect, Empty, ExpressionStatement, FieldAccess, GBinary, GBinaryOperator, GString,
    GStringValue, Identifier, JKind, ListLiteral, Literal, LiteralValue, MapEntry, MapLiteral,
    Range, TrailingComma, Tree, TypedTree, VariableDeclaration, J,
};
use tugrewrite::types::{JavaType, Primitive};
use tugrewrite::types_in_use::TypesInUse;

// ============================================================================
// Traversal, Search, and Printing
// ============================================================================

use tugrewrite::cursor::Cursor;
use tugrewrite::printer::{print_marked, print_tree, Codegen, CodegenState};
use tugrewrite::search::{
    find_all, find_matching, found, is_found, marked, strip_search_results, SearchResults,
};
use tugrewrite::visitor::{
    run, run_gated, walk_map_entry, Gate, GateDecision, Traversal, TreeVisitor, Visit,
};

// reference parser
use tugrewrite::parser::{parse_file, parse_groovy};

// ============================================================================
// Recipes
// ============================================================================

use tugrewrite::execution::ExecutionContext;
use tugrewrite::pipeline::{Pipeline, RunResult, RunSummary};
use tugrewrite::precondition::{Matcher, Precondition};
use tugrewrite::recipe::{apply_recipe, Recipe, RecipeVisitor};

// ============================================================================
// Test
// ============================================================================

#[test]
fn api_surface_compiles() {
    // The imports above form the public API contract.
    let _ = std::any::type_name::<J>();
    let _ = std::any::type_name::<Markers>();
    let _ = std::any::type_name::<Cursor>();
    let _ = std::any::type_name::<Gate>();
    let _ = std::any::type_name::<Precondition>();
    let _ = std::any::type_name::<Pipeline>();
    let _ = std::any::type_name::<RewriteError>();
    let _ = std::any::type_name::<DerivedCache<CompilationUnit, TypesInUse>>();
}

#[test]
fn visitors_are_object_safe() {
    fn accepts(_: &dyn TreeVisitor<ExecutionContext>) {}
    struct Nothing;
    impl TreeVisitor<ExecutionContext> for Nothing {}
    accepts(&Nothing);
}

#[test]
fn environment_variable_names_are_stable() {
    assert_eq!(ENV_MAX_CYCLES, "TUGREWRITE_MAX_CYCLES");
    assert_eq!(ENV_PARALLEL, "TUGREWRITE_PARALLEL");
    assert_eq!(ENV_MARK_PROVENANCE, "TUGREWRITE_MARK_PROVENANCE");
}
