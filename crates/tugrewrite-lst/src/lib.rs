// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Lossless semantic tree for tugrewrite.
//!
//! This crate provides:
//! - The padding model: [`Space`], [`RightPadded`], [`LeftPadded`], [`Container`]
//! - Immutable Java and Groovy nodes behind the [`J`] sum type
//! - The [`Cursor`] over a traversal path
//! - Visitor dispatch with dialect negotiation and node-level [`Gate`]s
//! - A reference Groovy parser and a printer that round-trip source text
//! - Search helpers and the types-in-use derived view

pub mod cursor;
pub mod padding;
pub mod parser;
pub mod printer;
pub mod search;
pub mod space;
pub mod tree;
pub mod types;
pub mod types_in_use;
pub mod visitor;

pub use cursor::Cursor;
pub use padding::{all_identical, Container, Identical, Keyed, LeftPadded, RightPadded};
pub use parser::{parse_file, parse_groovy};
pub use printer::{print_marked, print_tree, Codegen, CodegenState};
pub use search::{
    find_all, find_matching, found, is_found, marked, strip_search_results, SearchResults,
};
pub use space::{Comment, CommentStyle, Space};
pub use tree::*;
pub use types::{JavaType, Primitive};
pub use types_in_use::TypesInUse;
pub use visitor::{run, run_gated, Gate, GateDecision, Traversal, TreeVisitor, Visit};
