// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definition.

use std::sync::Arc;

use crate::tree::{
    // Base nodes
    Binary, Block, ClassDeclaration, CompilationUnit, Empty, FieldAccess, Identifier, Literal,
    VariableDeclaration,
    // Groovy nodes
    ExpressionStatement, GBinary, GString, GStringValue, ListLiteral, MapEntry, MapLiteral, Range,
    // Capabilities
    Dialect, J,
};

use super::dispatch;
use super::Traversal;

/// Macro to generate visitor trait method signatures.
///
/// Each `base_name: NodeType` pair generates `visit_base_name`, whose default
/// implementation delegates to `dispatch::walk_base_name`.
///
/// # Usage
///
/// ```ignore
/// visitor_methods! {
///     // Generates visit_map_entry, defaulting to walk_map_entry
///     map_entry: MapEntry,
/// }
/// ```
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ident
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = concat!("Returns the replacement. The default visits every child through `walk_", stringify!($base_name), "`.")]
                fn [<visit_ $base_name>](
                    &mut self,
                    node: &Arc<$node_type>,
                    tr: &mut Traversal<'_, P>,
                ) -> J {
                    dispatch::[<walk_ $base_name>](self, node, tr)
                }
            )*
        }
    };
}

/// Rewriting visitor over the LST.
///
/// `P` is the caller's parameter, reachable through
/// [`Traversal::param_mut`]. Every method returns the tree to put in place of
/// the one visited; returning the input unchanged (the same `Arc`) means "no
/// edit".
///
/// # Example
///
/// ```ignore
/// struct CountLiterals;
///
/// impl TreeVisitor<usize> for CountLiterals {
///     fn visit_literal(&mut self, node: &Arc<Literal>, tr: &mut Traversal<'_, usize>) -> J {
///         *tr.param_mut() += 1;
///         J::Literal(node.clone())
///     }
/// }
/// ```
pub trait TreeVisitor<P> {
    /// The dialect this visitor is written against.
    fn dialect(&self) -> Dialect {
        Dialect::Java
    }

    /// Returns true if this visitor can visit `tree`. Checked once per pass,
    /// at the root.
    fn is_acceptable(&self, tree: &J) -> bool {
        match tree.dialect() {
            Some(dialect) => self.dialect().can_visit(dialect),
            None => true,
        }
    }

    /// Called for every node before its kind-specific method.
    #[allow(unused_variables)]
    fn pre_visit(&mut self, tree: J, tr: &mut Traversal<'_, P>) -> J {
        tree
    }

    /// Called for every node after its kind-specific method.
    #[allow(unused_variables)]
    fn post_visit(&mut self, tree: J, tr: &mut Traversal<'_, P>) -> J {
        tree
    }

    // Base nodes
    visitor_methods! {
        compilation_unit: CompilationUnit,
        empty: Empty,
        identifier: Identifier,
        literal: Literal,
        binary: Binary,
        field_access: FieldAccess,
        variable_declaration: VariableDeclaration,
        block: Block,
        class_declaration: ClassDeclaration,
    }

    // Groovy nodes
    visitor_methods! {
        /// Wrapper transparency: the wrapped expression is visited, and the
        /// result is rewrapped only when it is a bare expression.
        expression_statement: ExpressionStatement,
        map_entry: MapEntry,
        map_literal: MapLiteral,
        list_literal: ListLiteral,
        gstring: GString,
        gstring_value: GStringValue,
        gbinary: GBinary,
        range: Range,
    }
}
