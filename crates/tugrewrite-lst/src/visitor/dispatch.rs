// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Traversal driver and default structural walks.
//!
//! [`visit`] is the driver: it negotiates the dialect at the root, applies
//! the gate, maintains the cursor, and dispatches to the visitor's
//! kind-specific method. The `walk_*` functions are the default bodies of
//! those methods; an override calls them to get the default recursion (like
//! calling `super`).
//!
//! Every walk visits the node's children in source order and rebuilds the
//! node through its `with_*` methods, which return the same node when every
//! child came back identical.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::padding::{Container, LeftPadded, RightPadded};
use crate::tree::{
    expect_shape, Binary, Block, ClassDeclaration, CompilationUnit, Empty, ExpressionStatement,
    FieldAccess, GBinary, GString, GStringValue, Identifier, ListLiteral, Literal, MapEntry,
    MapLiteral, Range, Tree, VariableDeclaration, J,
};

use super::{GateDecision, Traversal, TreeVisitor};

/// Visit `tree` and return its replacement.
///
/// Visitors call this on children they want to visit explicitly.
pub fn visit<V, P>(visitor: &mut V, tree: &J, tr: &mut Traversal<'_, P>) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    if tr.cursor.is_root() && !visitor.is_acceptable(tree) {
        debug!(
            visitor = %visitor.dialect(),
            tree = ?tree.dialect(),
            "visitor cannot visit tree dialect, returning tree unchanged"
        );
        return tree.clone();
    }

    let decision = tr.gate_decision(tree);
    if decision == Some(GateDecision::Skip) {
        trace!(id = %tree.id(), kind = %tree.kind(), "gate skips subtree");
        return tree.clone();
    }
    let opened = decision == Some(GateDecision::Open);
    if opened {
        trace!(id = %tree.id(), kind = %tree.kind(), "gate opens subtree");
        tr.open_depth += 1;
    }

    tr.push(tree);
    let mut result = visitor.pre_visit(tree.clone(), tr);
    if !std::mem::take(&mut tr.stop_after_pre_visit) {
        result = accept(visitor, &result, tr);
        result = visitor.post_visit(result, tr);
    }
    tr.pop();

    if opened {
        tr.open_depth -= 1;
    }
    result
}

fn accept<V, P>(visitor: &mut V, tree: &J, tr: &mut Traversal<'_, P>) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    match tree {
        J::CompilationUnit(n) => visitor.visit_compilation_unit(n, tr),
        J::Empty(n) => visitor.visit_empty(n, tr),
        J::Identifier(n) => visitor.visit_identifier(n, tr),
        J::Literal(n) => visitor.visit_literal(n, tr),
        J::Binary(n) => visitor.visit_binary(n, tr),
        J::FieldAccess(n) => visitor.visit_field_access(n, tr),
        J::VariableDeclaration(n) => visitor.visit_variable_declaration(n, tr),
        J::Block(n) => visitor.visit_block(n, tr),
        J::ClassDeclaration(n) => visitor.visit_class_declaration(n, tr),
        J::ExpressionStatement(n) => visitor.visit_expression_statement(n, tr),
        J::MapEntry(n) => visitor.visit_map_entry(n, tr),
        J::MapLiteral(n) => visitor.visit_map_literal(n, tr),
        J::ListLiteral(n) => visitor.visit_list_literal(n, tr),
        J::GString(n) => visitor.visit_gstring(n, tr),
        J::GStringValue(n) => visitor.visit_gstring_value(n, tr),
        J::GBinary(n) => visitor.visit_gbinary(n, tr),
        J::Range(n) => visitor.visit_range(n, tr),
    }
}

// ============================================================================
// Child visits
// ============================================================================

/// A child slot the walks can visit: any tree, or a node of a fixed kind.
pub trait Visit: Clone {
    fn visit_with<V, P>(&self, visitor: &mut V, tr: &mut Traversal<'_, P>) -> Self
    where
        V: TreeVisitor<P> + ?Sized;
}

impl Visit for J {
    fn visit_with<V, P>(&self, visitor: &mut V, tr: &mut Traversal<'_, P>) -> Self
    where
        V: TreeVisitor<P> + ?Sized,
    {
        visit(visitor, self, tr)
    }
}

/// A typed slot must get a node of the same kind back.
///
/// # Panics
///
/// Panics if the visitor replaced the node with a node of another kind.
impl<T: Tree> Visit for Arc<T> {
    fn visit_with<V, P>(&self, visitor: &mut V, tr: &mut Traversal<'_, P>) -> Self
    where
        V: TreeVisitor<P> + ?Sized,
    {
        let visited = visit(visitor, &Arc::clone(self).into_tree(), tr);
        expect_shape(T::try_from_tree(visited))
    }
}

pub fn visit_right_padded<T, V, P>(
    visitor: &mut V,
    padded: &RightPadded<T>,
    tr: &mut Traversal<'_, P>,
) -> RightPadded<T>
where
    T: Visit,
    V: TreeVisitor<P> + ?Sized,
{
    padded.with_element(padded.element().visit_with(visitor, tr))
}

pub fn visit_left_padded<T, V, P>(
    visitor: &mut V,
    padded: &LeftPadded<T>,
    tr: &mut Traversal<'_, P>,
) -> LeftPadded<T>
where
    T: Visit,
    V: TreeVisitor<P> + ?Sized,
{
    padded.with_element(padded.element().visit_with(visitor, tr))
}

pub fn visit_container<T, V, P>(
    visitor: &mut V,
    container: &Container<T>,
    tr: &mut Traversal<'_, P>,
) -> Container<T>
where
    T: Visit,
    V: TreeVisitor<P> + ?Sized,
{
    let elements = container
        .padding()
        .iter()
        .map(|padded| visit_right_padded(visitor, padded, tr))
        .collect();
    container.with_padding(elements)
}

fn visit_statements<V, P>(
    visitor: &mut V,
    statements: &[RightPadded<J>],
    tr: &mut Traversal<'_, P>,
) -> Vec<RightPadded<J>>
where
    V: TreeVisitor<P> + ?Sized,
{
    statements
        .iter()
        .map(|padded| visit_right_padded(visitor, padded, tr))
        .collect()
}

// ============================================================================
// Base node walks
// ============================================================================

/// Walk a [`CompilationUnit`].
///
/// # Panics
///
/// Panics if the visitor put a non-statement in statement position.
pub fn walk_compilation_unit<V, P>(
    visitor: &mut V,
    node: &Arc<CompilationUnit>,
    tr: &mut Traversal<'_, P>,
) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let statements = visit_statements(visitor, node.padding().statements(), tr);
    J::CompilationUnit(node.padding().with_statements(statements))
}

pub fn walk_empty<V, P>(_visitor: &mut V, node: &Arc<Empty>, _tr: &mut Traversal<'_, P>) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    J::Empty(Arc::clone(node))
}

pub fn walk_identifier<V, P>(
    _visitor: &mut V,
    node: &Arc<Identifier>,
    _tr: &mut Traversal<'_, P>,
) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    J::Identifier(Arc::clone(node))
}

pub fn walk_literal<V, P>(_visitor: &mut V, node: &Arc<Literal>, _tr: &mut Traversal<'_, P>) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    J::Literal(Arc::clone(node))
}

pub fn walk_binary<V, P>(visitor: &mut V, node: &Arc<Binary>, tr: &mut Traversal<'_, P>) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let left = visit(visitor, node.left(), tr);
    let right = visit(visitor, node.right(), tr);
    J::Binary(node.with_left(left).with_right(right))
}

pub fn walk_field_access<V, P>(
    visitor: &mut V,
    node: &Arc<FieldAccess>,
    tr: &mut Traversal<'_, P>,
) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let target = visit(visitor, node.target(), tr);
    let name = visit_left_padded(visitor, node.padding().name(), tr);
    let node = node.with_target(target);
    let node = node.padding().with_name(name);
    J::FieldAccess(node)
}

pub fn walk_variable_declaration<V, P>(
    visitor: &mut V,
    node: &Arc<VariableDeclaration>,
    tr: &mut Traversal<'_, P>,
) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let name = node.name().visit_with(visitor, tr);
    let initializer = node
        .padding()
        .initializer()
        .map(|init| visit_left_padded(visitor, init, tr));
    let node = node.with_name(name);
    let node = node.padding().with_initializer(initializer);
    J::VariableDeclaration(node)
}

/// Walk a [`Block`].
///
/// # Panics
///
/// Panics if the visitor put a non-statement in statement position.
pub fn walk_block<V, P>(visitor: &mut V, node: &Arc<Block>, tr: &mut Traversal<'_, P>) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let statements = visit_statements(visitor, node.padding().statements(), tr);
    J::Block(node.padding().with_statements(statements))
}

pub fn walk_class_declaration<V, P>(
    visitor: &mut V,
    node: &Arc<ClassDeclaration>,
    tr: &mut Traversal<'_, P>,
) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let name = node.name().visit_with(visitor, tr);
    let body = node.body().visit_with(visitor, tr);
    J::ClassDeclaration(node.with_name(name).with_body(body))
}

// ============================================================================
// Groovy node walks
// ============================================================================

/// Walk an [`ExpressionStatement`].
///
/// The wrapped expression is visited. A result that is already an
/// expression statement replaces the wrapper; a bare expression is
/// rewrapped (keeping the wrapper's id); any other statement replaces the
/// wrapper outright.
pub fn walk_expression_statement<V, P>(
    visitor: &mut V,
    node: &Arc<ExpressionStatement>,
    tr: &mut Traversal<'_, P>,
) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let visited = visit(visitor, node.expression(), tr);
    match visited {
        J::ExpressionStatement(_) => visited,
        expression if expression.is_expression() => {
            J::ExpressionStatement(node.with_expression(expression))
        }
        statement => statement,
    }
}

pub fn walk_map_entry<V, P>(visitor: &mut V, node: &Arc<MapEntry>, tr: &mut Traversal<'_, P>) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let key = visit_right_padded(visitor, node.padding().key(), tr);
    let value = visit(visitor, node.value(), tr);
    let node = node.padding().with_key(key);
    J::MapEntry(node.with_value(value))
}

pub fn walk_map_literal<V, P>(
    visitor: &mut V,
    node: &Arc<MapLiteral>,
    tr: &mut Traversal<'_, P>,
) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let elements = visit_container(visitor, node.padding().elements(), tr);
    J::MapLiteral(node.padding().with_elements(elements))
}

pub fn walk_list_literal<V, P>(
    visitor: &mut V,
    node: &Arc<ListLiteral>,
    tr: &mut Traversal<'_, P>,
) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let elements = visit_container(visitor, node.padding().elements(), tr);
    J::ListLiteral(node.padding().with_elements(elements))
}

pub fn walk_gstring<V, P>(visitor: &mut V, node: &Arc<GString>, tr: &mut Traversal<'_, P>) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let strings = node
        .strings()
        .iter()
        .map(|part| visit(visitor, part, tr))
        .collect();
    J::GString(node.with_strings(strings))
}

pub fn walk_gstring_value<V, P>(
    visitor: &mut V,
    node: &Arc<GStringValue>,
    tr: &mut Traversal<'_, P>,
) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let tree = visit(visitor, node.tree(), tr);
    J::GStringValue(node.with_tree(tree))
}

pub fn walk_gbinary<V, P>(visitor: &mut V, node: &Arc<GBinary>, tr: &mut Traversal<'_, P>) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let left = visit(visitor, node.left(), tr);
    let right = visit(visitor, node.right(), tr);
    J::GBinary(node.with_left(left).with_right(right))
}

pub fn walk_range<V, P>(visitor: &mut V, node: &Arc<Range>, tr: &mut Traversal<'_, P>) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let from = visit(visitor, node.from(), tr);
    let to = visit(visitor, node.to(), tr);
    J::Range(node.with_from(from).with_to(to))
}
