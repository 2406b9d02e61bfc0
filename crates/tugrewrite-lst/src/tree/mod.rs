// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Lossless semantic tree nodes.
//!
//! Every node kind is a struct held behind an [`Arc`]; the [`J`] sum type
//! gathers them for dispatch. Nodes are never mutated after construction.
//! Each `with_*` method returns a new node sharing every untouched child, or
//! the very same `Arc` when the new value is identical to the old one. Higher
//! layers rely on that short-circuit: no textual change means no new node.
//!
//! Capabilities are orthogonal to the node kind:
//! - [`Tree`]: id, prefix, and markers (every node)
//! - [`TypedTree`]: an optional static type
//! - statement and expression positions, answered by [`J::is_statement`] and
//!   [`J::is_expression`]
//!
//! Padded children are reached through padding views (`node.padding()`),
//! built on demand from the node itself.
//!
//! # Dialects
//!
//! The base node set ([`CompilationUnit`], [`Identifier`], [`Literal`],
//! [`Binary`], ...) is shared by every dialect. Groovy adds
//! [`ExpressionStatement`], [`MapEntry`], [`MapLiteral`], [`ListLiteral`],
//! [`GString`], [`GStringValue`], [`GBinary`], and [`Range`].

use std::fmt;
use std::sync::Arc;

use tugrewrite_core::{Markers, ShapeError, TreeId};

use crate::padding::{Identical, Keyed};
use crate::space::Space;
use crate::types::JavaType;

/// Implements [`Tree`], [`Keyed`], and `From<Arc<_>> for J` for nodes that
/// store their own id, prefix, and markers.
macro_rules! impl_tree {
    ($($node:ident),* $(,)?) => {
        $(
            impl Tree for $node {
                const KIND: JKind = JKind::$node;

                fn id(&self) -> TreeId {
                    self.id
                }

                fn prefix(&self) -> &Space {
                    &self.prefix
                }

                fn markers(&self) -> &Markers {
                    &self.markers
                }

                fn with_id(self: &Arc<Self>, id: TreeId) -> Arc<Self> {
                    if self.id == id {
                        return Arc::clone(self);
                    }
                    rebuild(self, |n| n.id = id)
                }

                fn with_prefix(self: &Arc<Self>, prefix: Space) -> Arc<Self> {
                    if self.prefix == prefix {
                        return Arc::clone(self);
                    }
                    rebuild(self, |n| n.prefix = prefix)
                }

                fn with_markers(self: &Arc<Self>, markers: Markers) -> Arc<Self> {
                    if self.markers.identical(&markers) {
                        return Arc::clone(self);
                    }
                    rebuild(self, |n| n.markers = markers)
                }

                fn into_tree(self: Arc<Self>) -> J {
                    J::$node(self)
                }

                fn cast(tree: &J) -> Option<&Arc<Self>> {
                    match tree {
                        J::$node(n) => Some(n),
                        _ => None,
                    }
                }
            }

            tree_conversions!($node);
        )*
    };
}

macro_rules! tree_conversions {
    ($($node:ident),* $(,)?) => {
        $(
            impl Keyed for Arc<$node> {
                fn key(&self) -> TreeId {
                    Tree::id(&**self)
                }
            }

            impl From<Arc<$node>> for J {
                fn from(node: Arc<$node>) -> J {
                    J::$node(node)
                }
            }
        )*
    };
}

/// Implements [`TypedTree`] for nodes with a stored `java_type` field.
macro_rules! impl_typed {
    ($($node:ident),* $(,)?) => {
        $(
            impl TypedTree for $node {
                fn java_type(&self) -> Option<&JavaType> {
                    self.java_type.as_ref()
                }

                fn with_java_type(self: &Arc<Self>, java_type: Option<JavaType>) -> Arc<Self> {
                    if self.java_type == java_type {
                        return Arc::clone(self);
                    }
                    rebuild(self, |n| n.java_type = java_type)
                }
            }
        )*
    };
}

mod groovy;
mod java;

pub use groovy::{
    ExpressionStatement, GBinary, GBinaryOperator, GBinaryPadding, GString, GStringValue,
    ListLiteral, ListLiteralPadding, MapEntry, MapEntryPadding, MapLiteral, MapLiteralPadding,
    Range, RangePadding, TrailingComma,
};
pub use java::{
    Binary, BinaryOperator, BinaryPadding, Block, BlockPadding, ClassDeclaration,
    CompilationUnit, CompilationUnitBuilder, CompilationUnitPadding, Empty, FieldAccess,
    FieldAccessPadding, Identifier, Literal, LiteralValue, VariableDeclaration,
    VariableDeclarationPadding,
};

/// The language family a tree or visitor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// The base statement/expression language every dialect extends.
    Java,
    /// Groovy extensions.
    Groovy,
}

impl Dialect {
    /// Returns true if a visitor written for `self` can visit trees of
    /// `tree` dialect. Base visitors adapt to every dialect; dialect visitors
    /// only to their own.
    pub fn can_visit(self, tree: Dialect) -> bool {
        matches!(
            (self, tree),
            (Dialect::Java, _) | (Dialect::Groovy, Dialect::Groovy)
        )
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Java => f.write_str("java"),
            Dialect::Groovy => f.write_str("groovy"),
        }
    }
}

/// Node kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JKind {
    CompilationUnit,
    Empty,
    Identifier,
    Literal,
    Binary,
    FieldAccess,
    VariableDeclaration,
    Block,
    ClassDeclaration,
    ExpressionStatement,
    MapEntry,
    MapLiteral,
    ListLiteral,
    GString,
    GStringValue,
    GBinary,
    Range,
}

impl JKind {
    pub fn name(&self) -> &'static str {
        match self {
            JKind::CompilationUnit => "CompilationUnit",
            JKind::Empty => "Empty",
            JKind::Identifier => "Identifier",
            JKind::Literal => "Literal",
            JKind::Binary => "Binary",
            JKind::FieldAccess => "FieldAccess",
            JKind::VariableDeclaration => "VariableDeclaration",
            JKind::Block => "Block",
            JKind::ClassDeclaration => "ClassDeclaration",
            JKind::ExpressionStatement => "ExpressionStatement",
            JKind::MapEntry => "MapEntry",
            JKind::MapLiteral => "MapLiteral",
            JKind::ListLiteral => "ListLiteral",
            JKind::GString => "GString",
            JKind::GStringValue => "GStringValue",
            JKind::GBinary => "GBinary",
            JKind::Range => "Range",
        }
    }
}

impl fmt::Display for JKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common surface of every node struct.
pub trait Tree: fmt::Debug + Clone + Send + Sync + 'static {
    const KIND: JKind;

    fn id(&self) -> TreeId;

    /// Whitespace and comments before the node's first token.
    fn prefix(&self) -> &Space;

    fn markers(&self) -> &Markers;

    fn with_id(self: &Arc<Self>, id: TreeId) -> Arc<Self>;

    fn with_prefix(self: &Arc<Self>, prefix: Space) -> Arc<Self>;

    fn with_markers(self: &Arc<Self>, markers: Markers) -> Arc<Self>;

    fn into_tree(self: Arc<Self>) -> J;

    /// Borrow the node out of `tree` if it is of this kind.
    fn cast(tree: &J) -> Option<&Arc<Self>>;

    /// Take the node out of `tree`, or report the kind mismatch.
    fn try_from_tree(tree: J) -> Result<Arc<Self>, ShapeError> {
        match Self::cast(&tree) {
            Some(node) => Ok(Arc::clone(node)),
            None => Err(ShapeError::UnexpectedNode {
                expected: Self::KIND.name(),
                found: tree.kind().name(),
            }),
        }
    }
}

/// Nodes that carry a static type.
pub trait TypedTree: Tree {
    fn java_type(&self) -> Option<&JavaType>;

    fn with_java_type(self: &Arc<Self>, java_type: Option<JavaType>) -> Arc<Self>;
}

/// Clone `node`, apply `edit`, and wrap the result in a new `Arc`.
pub(crate) fn rebuild<N: Clone>(node: &Arc<N>, edit: impl FnOnce(&mut N)) -> Arc<N> {
    let mut next = N::clone(node);
    edit(&mut next);
    Arc::new(next)
}

/// Unwrap a shape check on an infallible edit path.
///
/// # Panics
///
/// Panics with the shape error's message.
pub(crate) fn expect_shape<T>(result: Result<T, ShapeError>) -> T {
    result.unwrap_or_else(|err| panic!("{err}"))
}

/// Any tree node.
#[derive(Debug, Clone)]
pub enum J {
    CompilationUnit(Arc<CompilationUnit>),
    Empty(Arc<Empty>),
    Identifier(Arc<Identifier>),
    Literal(Arc<Literal>),
    Binary(Arc<Binary>),
    FieldAccess(Arc<FieldAccess>),
    VariableDeclaration(Arc<VariableDeclaration>),
    Block(Arc<Block>),
    ClassDeclaration(Arc<ClassDeclaration>),
    ExpressionStatement(Arc<ExpressionStatement>),
    MapEntry(Arc<MapEntry>),
    MapLiteral(Arc<MapLiteral>),
    ListLiteral(Arc<ListLiteral>),
    GString(Arc<GString>),
    GStringValue(Arc<GStringValue>),
    GBinary(Arc<GBinary>),
    Range(Arc<Range>),
}

/// Evaluate `$body` with `$node` bound to the inner `Arc` of any variant.
macro_rules! delegate {
    ($tree:expr, $node:ident => $body:expr) => {
        match $tree {
            J::CompilationUnit($node) => $body,
            J::Empty($node) => $body,
            J::Identifier($node) => $body,
            J::Literal($node) => $body,
            J::Binary($node) => $body,
            J::FieldAccess($node) => $body,
            J::VariableDeclaration($node) => $body,
            J::Block($node) => $body,
            J::ClassDeclaration($node) => $body,
            J::ExpressionStatement($node) => $body,
            J::MapEntry($node) => $body,
            J::MapLiteral($node) => $body,
            J::ListLiteral($node) => $body,
            J::GString($node) => $body,
            J::GStringValue($node) => $body,
            J::GBinary($node) => $body,
            J::Range($node) => $body,
        }
    };
}

/// Like `delegate!`, rewrapping the resulting `Arc` in the same variant.
macro_rules! delegate_rebuild {
    ($tree:expr, $node:ident => $body:expr) => {
        match $tree {
            J::CompilationUnit($node) => J::CompilationUnit($body),
            J::Empty($node) => J::Empty($body),
            J::Identifier($node) => J::Identifier($body),
            J::Literal($node) => J::Literal($body),
            J::Binary($node) => J::Binary($body),
            J::FieldAccess($node) => J::FieldAccess($body),
            J::VariableDeclaration($node) => J::VariableDeclaration($body),
            J::Block($node) => J::Block($body),
            J::ClassDeclaration($node) => J::ClassDeclaration($body),
            J::ExpressionStatement($node) => J::ExpressionStatement($body),
            J::MapEntry($node) => J::MapEntry($body),
            J::MapLiteral($node) => J::MapLiteral($body),
            J::ListLiteral($node) => J::ListLiteral($body),
            J::GString($node) => J::GString($body),
            J::GStringValue($node) => J::GStringValue($body),
            J::GBinary($node) => J::GBinary($body),
            J::Range($node) => J::Range($body),
        }
    };
}

fn kind_of<T: Tree>(_: &Arc<T>) -> JKind {
    T::KIND
}

impl J {
    pub fn id(&self) -> TreeId {
        delegate!(self, n => n.id())
    }

    pub fn kind(&self) -> JKind {
        delegate!(self, n => kind_of(n))
    }

    pub fn prefix(&self) -> &Space {
        delegate!(self, n => n.prefix())
    }

    pub fn markers(&self) -> &Markers {
        delegate!(self, n => n.markers())
    }

    pub fn with_id(&self, id: TreeId) -> J {
        delegate_rebuild!(self, n => n.with_id(id))
    }

    pub fn with_prefix(&self, prefix: Space) -> J {
        delegate_rebuild!(self, n => n.with_prefix(prefix))
    }

    pub fn with_markers(&self, markers: Markers) -> J {
        delegate_rebuild!(self, n => n.with_markers(markers))
    }

    /// Borrow the node as a concrete kind.
    pub fn downcast<T: Tree>(&self) -> Option<&Arc<T>> {
        T::cast(self)
    }

    /// The dialect a node belongs to. Base nodes other than the compilation
    /// unit are dialect-neutral.
    pub fn dialect(&self) -> Option<Dialect> {
        match self {
            J::CompilationUnit(cu) => Some(cu.dialect()),
            J::ExpressionStatement(_)
            | J::MapEntry(_)
            | J::MapLiteral(_)
            | J::ListLiteral(_)
            | J::GString(_)
            | J::GStringValue(_)
            | J::GBinary(_)
            | J::Range(_) => Some(Dialect::Groovy),
            _ => None,
        }
    }

    /// Returns true for nodes usable in expression position.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            J::Empty(_)
                | J::Identifier(_)
                | J::Literal(_)
                | J::Binary(_)
                | J::FieldAccess(_)
                | J::ExpressionStatement(_)
                | J::MapEntry(_)
                | J::MapLiteral(_)
                | J::ListLiteral(_)
                | J::GString(_)
                | J::GBinary(_)
                | J::Range(_)
        )
    }

    /// Returns true for nodes usable in statement position.
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            J::Empty(_)
                | J::VariableDeclaration(_)
                | J::Block(_)
                | J::ClassDeclaration(_)
                | J::ExpressionStatement(_)
                | J::GString(_)
        )
    }

    /// Returns true for nodes with the [`TypedTree`] capability.
    pub fn is_typed(&self) -> bool {
        !matches!(
            self,
            J::CompilationUnit(_) | J::Empty(_) | J::Block(_) | J::GStringValue(_)
        )
    }

    pub fn java_type(&self) -> Option<&JavaType> {
        match self {
            J::Identifier(n) => n.java_type(),
            J::Literal(n) => n.java_type(),
            J::Binary(n) => n.java_type(),
            J::FieldAccess(n) => n.java_type(),
            J::VariableDeclaration(n) => n.java_type(),
            J::ClassDeclaration(n) => n.java_type(),
            J::ExpressionStatement(n) => n.java_type(),
            J::MapEntry(n) => n.java_type(),
            J::MapLiteral(n) => n.java_type(),
            J::ListLiteral(n) => n.java_type(),
            J::GString(n) => n.java_type(),
            J::GBinary(n) => n.java_type(),
            J::Range(n) => n.java_type(),
            J::CompilationUnit(_) | J::Empty(_) | J::Block(_) | J::GStringValue(_) => None,
        }
    }

    /// Set the static type. Untyped nodes are returned unchanged.
    pub fn with_java_type(&self, java_type: Option<JavaType>) -> J {
        match self {
            J::Identifier(n) => J::Identifier(n.with_java_type(java_type)),
            J::Literal(n) => J::Literal(n.with_java_type(java_type)),
            J::Binary(n) => J::Binary(n.with_java_type(java_type)),
            J::FieldAccess(n) => J::FieldAccess(n.with_java_type(java_type)),
            J::VariableDeclaration(n) => J::VariableDeclaration(n.with_java_type(java_type)),
            J::ClassDeclaration(n) => J::ClassDeclaration(n.with_java_type(java_type)),
            J::ExpressionStatement(n) => J::ExpressionStatement(n.with_java_type(java_type)),
            J::MapEntry(n) => J::MapEntry(n.with_java_type(java_type)),
            J::MapLiteral(n) => J::MapLiteral(n.with_java_type(java_type)),
            J::ListLiteral(n) => J::ListLiteral(n.with_java_type(java_type)),
            J::GString(n) => J::GString(n.with_java_type(java_type)),
            J::GBinary(n) => J::GBinary(n.with_java_type(java_type)),
            J::Range(n) => J::Range(n.with_java_type(java_type)),
            J::CompilationUnit(_) | J::Empty(_) | J::Block(_) | J::GStringValue(_) => self.clone(),
        }
    }
}

impl Identical for J {
    fn identical(&self, other: &Self) -> bool {
        match (self, other) {
            (J::CompilationUnit(a), J::CompilationUnit(b)) => Arc::ptr_eq(a, b),
            (J::Empty(a), J::Empty(b)) => Arc::ptr_eq(a, b),
            (J::Identifier(a), J::Identifier(b)) => Arc::ptr_eq(a, b),
            (J::Literal(a), J::Literal(b)) => Arc::ptr_eq(a, b),
            (J::Binary(a), J::Binary(b)) => Arc::ptr_eq(a, b),
            (J::FieldAccess(a), J::FieldAccess(b)) => Arc::ptr_eq(a, b),
            (J::VariableDeclaration(a), J::VariableDeclaration(b)) => Arc::ptr_eq(a, b),
            (J::Block(a), J::Block(b)) => Arc::ptr_eq(a, b),
            (J::ClassDeclaration(a), J::ClassDeclaration(b)) => Arc::ptr_eq(a, b),
            (J::ExpressionStatement(a), J::ExpressionStatement(b)) => Arc::ptr_eq(a, b),
            (J::MapEntry(a), J::MapEntry(b)) => Arc::ptr_eq(a, b),
            (J::MapLiteral(a), J::MapLiteral(b)) => Arc::ptr_eq(a, b),
            (J::ListLiteral(a), J::ListLiteral(b)) => Arc::ptr_eq(a, b),
            (J::GString(a), J::GString(b)) => Arc::ptr_eq(a, b),
            (J::GStringValue(a), J::GStringValue(b)) => Arc::ptr_eq(a, b),
            (J::GBinary(a), J::GBinary(b)) => Arc::ptr_eq(a, b),
            (J::Range(a), J::Range(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Keyed for J {
    fn key(&self) -> TreeId {
        self.id()
    }
}
