// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Groovy dialect nodes.

use std::any::Any;
use std::sync::Arc;

use tugrewrite_core::{Marker, Markers, ShapeError, TreeId};

use super::{expect_shape, rebuild, JKind, Tree, TypedTree, J};
use crate::padding::{Container, Identical, Keyed, LeftPadded, RightPadded};
use crate::space::Space;
use crate::types::JavaType;

static EMPTY_SPACE: Space = Space::EMPTY;

fn check_expression(tree: &J) -> Result<(), ShapeError> {
    if tree.is_expression() {
        Ok(())
    } else {
        Err(ShapeError::UnexpectedNode {
            expected: "expression",
            found: tree.kind().name(),
        })
    }
}

// ============================================================================
// ExpressionStatement
// ============================================================================

/// An expression in statement position.
///
/// The wrapper is transparent: prefix, markers, and type all belong to the
/// wrapped expression, and edits to them are applied there.
#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    id: TreeId,
    expression: J,
}

tree_conversions!(ExpressionStatement);

impl ExpressionStatement {
    /// Wrap `expression`.
    ///
    /// # Panics
    ///
    /// Panics if `expression` cannot appear in expression position.
    pub fn new(expression: J) -> Arc<Self> {
        expect_shape(ExpressionStatement::try_new(expression))
    }

    pub fn try_new(expression: J) -> Result<Arc<Self>, ShapeError> {
        check_expression(&expression)?;
        Ok(Arc::new(ExpressionStatement {
            id: TreeId::random(),
            expression,
        }))
    }

    pub fn expression(&self) -> &J {
        &self.expression
    }

    /// # Panics
    ///
    /// Panics if `expression` cannot appear in expression position.
    pub fn with_expression(self: &Arc<Self>, expression: J) -> Arc<Self> {
        if self.expression.identical(&expression) {
            return Arc::clone(self);
        }
        expect_shape(check_expression(&expression));
        rebuild(self, |n| n.expression = expression)
    }
}

impl Tree for ExpressionStatement {
    const KIND: JKind = JKind::ExpressionStatement;

    fn id(&self) -> TreeId {
        self.id
    }

    fn prefix(&self) -> &Space {
        self.expression.prefix()
    }

    fn markers(&self) -> &Markers {
        self.expression.markers()
    }

    fn with_id(self: &Arc<Self>, id: TreeId) -> Arc<Self> {
        if self.id == id {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.id = id)
    }

    fn with_prefix(self: &Arc<Self>, prefix: Space) -> Arc<Self> {
        self.with_expression(self.expression.with_prefix(prefix))
    }

    fn with_markers(self: &Arc<Self>, markers: Markers) -> Arc<Self> {
        self.with_expression(self.expression.with_markers(markers))
    }

    fn into_tree(self: Arc<Self>) -> J {
        J::ExpressionStatement(self)
    }

    fn cast(tree: &J) -> Option<&Arc<Self>> {
        match tree {
            J::ExpressionStatement(n) => Some(n),
            _ => None,
        }
    }
}

impl TypedTree for ExpressionStatement {
    fn java_type(&self) -> Option<&JavaType> {
        self.expression.java_type()
    }

    fn with_java_type(self: &Arc<Self>, java_type: Option<JavaType>) -> Arc<Self> {
        self.with_expression(self.expression.with_java_type(java_type))
    }
}

// ============================================================================
// Maps
// ============================================================================

/// `key: value`. The key's right padding holds the space before the colon.
#[derive(Debug, Clone)]
pub struct MapEntry {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    key: RightPadded<J>,
    value: J,
    java_type: Option<JavaType>,
}

impl_tree!(MapEntry);
impl_typed!(MapEntry);

impl MapEntry {
    pub fn build(
        prefix: Space,
        key: RightPadded<J>,
        value: J,
        java_type: Option<JavaType>,
    ) -> Arc<Self> {
        Arc::new(MapEntry {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            key,
            value,
            java_type,
        })
    }

    pub fn key(&self) -> &J {
        self.key.element()
    }

    pub fn value(&self) -> &J {
        &self.value
    }

    pub fn with_key(self: &Arc<Self>, key: J) -> Arc<Self> {
        self.padding().with_key(self.key.with_element(key))
    }

    pub fn with_value(self: &Arc<Self>, value: J) -> Arc<Self> {
        if self.value.identical(&value) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.value = value)
    }

    pub fn padding(self: &Arc<Self>) -> MapEntryPadding<'_> {
        MapEntryPadding { t: self }
    }
}

pub struct MapEntryPadding<'a> {
    t: &'a Arc<MapEntry>,
}

impl MapEntryPadding<'_> {
    pub fn key(&self) -> &RightPadded<J> {
        &self.t.key
    }

    pub fn with_key(&self, key: RightPadded<J>) -> Arc<MapEntry> {
        if self.t.key.identical(&key) {
            return Arc::clone(self.t);
        }
        rebuild(self.t, |n| n.key = key)
    }
}

/// `[k: v, ...]`, or `[:]` when empty.
#[derive(Debug, Clone)]
pub struct MapLiteral {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    elements: Container<Arc<MapEntry>>,
    java_type: Option<JavaType>,
}

impl_tree!(MapLiteral);
impl_typed!(MapLiteral);

impl MapLiteral {
    pub fn build(
        prefix: Space,
        elements: Container<Arc<MapEntry>>,
        java_type: Option<JavaType>,
    ) -> Arc<Self> {
        Arc::new(MapLiteral {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            elements,
            java_type,
        })
    }

    pub fn elements(&self) -> Vec<Arc<MapEntry>> {
        self.elements.elements()
    }

    pub fn with_elements(self: &Arc<Self>, elements: Vec<Arc<MapEntry>>) -> Arc<Self> {
        self.padding()
            .with_elements(self.elements.with_elements(elements))
    }

    pub fn padding(self: &Arc<Self>) -> MapLiteralPadding<'_> {
        MapLiteralPadding { t: self }
    }
}

pub struct MapLiteralPadding<'a> {
    t: &'a Arc<MapLiteral>,
}

impl MapLiteralPadding<'_> {
    pub fn elements(&self) -> &Container<Arc<MapEntry>> {
        &self.t.elements
    }

    pub fn with_elements(&self, elements: Container<Arc<MapEntry>>) -> Arc<MapLiteral> {
        if self.t.elements.identical(&elements) {
            return Arc::clone(self.t);
        }
        rebuild(self.t, |n| n.elements = elements)
    }
}

// ============================================================================
// ListLiteral
// ============================================================================

/// `[a, b, c]`. An empty list holds a single [`Empty`](super::Empty) element
/// whose prefix is the space between the brackets.
#[derive(Debug, Clone)]
pub struct ListLiteral {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    elements: Container<J>,
    java_type: Option<JavaType>,
}

impl_tree!(ListLiteral);
impl_typed!(ListLiteral);

impl ListLiteral {
    pub fn build(prefix: Space, elements: Container<J>, java_type: Option<JavaType>) -> Arc<Self> {
        Arc::new(ListLiteral {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            elements,
            java_type,
        })
    }

    pub fn elements(&self) -> Vec<J> {
        self.elements.elements()
    }

    pub fn with_elements(self: &Arc<Self>, elements: Vec<J>) -> Arc<Self> {
        self.padding()
            .with_elements(self.elements.with_elements(elements))
    }

    pub fn padding(self: &Arc<Self>) -> ListLiteralPadding<'_> {
        ListLiteralPadding { t: self }
    }
}

pub struct ListLiteralPadding<'a> {
    t: &'a Arc<ListLiteral>,
}

impl ListLiteralPadding<'_> {
    pub fn elements(&self) -> &Container<J> {
        &self.t.elements
    }

    pub fn with_elements(&self, elements: Container<J>) -> Arc<ListLiteral> {
        if self.t.elements.identical(&elements) {
            return Arc::clone(self.t);
        }
        rebuild(self.t, |n| n.elements = elements)
    }
}

// ============================================================================
// GString
// ============================================================================

/// An interpolated string. `strings` alternates literal fragments and
/// [`GStringValue`] interpolations in source order.
#[derive(Debug, Clone)]
pub struct GString {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    delimiter: String,
    strings: Vec<J>,
    java_type: Option<JavaType>,
}

impl_tree!(GString);
impl_typed!(GString);

impl GString {
    pub fn build(
        prefix: Space,
        delimiter: impl Into<String>,
        strings: Vec<J>,
        java_type: Option<JavaType>,
    ) -> Arc<Self> {
        Arc::new(GString {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            delimiter: delimiter.into(),
            strings,
            java_type,
        })
    }

    /// The quote that opens and closes the string.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn strings(&self) -> &[J] {
        &self.strings
    }

    pub fn with_delimiter(self: &Arc<Self>, delimiter: impl Into<String>) -> Arc<Self> {
        let delimiter = delimiter.into();
        if self.delimiter == delimiter {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.delimiter = delimiter)
    }

    pub fn with_strings(self: &Arc<Self>, strings: Vec<J>) -> Arc<Self> {
        if crate::padding::all_identical(&self.strings, &strings) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.strings = strings)
    }
}

/// One interpolation inside a [`GString`]: `${tree}` or `$tree`.
///
/// A value has no prefix of its own; its text starts at `$`.
#[derive(Debug, Clone)]
pub struct GStringValue {
    id: TreeId,
    markers: Markers,
    tree: J,
    after: Space,
    enclosed_in_braces: bool,
}

tree_conversions!(GStringValue);

impl GStringValue {
    pub fn build(tree: J, after: Space, enclosed_in_braces: bool) -> Arc<Self> {
        Arc::new(GStringValue {
            id: TreeId::random(),
            markers: Markers::EMPTY,
            tree,
            after,
            enclosed_in_braces,
        })
    }

    pub fn tree(&self) -> &J {
        &self.tree
    }

    /// Space before the closing brace.
    pub fn after(&self) -> &Space {
        &self.after
    }

    pub fn is_enclosed_in_braces(&self) -> bool {
        self.enclosed_in_braces
    }

    pub fn with_tree(self: &Arc<Self>, tree: J) -> Arc<Self> {
        if self.tree.identical(&tree) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.tree = tree)
    }

    pub fn with_after(self: &Arc<Self>, after: Space) -> Arc<Self> {
        if self.after == after {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.after = after)
    }

    pub fn with_enclosed_in_braces(self: &Arc<Self>, enclosed: bool) -> Arc<Self> {
        if self.enclosed_in_braces == enclosed {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.enclosed_in_braces = enclosed)
    }
}

impl Tree for GStringValue {
    const KIND: JKind = JKind::GStringValue;

    fn id(&self) -> TreeId {
        self.id
    }

    fn prefix(&self) -> &Space {
        &EMPTY_SPACE
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

    /// Values have no prefix; the node is returned unchanged.
    fn with_prefix(self: &Arc<Self>, _prefix: Space) -> Arc<Self> {
        Arc::clone(self)
    }

    fn with_markers(self: &Arc<Self>, markers: Markers) -> Arc<Self> {
        if self.markers.identical(&markers) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.markers = markers)
    }

    fn into_tree(self: Arc<Self>) -> J {
        J::GStringValue(self)
    }

    fn cast(tree: &J) -> Option<&Arc<Self>> {
        match tree {
            J::GStringValue(n) => Some(n),
            _ => None,
        }
    }
}

// ============================================================================
// GBinary
// ============================================================================

/// Groovy-only binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GBinaryOperator {
    /// `=~`
    Find,
    /// `==~`
    Match,
    /// `in`
    In,
    /// `left[right]`
    Access,
}

impl GBinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            GBinaryOperator::Find => "=~",
            GBinaryOperator::Match => "==~",
            GBinaryOperator::In => "in",
            GBinaryOperator::Access => "[",
        }
    }
}

impl Identical for GBinaryOperator {
    fn identical(&self, other: &Self) -> bool {
        self == other
    }
}

/// A Groovy binary. For [`GBinaryOperator::Access`], `after` is the space
/// before the closing bracket; it is empty otherwise.
#[derive(Debug, Clone)]
pub struct GBinary {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    left: J,
    operator: LeftPadded<GBinaryOperator>,
    right: J,
    after: Space,
    java_type: Option<JavaType>,
}

impl_tree!(GBinary);
impl_typed!(GBinary);

impl GBinary {
    pub fn build(
        prefix: Space,
        left: J,
        operator: LeftPadded<GBinaryOperator>,
        right: J,
        after: Space,
        java_type: Option<JavaType>,
    ) -> Arc<Self> {
        Arc::new(GBinary {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            left,
            operator,
            right,
            after,
            java_type,
        })
    }

    pub fn left(&self) -> &J {
        &self.left
    }

    pub fn operator(&self) -> GBinaryOperator {
        *self.operator.element()
    }

    pub fn right(&self) -> &J {
        &self.right
    }

    pub fn after(&self) -> &Space {
        &self.after
    }

    pub fn with_left(self: &Arc<Self>, left: J) -> Arc<Self> {
        if self.left.identical(&left) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.left = left)
    }

    pub fn with_operator(self: &Arc<Self>, operator: GBinaryOperator) -> Arc<Self> {
        self.padding()
            .with_operator(self.operator.with_element(operator))
    }

    pub fn with_right(self: &Arc<Self>, right: J) -> Arc<Self> {
        if self.right.identical(&right) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.right = right)
    }

    pub fn with_after(self: &Arc<Self>, after: Space) -> Arc<Self> {
        if self.after == after {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.after = after)
    }

    pub fn padding(self: &Arc<Self>) -> GBinaryPadding<'_> {
        GBinaryPadding { t: self }
    }
}

pub struct GBinaryPadding<'a> {
    t: &'a Arc<GBinary>,
}

impl GBinaryPadding<'_> {
    pub fn operator(&self) -> &LeftPadded<GBinaryOperator> {
        &self.t.operator
    }

    pub fn with_operator(&self, operator: LeftPadded<GBinaryOperator>) -> Arc<GBinary> {
        if self.t.operator.identical(&operator) {
            return Arc::clone(self.t);
        }
        rebuild(self.t, |n| n.operator = operator)
    }
}

// ============================================================================
// Range
// ============================================================================

/// `from..to` (inclusive) or `from..<to` (exclusive).
///
/// A range has no type of its own: it reports the type of `from`, and
/// setting a type sets it on both bounds.
#[derive(Debug, Clone)]
pub struct Range {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    from: J,
    inclusive: LeftPadded<bool>,
    to: J,
}

impl_tree!(Range);

impl Range {
    pub fn build(prefix: Space, from: J, inclusive: LeftPadded<bool>, to: J) -> Arc<Self> {
        Arc::new(Range {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            from,
            inclusive,
            to,
        })
    }

    pub fn from(&self) -> &J {
        &self.from
    }

    pub fn is_inclusive(&self) -> bool {
        *self.inclusive.element()
    }

    pub fn to(&self) -> &J {
        &self.to
    }

    pub fn with_from(self: &Arc<Self>, from: J) -> Arc<Self> {
        if self.from.identical(&from) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.from = from)
    }

    pub fn with_inclusive(self: &Arc<Self>, inclusive: bool) -> Arc<Self> {
        self.padding()
            .with_inclusive(self.inclusive.with_element(inclusive))
    }

    pub fn with_to(self: &Arc<Self>, to: J) -> Arc<Self> {
        if self.to.identical(&to) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.to = to)
    }

    pub fn padding(self: &Arc<Self>) -> RangePadding<'_> {
        RangePadding { t: self }
    }
}

impl TypedTree for Range {
    fn java_type(&self) -> Option<&JavaType> {
        self.from.java_type()
    }

    fn with_java_type(self: &Arc<Self>, java_type: Option<JavaType>) -> Arc<Self> {
        let from = self.from.with_java_type(java_type.clone());
        let to = self.to.with_java_type(java_type);
        self.with_from(from).with_to(to)
    }
}

pub struct RangePadding<'a> {
    t: &'a Arc<Range>,
}

impl RangePadding<'_> {
    pub fn inclusive(&self) -> &LeftPadded<bool> {
        &self.t.inclusive
    }

    pub fn with_inclusive(&self, inclusive: LeftPadded<bool>) -> Arc<Range> {
        if self.t.inclusive.identical(&inclusive) {
            return Arc::clone(self.t);
        }
        rebuild(self.t, |n| n.inclusive = inclusive)
    }
}

// ============================================================================
// Markers
// ============================================================================

/// A trailing comma after the last element of a list or map literal.
///
/// Attached to the last element's right padding; `suffix` is the space
/// between the comma and the closing bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingComma {
    id: TreeId,
    suffix: Space,
}

impl TrailingComma {
    pub fn new(suffix: Space) -> Self {
        TrailingComma {
            id: TreeId::random(),
            suffix,
        }
    }

    pub fn suffix(&self) -> &Space {
        &self.suffix
    }
}

impl Marker for TrailingComma {
    fn id(&self) -> TreeId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
