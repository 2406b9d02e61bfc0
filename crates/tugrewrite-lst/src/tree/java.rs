// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Base node set shared by every dialect.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tugrewrite_core::{
    Checksum, DerivedCache, FileAttributes, Markers, ShapeError, SourceMetadata, TreeId,
};

use super::{expect_shape, rebuild, Dialect, JKind, Tree, TypedTree, J};
use crate::padding::{all_identical, Identical, Keyed, LeftPadded, RightPadded};
use crate::space::Space;
use crate::types::{JavaType, Primitive};
use crate::types_in_use::TypesInUse;

fn check_statements(statements: &[RightPadded<J>]) -> Result<(), ShapeError> {
    match statements.iter().find(|p| !p.element().is_statement()) {
        Some(p) => Err(ShapeError::UnexpectedNode {
            expected: "statement",
            found: p.element().kind().name(),
        }),
        None => Ok(()),
    }
}

// ============================================================================
// CompilationUnit
// ============================================================================

/// Root of a parsed source file.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    dialect: Dialect,
    source: SourceMetadata,
    shebang: Option<String>,
    statements: Vec<RightPadded<J>>,
    eof: Space,
    types_in_use: DerivedCache<CompilationUnit, TypesInUse>,
}

impl_tree!(CompilationUnit);

impl CompilationUnit {
    pub fn builder(dialect: Dialect, source: SourceMetadata) -> CompilationUnitBuilder {
        CompilationUnitBuilder {
            id: None,
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            dialect,
            source,
            shebang: None,
            statements: Vec::new(),
            eof: Space::EMPTY,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn source(&self) -> &SourceMetadata {
        &self.source
    }

    pub fn source_path(&self) -> &Path {
        self.source.path()
    }

    pub fn charset(&self) -> &str {
        &self.source.charset
    }

    pub fn is_charset_bom_marked(&self) -> bool {
        self.source.charset_bom_marked
    }

    pub fn checksum(&self) -> Option<&Checksum> {
        self.source.checksum.as_ref()
    }

    pub fn file_attributes(&self) -> Option<&FileAttributes> {
        self.source.file_attributes.as_ref()
    }

    /// `#!` line, without the trailing newline (which lives in the first
    /// statement's prefix).
    pub fn shebang(&self) -> Option<&str> {
        self.shebang.as_deref()
    }

    /// Whitespace and comments after the last statement.
    pub fn eof(&self) -> &Space {
        &self.eof
    }

    pub fn statements(&self) -> Vec<J> {
        RightPadded::elements(&self.statements)
    }

    pub fn with_source(self: &Arc<Self>, source: SourceMetadata) -> Arc<Self> {
        if self.source == source {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.source = source)
    }

    pub fn with_source_path(self: &Arc<Self>, path: impl Into<PathBuf>) -> Arc<Self> {
        self.with_source(SourceMetadata {
            path: path.into(),
            ..self.source.clone()
        })
    }

    pub fn with_charset_bom_marked(self: &Arc<Self>, marked: bool) -> Arc<Self> {
        self.with_source(SourceMetadata {
            charset_bom_marked: marked,
            ..self.source.clone()
        })
    }

    pub fn with_checksum(self: &Arc<Self>, checksum: Option<Checksum>) -> Arc<Self> {
        self.with_source(SourceMetadata {
            checksum,
            ..self.source.clone()
        })
    }

    pub fn with_file_attributes(
        self: &Arc<Self>,
        file_attributes: Option<FileAttributes>,
    ) -> Arc<Self> {
        self.with_source(SourceMetadata {
            file_attributes,
            ..self.source.clone()
        })
    }

    pub fn with_shebang(self: &Arc<Self>, shebang: Option<String>) -> Arc<Self> {
        if self.shebang == shebang {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.shebang = shebang)
    }

    pub fn with_eof(self: &Arc<Self>, eof: Space) -> Arc<Self> {
        if self.eof == eof {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.eof = eof)
    }

    /// Replace the statement list, keeping the padding of statements that
    /// survive (matched by id).
    ///
    /// # Panics
    ///
    /// Panics if an element is not a statement.
    pub fn with_statements(self: &Arc<Self>, statements: Vec<J>) -> Arc<Self> {
        self.padding()
            .with_statements(RightPadded::with_elements(&self.statements, statements))
    }

    /// Top-level class declarations.
    pub fn classes(&self) -> Vec<Arc<ClassDeclaration>> {
        self.statements
            .iter()
            .filter_map(|p| p.element().downcast::<ClassDeclaration>().cloned())
            .collect()
    }

    /// Top-level variable declarations.
    pub fn variable_declarations(&self) -> Vec<Arc<VariableDeclaration>> {
        self.statements
            .iter()
            .filter_map(|p| p.element().downcast::<VariableDeclaration>().cloned())
            .collect()
    }

    /// Every type referenced anywhere in the unit.
    ///
    /// Computed on first access and cached for this exact node; an edited
    /// copy of the unit computes its own.
    pub fn types_in_use(self: &Arc<Self>) -> Arc<TypesInUse> {
        self.types_in_use.get_or_compute(self, TypesInUse::collect)
    }

    /// Returns true if the types-in-use view is already computed for this node.
    pub fn has_cached_types_in_use(self: &Arc<Self>) -> bool {
        self.types_in_use.is_cached_for(self)
    }

    pub fn padding(self: &Arc<Self>) -> CompilationUnitPadding<'_> {
        CompilationUnitPadding { t: self }
    }
}

/// Builder for [`CompilationUnit`], which has too many slots for a
/// positional constructor.
#[derive(Debug)]
pub struct CompilationUnitBuilder {
    id: Option<TreeId>,
    prefix: Space,
    markers: Markers,
    dialect: Dialect,
    source: SourceMetadata,
    shebang: Option<String>,
    statements: Vec<RightPadded<J>>,
    eof: Space,
}

impl CompilationUnitBuilder {
    pub fn id(mut self, id: TreeId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn prefix(mut self, prefix: Space) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    pub fn shebang(mut self, shebang: impl Into<String>) -> Self {
        self.shebang = Some(shebang.into());
        self
    }

    pub fn statements(mut self, statements: Vec<RightPadded<J>>) -> Self {
        self.statements = statements;
        self
    }

    pub fn eof(mut self, eof: Space) -> Self {
        self.eof = eof;
        self
    }

    /// Build the unit, checking that every element is a statement.
    pub fn build(self) -> Result<Arc<CompilationUnit>, ShapeError> {
        check_statements(&self.statements)?;
        Ok(Arc::new(CompilationUnit {
            id: self.id.unwrap_or_else(TreeId::random),
            prefix: self.prefix,
            markers: self.markers,
            dialect: self.dialect,
            source: self.source,
            shebang: self.shebang,
            statements: self.statements,
            eof: self.eof,
            types_in_use: DerivedCache::new(),
        }))
    }
}

pub struct CompilationUnitPadding<'a> {
    t: &'a Arc<CompilationUnit>,
}

impl CompilationUnitPadding<'_> {
    pub fn statements(&self) -> &[RightPadded<J>] {
        &self.t.statements
    }

    /// # Panics
    ///
    /// Panics if an element is not a statement.
    pub fn with_statements(&self, statements: Vec<RightPadded<J>>) -> Arc<CompilationUnit> {
        if all_identical(&self.t.statements, &statements) {
            return Arc::clone(self.t);
        }
        expect_shape(check_statements(&statements));
        rebuild(self.t, |n| n.statements = statements)
    }
}

// ============================================================================
// Empty
// ============================================================================

/// Placeholder for an absent statement or expression, such as the single
/// element of an empty list literal.
#[derive(Debug, Clone)]
pub struct Empty {
    id: TreeId,
    prefix: Space,
    markers: Markers,
}

impl_tree!(Empty);

impl Empty {
    pub fn build(prefix: Space) -> Arc<Self> {
        Arc::new(Empty {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
        })
    }
}

// ============================================================================
// Identifier
// ============================================================================

#[derive(Debug, Clone)]
pub struct Identifier {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    simple_name: String,
    java_type: Option<JavaType>,
    field_type: Option<JavaType>,
}

impl_tree!(Identifier);
impl_typed!(Identifier);

impl Identifier {
    pub fn build(prefix: Space, simple_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Identifier {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            simple_name: simple_name.into(),
            java_type: None,
            field_type: None,
        })
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    /// When the identifier names a field, the field's type.
    pub fn field_type(&self) -> Option<&JavaType> {
        self.field_type.as_ref()
    }

    pub fn with_simple_name(self: &Arc<Self>, simple_name: impl Into<String>) -> Arc<Self> {
        let simple_name = simple_name.into();
        if self.simple_name == simple_name {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.simple_name = simple_name)
    }

    pub fn with_field_type(self: &Arc<Self>, field_type: Option<JavaType>) -> Arc<Self> {
        if self.field_type == field_type {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.field_type = field_type)
    }
}

// ============================================================================
// Literal
// ============================================================================

/// Decoded value of a [`Literal`].
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
}

impl LiteralValue {
    pub fn primitive(&self) -> Primitive {
        match self {
            LiteralValue::Int(_) => Primitive::Int,
            LiteralValue::Float(_) => Primitive::Double,
            LiteralValue::Str(_) => Primitive::String,
            LiteralValue::Bool(_) => Primitive::Boolean,
            LiteralValue::Null => Primitive::Null,
        }
    }

    /// Canonical source text for the value.
    pub fn source_text(&self) -> String {
        match self {
            LiteralValue::Int(v) => v.to_string(),
            LiteralValue::Float(v) => format!("{v:?}"),
            LiteralValue::Str(s) => format!("'{}'", s.replace('\'', "\\'")),
            LiteralValue::Bool(b) => b.to_string(),
            LiteralValue::Null => "null".to_string(),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(v) => write!(f, "{v}"),
            LiteralValue::Float(v) => write!(f, "{v}"),
            LiteralValue::Str(s) => f.write_str(s),
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::Null => f.write_str("null"),
        }
    }
}

/// A literal. The printer emits `value_source` verbatim, so quoting and
/// numeric spelling survive a round trip.
#[derive(Debug, Clone)]
pub struct Literal {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    value: LiteralValue,
    value_source: String,
    java_type: Option<JavaType>,
}

impl_tree!(Literal);
impl_typed!(Literal);

impl Literal {
    pub fn build(
        prefix: Space,
        value: LiteralValue,
        value_source: impl Into<String>,
        java_type: Option<JavaType>,
    ) -> Arc<Self> {
        Arc::new(Literal {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            value,
            value_source: value_source.into(),
            java_type,
        })
    }

    /// A literal spelled canonically and typed by its value.
    pub fn of(prefix: Space, value: LiteralValue) -> Arc<Self> {
        let source = value.source_text();
        let java_type = JavaType::Primitive(value.primitive());
        Literal::build(prefix, value, source, Some(java_type))
    }

    pub fn value(&self) -> &LiteralValue {
        &self.value
    }

    pub fn value_source(&self) -> &str {
        &self.value_source
    }

    pub fn with_value(self: &Arc<Self>, value: LiteralValue) -> Arc<Self> {
        if self.value == value {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.value = value)
    }

    pub fn with_value_source(self: &Arc<Self>, value_source: impl Into<String>) -> Arc<Self> {
        let value_source = value_source.into();
        if self.value_source == value_source {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.value_source = value_source)
    }
}

// ============================================================================
// Binary
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Addition => "+",
            BinaryOperator::Subtraction => "-",
            BinaryOperator::Multiplication => "*",
            BinaryOperator::Division => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThanOrEqual => ">=",
        }
    }
}

impl Identical for BinaryOperator {
    fn identical(&self, other: &Self) -> bool {
        self == other
    }
}

#[derive(Debug, Clone)]
pub struct Binary {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    left: J,
    operator: LeftPadded<BinaryOperator>,
    right: J,
    java_type: Option<JavaType>,
}

impl_tree!(Binary);
impl_typed!(Binary);

impl Binary {
    pub fn build(
        prefix: Space,
        left: J,
        operator: LeftPadded<BinaryOperator>,
        right: J,
        java_type: Option<JavaType>,
    ) -> Arc<Self> {
        Arc::new(Binary {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            left,
            operator,
            right,
            java_type,
        })
    }

    pub fn left(&self) -> &J {
        &self.left
    }

    pub fn operator(&self) -> BinaryOperator {
        *self.operator.element()
    }

    pub fn right(&self) -> &J {
        &self.right
    }

    pub fn with_left(self: &Arc<Self>, left: J) -> Arc<Self> {
        if self.left.identical(&left) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.left = left)
    }

    pub fn with_operator(self: &Arc<Self>, operator: BinaryOperator) -> Arc<Self> {
        self.padding()
            .with_operator(self.operator.with_element(operator))
    }

    pub fn with_right(self: &Arc<Self>, right: J) -> Arc<Self> {
        if self.right.identical(&right) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.right = right)
    }

    pub fn padding(self: &Arc<Self>) -> BinaryPadding<'_> {
        BinaryPadding { t: self }
    }
}

pub struct BinaryPadding<'a> {
    t: &'a Arc<Binary>,
}

impl BinaryPadding<'_> {
    pub fn operator(&self) -> &LeftPadded<BinaryOperator> {
        &self.t.operator
    }

    pub fn with_operator(&self, operator: LeftPadded<BinaryOperator>) -> Arc<Binary> {
        if self.t.operator.identical(&operator) {
            return Arc::clone(self.t);
        }
        rebuild(self.t, |n| n.operator = operator)
    }
}

// ============================================================================
// FieldAccess
// ============================================================================

/// `target.name`
#[derive(Debug, Clone)]
pub struct FieldAccess {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    target: J,
    name: LeftPadded<Arc<Identifier>>,
    java_type: Option<JavaType>,
}

impl_tree!(FieldAccess);
impl_typed!(FieldAccess);

impl FieldAccess {
    pub fn build(prefix: Space, target: J, name: LeftPadded<Arc<Identifier>>) -> Arc<Self> {
        Arc::new(FieldAccess {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            target,
            name,
            java_type: None,
        })
    }

    pub fn target(&self) -> &J {
        &self.target
    }

    pub fn name(&self) -> &Arc<Identifier> {
        self.name.element()
    }

    pub fn simple_name(&self) -> &str {
        self.name.element().simple_name()
    }

    pub fn with_target(self: &Arc<Self>, target: J) -> Arc<Self> {
        if self.target.identical(&target) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.target = target)
    }

    pub fn with_name(self: &Arc<Self>, name: Arc<Identifier>) -> Arc<Self> {
        self.padding().with_name(self.name.with_element(name))
    }

    pub fn padding(self: &Arc<Self>) -> FieldAccessPadding<'_> {
        FieldAccessPadding { t: self }
    }
}

pub struct FieldAccessPadding<'a> {
    t: &'a Arc<FieldAccess>,
}

impl FieldAccessPadding<'_> {
    pub fn name(&self) -> &LeftPadded<Arc<Identifier>> {
        &self.t.name
    }

    pub fn with_name(&self, name: LeftPadded<Arc<Identifier>>) -> Arc<FieldAccess> {
        if self.t.name.identical(&name) {
            return Arc::clone(self.t);
        }
        rebuild(self.t, |n| n.name = name)
    }
}

// ============================================================================
// VariableDeclaration
// ============================================================================

/// `def name = initializer`
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    name: Arc<Identifier>,
    initializer: Option<LeftPadded<J>>,
    java_type: Option<JavaType>,
}

impl_tree!(VariableDeclaration);
impl_typed!(VariableDeclaration);

impl VariableDeclaration {
    pub fn build(
        prefix: Space,
        name: Arc<Identifier>,
        initializer: Option<LeftPadded<J>>,
    ) -> Arc<Self> {
        Arc::new(VariableDeclaration {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            name,
            initializer,
            java_type: None,
        })
    }

    pub fn name(&self) -> &Arc<Identifier> {
        &self.name
    }

    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }

    pub fn initializer(&self) -> Option<&J> {
        self.initializer.as_ref().map(LeftPadded::element)
    }

    pub fn with_name(self: &Arc<Self>, name: Arc<Identifier>) -> Arc<Self> {
        if Arc::ptr_eq(&self.name, &name) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.name = name)
    }

    /// Set the initializer, reusing the existing `=` padding when present.
    pub fn with_initializer(self: &Arc<Self>, initializer: Option<J>) -> Arc<Self> {
        let padded = match (initializer, &self.initializer) {
            (None, _) => None,
            (Some(init), Some(existing)) => Some(existing.with_element(init)),
            (Some(init), None) => Some(LeftPadded::build(init)),
        };
        self.padding().with_initializer(padded)
    }

    pub fn padding(self: &Arc<Self>) -> VariableDeclarationPadding<'_> {
        VariableDeclarationPadding { t: self }
    }
}

pub struct VariableDeclarationPadding<'a> {
    t: &'a Arc<VariableDeclaration>,
}

impl VariableDeclarationPadding<'_> {
    pub fn initializer(&self) -> Option<&LeftPadded<J>> {
        self.t.initializer.as_ref()
    }

    pub fn with_initializer(&self, initializer: Option<LeftPadded<J>>) -> Arc<VariableDeclaration> {
        if self.t.initializer.identical(&initializer) {
            return Arc::clone(self.t);
        }
        rebuild(self.t, |n| n.initializer = initializer)
    }
}

// ============================================================================
// Block
// ============================================================================

/// `{ statements }`. `end` is the space before the closing brace.
#[derive(Debug, Clone)]
pub struct Block {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    statements: Vec<RightPadded<J>>,
    end: Space,
}

impl_tree!(Block);

impl Block {
    pub fn build(
        prefix: Space,
        statements: Vec<RightPadded<J>>,
        end: Space,
    ) -> Result<Arc<Self>, ShapeError> {
        check_statements(&statements)?;
        Ok(Arc::new(Block {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            statements,
            end,
        }))
    }

    pub fn statements(&self) -> Vec<J> {
        RightPadded::elements(&self.statements)
    }

    pub fn end(&self) -> &Space {
        &self.end
    }

    /// # Panics
    ///
    /// Panics if an element is not a statement.
    pub fn with_statements(self: &Arc<Self>, statements: Vec<J>) -> Arc<Self> {
        self.padding()
            .with_statements(RightPadded::with_elements(&self.statements, statements))
    }

    pub fn with_end(self: &Arc<Self>, end: Space) -> Arc<Self> {
        if self.end == end {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.end = end)
    }

    pub fn padding(self: &Arc<Self>) -> BlockPadding<'_> {
        BlockPadding { t: self }
    }
}

pub struct BlockPadding<'a> {
    t: &'a Arc<Block>,
}

impl BlockPadding<'_> {
    pub fn statements(&self) -> &[RightPadded<J>] {
        &self.t.statements
    }

    /// # Panics
    ///
    /// Panics if an element is not a statement.
    pub fn with_statements(&self, statements: Vec<RightPadded<J>>) -> Arc<Block> {
        if all_identical(&self.t.statements, &statements) {
            return Arc::clone(self.t);
        }
        expect_shape(check_statements(&statements));
        rebuild(self.t, |n| n.statements = statements)
    }
}

// ============================================================================
// ClassDeclaration
// ============================================================================

/// `class Name { ... }`
#[derive(Debug, Clone)]
pub struct ClassDeclaration {
    id: TreeId,
    prefix: Space,
    markers: Markers,
    name: Arc<Identifier>,
    body: Arc<Block>,
    java_type: Option<JavaType>,
}

impl_tree!(ClassDeclaration);
impl_typed!(ClassDeclaration);

impl ClassDeclaration {
    pub fn build(prefix: Space, name: Arc<Identifier>, body: Arc<Block>) -> Arc<Self> {
        let java_type = Some(JavaType::class(name.simple_name()));
        Arc::new(ClassDeclaration {
            id: TreeId::random(),
            prefix,
            markers: Markers::EMPTY,
            name,
            body,
            java_type,
        })
    }

    pub fn name(&self) -> &Arc<Identifier> {
        &self.name
    }

    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }

    pub fn body(&self) -> &Arc<Block> {
        &self.body
    }

    pub fn with_name(self: &Arc<Self>, name: Arc<Identifier>) -> Arc<Self> {
        if Arc::ptr_eq(&self.name, &name) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.name = name)
    }

    pub fn with_body(self: &Arc<Self>, body: Arc<Block>) -> Arc<Self> {
        if Arc::ptr_eq(&self.body, &body) {
            return Arc::clone(self);
        }
        rebuild(self, |n| n.body = body)
    }
}
