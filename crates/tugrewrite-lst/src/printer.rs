// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Source printer.
//!
//! Printing is a total function of the tree: every prefix, padding, and
//! delimiter captured by the parser is written back in order, so an unedited
//! tree prints as the exact text it was parsed from.
//!
//! # Example
//!
//! ```ignore
//! use tugrewrite_lst::{parse_groovy, print_tree, Codegen, CodegenState};
//!
//! let cu = parse_groovy("build.gradle", "def x = [a: 1]\n")?;
//! let mut state = CodegenState::default();
//! cu.codegen(&mut state);
//! assert_eq!(state.to_string(), "def x = [a: 1]\n");
//! ```

use std::fmt;
use std::sync::Arc;

use tugrewrite_core::source::UTF8_BOM;
use tugrewrite_core::{Markers, SearchResult};

use crate::padding::{Container, RightPadded};
use crate::space::Space;
use crate::tree::{
    Binary, Block, ClassDeclaration, CompilationUnit, Empty, ExpressionStatement, FieldAccess,
    GBinary, GBinaryOperator, GString, GStringValue, Identifier, ListLiteral, Literal, MapEntry,
    MapLiteral, Range, TrailingComma, Tree, VariableDeclaration, J,
};

/// Output buffer for [`Codegen`].
#[derive(Debug, Default)]
pub struct CodegenState {
    tokens: String,
    /// Render search results as `/*~~>*/` comments.
    pub mark_search_results: bool,
}

impl CodegenState {
    /// A state that renders search results inline.
    pub fn with_search_markers() -> Self {
        CodegenState {
            mark_search_results: true,
            ..CodegenState::default()
        }
    }

    pub fn add_token(&mut self, tok: &str) {
        self.tokens.push_str(tok);
    }

    pub fn add_space(&mut self, space: &Space) {
        use fmt::Write;
        // Writing into a String cannot fail.
        let _ = write!(self.tokens, "{space}");
    }

    /// The prefix of a node, then its search marker when enabled.
    fn before_syntax(&mut self, prefix: &Space, markers: &Markers) {
        self.add_space(prefix);
        if !self.mark_search_results {
            return;
        }
        if let Some(result) = markers.find_first::<SearchResult>() {
            match result.description() {
                Some(description) => {
                    self.add_token("/*~~(");
                    self.add_token(description);
                    self.add_token(")~~>*/");
                }
                None => self.add_token("/*~~>*/"),
            }
        }
    }

    pub fn into_string(self) -> String {
        self.tokens
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens)
    }
}

pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState);
}

/// Print `tree` back to source text.
pub fn print_tree(tree: &J) -> String {
    let mut state = CodegenState::default();
    tree.codegen(&mut state);
    state.into_string()
}

/// Print `tree` with search results rendered as `/*~~>*/` comments.
pub fn print_marked(tree: &J) -> String {
    let mut state = CodegenState::with_search_markers();
    tree.codegen(&mut state);
    state.into_string()
}

impl Codegen for J {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            J::CompilationUnit(n) => n.codegen(state),
            J::Empty(n) => n.codegen(state),
            J::Identifier(n) => n.codegen(state),
            J::Literal(n) => n.codegen(state),
            J::Binary(n) => n.codegen(state),
            J::FieldAccess(n) => n.codegen(state),
            J::VariableDeclaration(n) => n.codegen(state),
            J::Block(n) => n.codegen(state),
            J::ClassDeclaration(n) => n.codegen(state),
            J::ExpressionStatement(n) => n.codegen(state),
            J::MapEntry(n) => n.codegen(state),
            J::MapLiteral(n) => n.codegen(state),
            J::ListLiteral(n) => n.codegen(state),
            J::GString(n) => n.codegen(state),
            J::GStringValue(n) => n.codegen(state),
            J::GBinary(n) => n.codegen(state),
            J::Range(n) => n.codegen(state),
        }
    }
}

/// Elements with their trailing space, joined by `separator`. A trailing
/// comma marker prints after the last element's space.
fn codegen_right_padded<T: Codegen>(
    elements: &[RightPadded<T>],
    separator: &str,
    state: &mut CodegenState,
) {
    for (i, padded) in elements.iter().enumerate() {
        padded.element().codegen(state);
        state.add_space(padded.after());
        if let Some(comma) = padded.markers().find_first::<TrailingComma>() {
            state.add_token(",");
            state.add_space(comma.suffix());
        }
        if i + 1 < elements.len() {
            state.add_token(separator);
        }
    }
}

fn codegen_bracketed<T: Codegen>(container: &Container<T>, state: &mut CodegenState) {
    state.add_space(container.before());
    state.add_token("[");
    codegen_right_padded(container.padding(), ",", state);
    state.add_token("]");
}

fn codegen_statements(statements: &[RightPadded<J>], state: &mut CodegenState) {
    for padded in statements {
        padded.element().codegen(state);
        state.add_space(padded.after());
    }
}

// ============================================================================
// Base nodes
// ============================================================================

impl Codegen for Arc<CompilationUnit> {
    fn codegen(&self, state: &mut CodegenState) {
        if self.is_charset_bom_marked() {
            state.add_token(UTF8_BOM.encode_utf8(&mut [0; 4]));
        }
        if let Some(shebang) = self.shebang() {
            state.add_token(shebang);
        }
        state.before_syntax(self.prefix(), self.markers());
        codegen_statements(self.padding().statements(), state);
        state.add_space(self.eof());
    }
}

impl Codegen for Arc<Empty> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
    }
}

impl Codegen for Arc<Identifier> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        state.add_token(self.simple_name());
    }
}

impl Codegen for Arc<Literal> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        state.add_token(self.value_source());
    }
}

impl Codegen for Arc<Binary> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        self.left().codegen(state);
        let padding = self.padding();
        let operator = padding.operator();
        state.add_space(operator.before());
        state.add_token(operator.element().symbol());
        self.right().codegen(state);
    }
}

impl Codegen for Arc<FieldAccess> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        self.target().codegen(state);
        let padding = self.padding();
        let name = padding.name();
        state.add_space(name.before());
        state.add_token(".");
        name.element().codegen(state);
    }
}

impl Codegen for Arc<VariableDeclaration> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        state.add_token("def");
        self.name().codegen(state);
        if let Some(initializer) = self.padding().initializer() {
            state.add_space(initializer.before());
            state.add_token("=");
            initializer.element().codegen(state);
        }
    }
}

impl Codegen for Arc<Block> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        state.add_token("{");
        codegen_statements(self.padding().statements(), state);
        state.add_space(self.end());
        state.add_token("}");
    }
}

impl Codegen for Arc<ClassDeclaration> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        state.add_token("class");
        self.name().codegen(state);
        self.body().codegen(state);
    }
}

// ============================================================================
// Groovy nodes
// ============================================================================

impl Codegen for Arc<ExpressionStatement> {
    fn codegen(&self, state: &mut CodegenState) {
        self.expression().codegen(state);
    }
}

impl Codegen for Arc<MapEntry> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        let padding = self.padding();
        let key = padding.key();
        key.element().codegen(state);
        state.add_space(key.after());
        state.add_token(":");
        self.value().codegen(state);
    }
}

impl Codegen for Arc<MapLiteral> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        let padding = self.padding();
        let elements = padding.elements();
        if elements.is_empty() {
            state.add_space(elements.before());
            state.add_token("[:]");
        } else {
            codegen_bracketed(elements, state);
        }
    }
}

impl Codegen for Arc<ListLiteral> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        codegen_bracketed(self.padding().elements(), state);
    }
}

impl Codegen for Arc<GString> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        state.add_token(self.delimiter());
        for part in self.strings() {
            part.codegen(state);
        }
        state.add_token(self.delimiter());
    }
}

impl Codegen for Arc<GStringValue> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        state.add_token("$");
        if self.is_enclosed_in_braces() {
            state.add_token("{");
        }
        self.tree().codegen(state);
        state.add_space(self.after());
        if self.is_enclosed_in_braces() {
            state.add_token("}");
        }
    }
}

impl Codegen for Arc<GBinary> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        self.left().codegen(state);
        let padding = self.padding();
        let operator = padding.operator();
        state.add_space(operator.before());
        state.add_token(operator.element().symbol());
        self.right().codegen(state);
        if *operator.element() == GBinaryOperator::Access {
            state.add_space(self.after());
            state.add_token("]");
        }
    }
}

impl Codegen for Arc<Range> {
    fn codegen(&self, state: &mut CodegenState) {
        state.before_syntax(self.prefix(), self.markers());
        self.from().codegen(state);
        let padding = self.padding();
        let inclusive = padding.inclusive();
        state.add_space(inclusive.before());
        state.add_token(if *inclusive.element() { ".." } else { "..<" });
        self.to().codegen(state);
    }
}
