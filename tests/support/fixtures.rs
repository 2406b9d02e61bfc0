//! Tree fixtures for integration tests.

use std::sync::Arc;

use tugrewrite::search::find_matching;
use tugrewrite::tree::{
    CompilationUnit, Dialect, FieldAccess, Identifier, Literal, LiteralValue, MapEntry,
    VariableDeclaration,
};
use tugrewrite::types::JavaType;
use tugrewrite::{
    parse_groovy, print_tree, LeftPadded, RightPadded, SourceMetadata, Space, Traversal,
    TreeVisitor, TypedTree, J,
};

pub const JSON_WRITE_FEATURE: &str = "com.fasterxml.jackson.core.json.JsonWriteFeature";
pub const QUOTE_FIELD_NAMES: &str = "QUOTE_FIELD_NAMES";

/// Parse `source` as `fixture.groovy`.
pub fn parse(source: &str) -> Arc<CompilationUnit> {
    parse_groovy("fixture.groovy", source).expect("fixture parses")
}

/// Parse `source` under `path`.
pub fn parse_at(path: &str, source: &str) -> Arc<CompilationUnit> {
    parse_groovy(path, source).expect("fixture parses")
}

pub fn text(unit: &Arc<CompilationUnit>) -> String {
    print_tree(&J::CompilationUnit(Arc::clone(unit)))
}

pub fn int(prefix: Space, value: i64) -> J {
    J::Literal(Literal::of(prefix, LiteralValue::Int(value)))
}

/// The first map entry whose key is the identifier `name`.
pub fn entry_named(unit: &Arc<CompilationUnit>, name: &str) -> Arc<MapEntry> {
    let found = find_matching(&J::CompilationUnit(Arc::clone(unit)), |tree, _| {
        matches!(tree, J::MapEntry(entry)
            if matches!(entry.key(), J::Identifier(id) if id.simple_name() == name))
    });
    let first = found.iter().next().expect("entry present");
    Arc::clone(first.downcast::<MapEntry>().expect("map entry"))
}

/// `JsonWriteFeature.QUOTE_FIELD_NAMES`, attributed with its field type.
pub fn feature_access(field: &str) -> J {
    let owner = JavaType::class(JSON_WRITE_FEATURE);
    let target = Identifier::build(Space::EMPTY, "JsonWriteFeature")
        .with_java_type(Some(owner.clone()));
    let name = Identifier::build(Space::EMPTY, field).with_field_type(Some(JavaType::field(
        field,
        owner.clone(),
        owner,
    )));
    J::FieldAccess(FieldAccess::build(
        Space::single_space(),
        J::Identifier(target),
        LeftPadded::build(name),
    ))
}

/// `def name = <initializer>` at the start of a line.
pub fn declaration(name: &str, initializer: J, first: bool) -> J {
    let prefix = if first { Space::EMPTY } else { Space::format("\n") };
    J::VariableDeclaration(VariableDeclaration::build(
        prefix,
        Identifier::build(Space::single_space(), name),
        Some(LeftPadded::new(
            Space::single_space(),
            initializer,
            tugrewrite::Markers::EMPTY,
        )),
    ))
}

/// A typed unit:
///
/// ```text
/// def quote = JsonWriteFeature.QUOTE_FIELD_NAMES
/// def other = 1
/// ```
pub fn jackson_unit(path: &str) -> Arc<CompilationUnit> {
    let statements = vec![
        declaration("quote", feature_access(QUOTE_FIELD_NAMES), true),
        declaration("other", int(Space::single_space(), 1), false),
    ];
    CompilationUnit::builder(Dialect::Groovy, SourceMetadata::new(path))
        .statements(statements.into_iter().map(RightPadded::build).collect())
        .eof(Space::format("\n"))
        .build()
        .expect("well-formed unit")
}

/// A visitor that edits nothing.
pub struct NoOp;

impl<P> TreeVisitor<P> for NoOp {}

/// A visitor that records the kind of every node it enters.
#[derive(Default)]
pub struct KindLog {
    pub kinds: Vec<&'static str>,
}

impl<P> TreeVisitor<P> for KindLog {
    fn pre_visit(&mut self, tree: J, _tr: &mut Traversal<'_, P>) -> J {
        self.kinds.push(tree.kind().name());
        tree
    }
}
