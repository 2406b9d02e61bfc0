//! Behavioral properties of the tree model and recipe machinery.

mod support;

use std::sync::Arc;

use support::fixtures::{entry_named, jackson_unit, parse, text, KindLog, NoOp};
use support::fixtures::{JSON_WRITE_FEATURE, QUOTE_FIELD_NAMES};
use support::recipes::{key_named, ChangeMapValue};
use tugrewrite::padding::Identical;
use tugrewrite::search::{found, marked};
use tugrewrite::tree::{
    BinaryOperator, CompilationUnit, ExpressionStatement, ListLiteral, Literal, LiteralValue, VariableDeclaration,
};
use tugrewrite::types::{JavaType, Primitive};
use tugrewrite::visitor::{run, run_gated};
use tugrewrite::{
    apply_recipe, ExecutionContext, Markers, RunConfig, SearchResult, Space, Tree, TypedTree, J,
};

fn statement(unit: &Arc<tugrewrite::tree::CompilationUnit>, index: usize) -> J {
    unit.statements()[index].clone()
}

#[test]
fn printing_an_unedited_parse_reproduces_the_source() {
    support::init_tracing();
    let source = "// deps\ndef deps = [\n  group : 'org.example',  // group\n  version:\"${v}\" ,\n]\n";
    assert_eq!(text(&parse(source)), source);
}

#[test]
fn noop_visitor_preserves_identity() {
    let unit = parse("class A {\n  def m = [a: [1, 2], b: 'x' + y.z]\n}\n");
    let tree = J::CompilationUnit(Arc::clone(&unit));
    let after = run(&mut NoOp, &tree, &mut ());
    let J::CompilationUnit(after) = after else {
        panic!("root kind changed");
    };
    assert!(Arc::ptr_eq(&after, &unit));
}

#[test]
fn precondition_skips_unmatched_subtrees() {
    support::init_tracing();
    let unit = parse("def a = [k: 1]\ndef b = [j: 2]\n");
    let gate = key_named("k").evaluate(&unit);

    let mut log = KindLog::default();
    let tree = J::CompilationUnit(Arc::clone(&unit));
    run_gated(&mut log, &tree, &mut (), gate);
    assert_eq!(
        log.kinds,
        [
            "CompilationUnit",
            "VariableDeclaration",
            "MapLiteral",
            "MapEntry",
            "Identifier",
            "Literal",
        ],
        "only the path to the match and the match itself are entered"
    );

    let mut ctx = ExecutionContext::new(RunConfig::default());
    let after = apply_recipe(&ChangeMapValue::new("k", 5), &unit, &mut ctx);
    assert_eq!(text(&after), "def a = [k: 5]\ndef b = [j: 2]\n");
    let (J::VariableDeclaration(before_b), J::VariableDeclaration(after_b)) =
        (statement(&unit, 1), statement(&after, 1))
    else {
        panic!("expected declarations");
    };
    assert!(Arc::ptr_eq(&before_b, &after_b));
}

#[test]
fn marking_twice_adds_one_marker() {
    let unit = parse("def a = [k: 1]\n");
    let entry = J::MapEntry(entry_named(&unit, "k"));

    let once = found(&entry, Some("hit"));
    let twice = found(&once, Some("hit"));
    assert!(twice.identical(&once));
    assert_eq!(once.markers().find_all::<SearchResult>().count(), 1);

    let precondition = key_named("k");
    let marked_once = precondition.mark(&unit);
    let J::CompilationUnit(marked_unit) = &marked_once else {
        panic!("root kind changed");
    };
    let marked_twice = precondition.mark(marked_unit);
    assert_eq!(marked(&marked_twice).len(), 1);
    let entry = entry_named(marked_unit, "k");
    assert_eq!(entry.markers().find_all::<SearchResult>().count(), 1);
}

#[test]
fn padding_survives_remove_and_reinsert() {
    let source = "def l = [1,  2, 3]\n";
    let unit = parse(source);
    let J::VariableDeclaration(decl) = statement(&unit, 0) else {
        panic!("expected a declaration");
    };
    let Some(J::ListLiteral(list)) = decl.initializer() else {
        panic!("expected a list initializer");
    };
    let two = list.elements()[1].clone();

    let removed = list.padding().elements().remove(1).unwrap();
    let without = list.padding().with_elements(removed.clone());
    assert_eq!(
        text(&unit.with_statements(vec![J::VariableDeclaration(
            decl.with_initializer(Some(J::ListLiteral(Arc::clone(&without))))
        )])),
        "def l = [1, 3]\n"
    );

    let restored = removed.try_insert(1, two).unwrap();
    let list: Arc<ListLiteral> = without.padding().with_elements(restored);
    let decl: Arc<VariableDeclaration> = decl.with_initializer(Some(J::ListLiteral(list)));
    assert_eq!(
        text(&unit.with_statements(vec![J::VariableDeclaration(decl)])),
        source
    );

    let null = J::Literal(Literal::of(Space::EMPTY, LiteralValue::Null));
    assert!(removed.try_insert(5, null).is_err());
    assert!(removed.remove(2).is_err());
}

fn with_list(
    unit: &Arc<CompilationUnit>,
    edit: impl Fn(&Arc<ListLiteral>) -> Arc<ListLiteral>,
) -> String {
    let J::VariableDeclaration(decl) = statement(unit, 0) else {
        panic!("expected a declaration");
    };
    let Some(J::ListLiteral(list)) = decl.initializer() else {
        panic!("expected a list initializer");
    };
    let list = edit(list);
    text(&unit.with_statements(vec![J::VariableDeclaration(
        decl.with_initializer(Some(J::ListLiteral(list))),
    )]))
}

#[test]
fn removing_the_last_element_keeps_the_closing_padding() {
    let unit = parse("def l = [1, 2, 3 ]\n");
    let removed = with_list(&unit, |list| {
        list.padding()
            .with_elements(list.padding().elements().remove(2).unwrap())
    });
    assert_eq!(removed, "def l = [1, 2 ]\n");

    let unit = parse("def l = [\n  1,\n  2,\n]\n");
    let removed = with_list(&unit, |list| {
        list.padding()
            .with_elements(list.padding().elements().remove(1).unwrap())
    });
    assert_eq!(removed, "def l = [\n  1,\n]\n");

    let unit = parse("def l = [1, 2 ]\n");
    let appended = with_list(&unit, |list| {
        let three = J::Literal(Literal::of(Space::single_space(), LiteralValue::Int(3)));
        list.padding()
            .with_elements(list.padding().elements().try_insert(2, three).unwrap())
    });
    assert_eq!(appended, "def l = [1, 2, 3 ]\n");
}

#[test]
fn expression_statement_delegates_to_its_expression() {
    let unit = parse("  x + 1");
    let J::ExpressionStatement(stmt) = statement(&unit, 0) else {
        panic!("expected an expression statement");
    };
    let J::Binary(binary) = stmt.expression().clone() else {
        panic!("expected a binary");
    };
    assert_eq!(binary.operator(), BinaryOperator::Addition);
    assert_eq!(stmt.prefix(), binary.prefix());
    assert!(stmt.markers().identical(binary.markers()));
    assert_eq!(stmt.java_type(), binary.java_type());
    assert_ne!(stmt.id(), binary.id());

    let reprefixed: Arc<ExpressionStatement> = stmt.with_prefix(Space::format("\n"));
    assert_eq!(reprefixed.expression().prefix().whitespace(), "\n");

    let int = JavaType::Primitive(Primitive::Int);
    let typed = stmt.with_java_type(Some(int.clone()));
    assert_eq!(typed.expression().java_type(), Some(&int));

    let marked = stmt.with_markers(SearchResult::mark(&Markers::EMPTY, None));
    assert!(marked.expression().markers().contains::<SearchResult>());
    assert_eq!(marked.id(), stmt.id());
}

#[test]
fn derived_views_follow_edits() {
    let unit = jackson_unit("Quote.groovy");
    assert!(!unit.has_cached_types_in_use());
    let before = unit.types_in_use();
    assert!(before.uses_field(JSON_WRITE_FEATURE, QUOTE_FIELD_NAMES));
    assert!(unit.has_cached_types_in_use());
    assert!(Arc::ptr_eq(&before, &unit.types_in_use()));

    let J::VariableDeclaration(quote) = statement(&unit, 0) else {
        panic!("expected a declaration");
    };
    let replaced = quote.with_initializer(Some(J::Literal(Literal::of(
        Space::single_space(),
        LiteralValue::Bool(true),
    ))));
    let edited = unit.with_statements(vec![J::VariableDeclaration(replaced), statement(&unit, 1)]);

    assert!(!edited.has_cached_types_in_use());
    let after = edited.types_in_use();
    assert!(!after.uses_field(JSON_WRITE_FEATURE, QUOTE_FIELD_NAMES));
    assert!(!after.uses_type(JSON_WRITE_FEATURE));
    assert!(unit.types_in_use().uses_field(JSON_WRITE_FEATURE, QUOTE_FIELD_NAMES));
}

#[test]
fn changing_one_map_value_leaves_the_rest_shared() {
    support::init_tracing();
    let unit = parse("def x = [a: 1, b: 2]");
    let mut ctx = ExecutionContext::new(RunConfig::default());
    let after = apply_recipe(&ChangeMapValue::new("a", 99), &unit, &mut ctx);

    assert_eq!(text(&after), "def x = [a: 99, b: 2]");
    assert!(Arc::ptr_eq(&entry_named(&unit, "b"), &entry_named(&after, "b")));
    assert!(!ctx.has_errors());

    let again = apply_recipe(&ChangeMapValue::new("a", 99), &after, &mut ctx);
    assert_eq!(text(&again), "def x = [a: 99, b: 2]");
    let entry = entry_named(&again, "a");
    assert!(matches!(entry.value(), J::Literal(l) if l.value() == &LiteralValue::Int(99)));
}
