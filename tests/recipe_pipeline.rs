//! Recipes and pipelines driven through the public API.

mod support;

use std::fs;
use std::sync::Arc;

use support::fixtures::{jackson_unit, parse, parse_at, text, JSON_WRITE_FEATURE, QUOTE_FIELD_NAMES};
use support::recipes::{find_fields, key_named, ChangeMapValue, FindFields};
use tugrewrite::config::ENV_MAX_CYCLES;
use tugrewrite::tree::{CompilationUnit, Empty, MapEntry};
use tugrewrite::{
    apply_recipe, print_marked, ConfigSource, ExecutionContext, Pipeline, Precondition, Recipe,
    RecipeVisitor, RecipesThatMadeChanges, ResolvedRunConfig, RewriteError, RunConfig,
    RunOverrides, Space, Traversal, Tree, TreeVisitor, J,
};

fn sequential() -> RunConfig {
    RunConfig {
        parallel: false,
        ..RunConfig::default()
    }
}

#[test]
fn find_fields_marks_typed_field_accesses() {
    support::init_tracing();
    let unit = jackson_unit("Quote.groovy");
    let mut ctx = ExecutionContext::new(sequential());
    let after = apply_recipe(&FindFields::new(JSON_WRITE_FEATURE, QUOTE_FIELD_NAMES), &unit, &mut ctx);

    assert_eq!(
        print_marked(&J::CompilationUnit(Arc::clone(&after))),
        "def quote = /*~~>*/JsonWriteFeature.QUOTE_FIELD_NAMES\ndef other = 1\n"
    );
    assert_eq!(text(&after), text(&unit), "markers never print as source");

    // The access and its typed name both refer to the field; post-visit
    // order puts the name first.
    let hits = find_fields(&J::CompilationUnit(after), JSON_WRITE_FEATURE, QUOTE_FIELD_NAMES);
    let kinds: Vec<_> = hits.iter().map(|hit| hit.kind().name()).collect();
    assert_eq!(kinds, ["Identifier", "FieldAccess"]);
    let (Some(J::Identifier(name)), Some(J::FieldAccess(access))) =
        (hits.iter().next(), hits.iter().nth(1))
    else {
        panic!("expected the name and its access");
    };
    assert_eq!(name.simple_name(), QUOTE_FIELD_NAMES);
    assert!(Arc::ptr_eq(access.name(), name));
}

#[test]
fn field_precondition_skips_units_without_the_field() {
    let unit = parse("def quote = JsonWriteFeature.QUOTE_FIELD_NAMES\n");
    let recipe = FindFields::new(JSON_WRITE_FEATURE, QUOTE_FIELD_NAMES);
    let mut ctx = ExecutionContext::new(sequential());
    let after = apply_recipe(&recipe, &unit, &mut ctx);

    // Parsed source carries no field attribution.
    assert!(Arc::ptr_eq(&after, &unit));
    assert!(recipe.precondition().unwrap().evaluate(&unit).is_empty());
}

#[test]
fn pipeline_runs_recipes_in_order_and_records_provenance() {
    support::init_tracing();
    let unit = parse("def versions = [kotlin: 1, junit: 2]\n");
    let pipeline = Pipeline::new(sequential())
        .with_recipe(ChangeMapValue::new("kotlin", 19))
        .with_recipe(ChangeMapValue::new("missing", 0))
        .with_recipe(ChangeMapValue::new("junit", 5));
    assert_eq!(pipeline.recipe_names().len(), 3);

    let result = pipeline.run(&unit, &mut ExecutionContext::new(sequential()));
    assert!(result.is_changed());
    assert_eq!(text(&result.after), "def versions = [kotlin: 19, junit: 5]\n");
    assert_eq!(result.recipes_that_made_changes, ["change-map-value"]);

    let provenance = result
        .after
        .markers()
        .find_first::<RecipesThatMadeChanges>()
        .expect("provenance marker");
    assert_eq!(provenance.recipes(), ["change-map-value"]);
    assert!(result.errors.is_empty());
}

#[test]
fn run_all_processes_files_independently() {
    support::init_tracing();
    let units = vec![
        parse_at("a/build.gradle", "def deps = [kotlin: 1]\n"),
        parse_at("b/build.gradle", "def deps = [scala: 1]\n"),
        parse_at("c/build.gradle", "def other = [kotlin: 3, java: 4]\n"),
    ];
    let pipeline = Pipeline::new(RunConfig::default()).with_recipe(ChangeMapValue::new("kotlin", 2));
    let results = pipeline.run_all(&units);

    let summaries: Vec<_> = results.iter().map(|r| r.summary()).collect();
    assert_eq!(
        summaries.iter().map(|s| s.path.as_str()).collect::<Vec<_>>(),
        ["a/build.gradle", "b/build.gradle", "c/build.gradle"]
    );
    assert_eq!(
        summaries.iter().map(|s| s.changed).collect::<Vec<_>>(),
        [true, false, true]
    );
    assert_eq!(text(&results[2].after), "def other = [kotlin: 2, java: 4]\n");
    assert!(Arc::ptr_eq(&results[1].after, &units[1]));
    assert!(results[1]
        .after
        .markers()
        .find_first::<RecipesThatMadeChanges>()
        .is_none());
}

#[test]
fn shared_precondition_is_evaluated_once_per_unit() {
    let unit = parse("def m = [a: 1, b: 2]\n");
    let shared = Precondition::any([key_named("a"), key_named("b")]);
    let first = ChangeMapValue::with_precondition("a", 10, shared.clone());
    let second = ChangeMapValue::with_precondition("b", 20, shared.clone());

    let gate = shared.evaluate(&unit);
    assert!(shared.is_evaluated_for(&unit));
    assert!(Arc::ptr_eq(&gate, &first.precondition().unwrap().evaluate(&unit)));
    assert!(Arc::ptr_eq(&gate, &second.precondition().unwrap().evaluate(&unit)));

    let mut ctx = ExecutionContext::new(sequential());
    let after = apply_recipe(&first, &unit, &mut ctx);
    assert!(!shared.is_evaluated_for(&after));
    let after = apply_recipe(&second, &after, &mut ctx);
    assert_eq!(text(&after), "def m = [a: 10, b: 20]\n");
}

#[test]
fn resolved_configuration_drives_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tugrewrite.json");
    fs::write(&path, r#"{ "max_cycles": 2, "mark_provenance": false }"#).unwrap();

    let env = |key: &str| (key == ENV_MAX_CYCLES).then(|| "3".to_string());
    let overrides = RunOverrides {
        parallel: Some(false),
        ..RunOverrides::default()
    };
    let resolved = ResolvedRunConfig::resolve_with_env(Some(&path), &overrides, env).unwrap();
    assert_eq!(resolved.max_cycles.value, 3);
    assert_eq!(resolved.max_cycles.source, ConfigSource::EnvVar);
    assert_eq!(resolved.mark_provenance.source, ConfigSource::File);
    assert_eq!(resolved.parallel.source, ConfigSource::Explicit);

    let config = resolved.to_config();
    let unit = parse("def m = [a: 1]\n");
    let pipeline = Pipeline::new(config.clone()).with_recipe(ChangeMapValue::new("a", 7));
    let result = pipeline.run(&unit, &mut ExecutionContext::new(config));
    assert_eq!(text(&result.after), "def m = [a: 7]\n");
    assert_eq!(result.cycles, 2, "one changing pass and one stable pass");
    assert!(result.after.markers().find_first::<RecipesThatMadeChanges>().is_none());
}

#[test]
fn invalid_configuration_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tugrewrite.json");
    fs::write(&path, r#"{ "max_cycles": 0 }"#).unwrap();
    let err = ResolvedRunConfig::resolve_with_env(Some(&path), &RunOverrides::default(), |_| None)
        .unwrap_err();
    assert!(matches!(err, RewriteError::Config { .. }));

    fs::write(&path, "not json").unwrap();
    let err = ResolvedRunConfig::resolve_with_env(Some(&path), &RunOverrides::default(), |_| None)
        .unwrap_err();
    assert!(matches!(err, RewriteError::Json(_)));
}

/// Reports every map entry it finds instead of editing it.
struct Complain;

impl TreeVisitor<ExecutionContext> for Complain {
    fn visit_map_entry(
        &mut self,
        node: &Arc<MapEntry>,
        tr: &mut Traversal<'_, ExecutionContext>,
    ) -> J {
        tr.param_mut().fail("entries are not allowed here");
        J::MapEntry(Arc::clone(node))
    }
}

struct ComplainRecipe;

impl Recipe for ComplainRecipe {
    fn name(&self) -> &str {
        "complain"
    }

    fn visitor(&self) -> RecipeVisitor {
        Box::new(Complain)
    }
}

/// Replaces the whole unit with an empty node.
struct Vandal;

impl TreeVisitor<ExecutionContext> for Vandal {
    fn visit_compilation_unit(
        &mut self,
        _node: &Arc<CompilationUnit>,
        _tr: &mut Traversal<'_, ExecutionContext>,
    ) -> J {
        J::Empty(Empty::build(Space::EMPTY))
    }
}

struct VandalRecipe;

impl Recipe for VandalRecipe {
    fn name(&self) -> &str {
        "vandal"
    }

    fn visitor(&self) -> RecipeVisitor {
        Box::new(Vandal)
    }
}

#[test]
fn recipe_errors_are_collected_and_the_run_continues() {
    support::init_tracing();
    let unit = parse("def m = [a: 1, b: 2]\n");
    let pipeline = Pipeline::new(sequential())
        .with_recipe(ComplainRecipe)
        .with_recipe(VandalRecipe)
        .with_recipe(ChangeMapValue::new("b", 3));
    let result = pipeline.run(&unit, &mut ExecutionContext::new(sequential()));

    assert_eq!(text(&result.after), "def m = [a: 1, b: 3]\n");
    assert_eq!(result.errors.len(), 3);
    let recipes: Vec<_> = result
        .errors
        .iter()
        .map(|err| match err {
            RewriteError::Recipe { recipe, .. } => recipe.as_str(),
            other => panic!("unexpected error {other}"),
        })
        .collect();
    assert_eq!(recipes, ["complain", "complain", "vandal"]);
    assert_eq!(result.summary().errors.len(), 3);
    assert_eq!(result.after.id(), unit.id());
}
