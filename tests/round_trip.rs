//! Round-trip tests: parsing then printing reproduces the source exactly.

mod support;

use std::fs;
use std::sync::Arc;

use support::fixtures::{parse, text, KindLog, NoOp};
use tugrewrite::padding::Identical;
use tugrewrite::visitor::run;
use tugrewrite::{parse_file, RewriteError, J};

const SOURCES: &[(&str, &str)] = &[
    ("empty", ""),
    ("whitespace only", "\n\n   \n"),
    ("comments only", "// one\n/* two */\n"),
    ("declaration", "def x = 1\n"),
    ("declaration without initializer", "def   x\n"),
    (
        "map with odd spacing",
        "def deps = [ group : 'org.example' ,name:'lib',  version: \"1.0\" ]\n",
    ),
    ("map with trailing comma", "def m = [a: 1, b: 2, ]\n"),
    ("multiline map", "def m = [\n    a: 1,\n    b: 2,\n]\n"),
    ("empty map", "def m = [:]\n"),
    ("empty list", "def l = []\ndef k = [  ]\n"),
    ("nested collections", "def l = [[1, 2], [a: [3]]]\n"),
    ("arithmetic", "def n = 1 + 2 * 3 -4 % 5\n"),
    ("comparison", "def b = a<=b != c  >  d\n"),
    ("groovy operators", "def f = name =~ 'x' ==~ 'y'\ndef g = 1 in [1]\n"),
    ("gstring", "def g = \"${group}:${ name }:$version\"\n"),
    ("gstring with escapes", "def g = \"cost: \\$5 for ${item}\\n\"\n"),
    ("ranges", "def r = 1..10\ndef s = 0 ..< size\n"),
    ("index access", "def v = versions['kotlin']\n"),
    ("field access", "def v = project.ext . kotlin\n"),
    ("field access with space after the dot", "def v = a. b\ndef w = a.\n    b\n"),
    (
        "class",
        "class Versions {\n    def kotlin = '1.9.0' // pinned\n\n    def junit = '5.10.0'\n}\n",
    ),
    ("nested class", "class A { class B { def c = 1 } }\n"),
    ("shebang", "#!/usr/bin/env groovy\nversion\n"),
    ("byte order mark", "\u{feff}def x = 1\n"),
    ("no trailing newline", "def x = [1, 2]"),
];

#[test]
fn parse_then_print_is_identity() {
    support::init_tracing();
    for (name, source) in SOURCES {
        let parsed = tugrewrite::parse_groovy("round_trip.groovy", source)
            .unwrap_or_else(|err| panic!("{name}: {err}"));
        assert_eq!(&text(&parsed), source, "{name}");
    }
}

#[test]
fn unsupported_syntax_is_a_parse_error() {
    for source in ["def x = (1)", "def f = /x/", "def = 1", "[a: 1, 2]"] {
        let err = tugrewrite::parse_groovy("bad.groovy", source).unwrap_err();
        assert!(matches!(err, RewriteError::Parse { .. }), "{source}: {err}");
    }
}

#[test]
fn noop_visitor_returns_the_same_tree() {
    for (name, source) in SOURCES {
        let unit = parse(source);
        let tree = J::CompilationUnit(Arc::clone(&unit));
        let after = run(&mut NoOp, &tree, &mut ());
        assert!(after.identical(&tree), "{name}");
    }
}

#[test]
fn traversal_reaches_every_node_in_source_order() {
    let unit = parse("def m = [a: 1]\n");
    let mut log = KindLog::default();
    run(&mut log, &J::CompilationUnit(unit), &mut ());
    assert_eq!(
        log.kinds,
        [
            "CompilationUnit",
            "VariableDeclaration",
            "Identifier",
            "MapLiteral",
            "MapEntry",
            "Identifier",
            "Literal",
        ]
    );
}

#[test]
fn parse_file_round_trips_and_records_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("build.gradle");
    let source = "def versions = [kotlin: '1.9.0']\n";
    fs::write(&path, source).unwrap();

    let unit = parse_file(&path).unwrap();
    assert_eq!(text(&unit), source);
    assert_eq!(unit.source_path(), path.as_path());
    assert!(unit.checksum().is_some());
    assert!(unit.file_attributes().is_some());
}

#[test]
fn parse_file_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_file(&dir.path().join("missing.gradle")).unwrap_err();
    assert!(matches!(err, RewriteError::Io(_)));
}
