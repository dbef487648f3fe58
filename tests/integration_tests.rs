//! Integration tests for the complete front end.
//!
//! These tests run source text through tokenization, parsing, type checking
//! and the lowering analysis, and verify rendered diagnostics and that
//! rendered programs parse back to the same checked tree.

use std::rc::Rc;

use phic::{
    check_source,
    errors::errors::Error,
    ir::{
        ir::{Checked, Exp},
        types::Ty,
    },
    lexer::lexer::tokenize,
    lowering::lowering::{analyze, LoweringFacts},
    parser::parser::parse,
    render_diagnostic,
    type_checker::type_checker::type_check,
};
use pretty_assertions::assert_eq;

fn check(source: &str) -> Result<Exp<Checked>, Error> {
    let tokens = tokenize(source.to_string(), Some("test.phi".to_string()))?;
    let (_, ast) = parse(tokens, Rc::new("test.phi".to_string()));
    type_check(&ast?)
}

fn lower(source: &str) -> Result<LoweringFacts, Error> {
    analyze(&check(source)?)
}

/// The checked tree without source positions.
fn shape(checked: Exp<Checked>) -> Exp<(Ty, bool)> {
    checked.map_ann(&mut |ann: Checked| (ann.ty, ann.tail))
}

const PROGRAMS: &[&str] = &[
    "let x: i32 = 1i32 in add(x, x)",
    "rec even(n: i32): i8 = case n { 0 => 1i8, _ => odd(sub(n, 1i32)) } \
     and odd(n: i32): i8 = case n { 0 => 0i8, _ => even(sub(n, 1i32)) } \
     in even(10i32)",
    "rec f(p: &{i32, [2 x <4 x i8>]}, i: i32): i8 = load(p @0i64 .1 [1] <i>) in f",
    "rec f(p: &{i32}, t: {i32, i8}): {i32, i8} = store p @0i64 .0 = 1i32 in update(t .1, -3i8) in f",
    "{(1i32 as &i32) : &i32, <1i8, 2i8>, gep((0i64 as &{double}) @1i64 .0)}",
    "let y: i8 = 5i8 in case y { -1 => {y}, 0 => {1i8}, _ => {div(y, 2i8)} }",
    "rec outer(x: i32): i32 = \
     (rec inner(n: i32): i32 = case n { 0 => x, _ => inner(sub(n, 1i32)) } in inner(x)) \
     in let x: i32 = outer(3i32) in mul(x, x)",
    "let f: fun (i32) -> i32 = (rec id(x: i32): i32 = x in id) in f(1i32) // trailing comment",
];

#[test]
fn test_programs_check() {
    for source in PROGRAMS {
        assert!(check(source).is_ok(), "{} should check: {:?}", source, check(source).err());
    }
}

#[test]
fn test_round_trip() {
    for source in PROGRAMS {
        let checked = check(source).unwrap();
        let rendered = checked.to_string();
        let rechecked = check(&rendered).unwrap_or_else(|e| panic!("{} failed to re-check: {}", rendered, e));

        assert_eq!(rechecked.to_string(), rendered);
        assert_eq!(shape(rechecked), shape(checked));
    }
}

#[test]
fn test_check_preserves_types_in_every_node() {
    let checked = check("let x: i64 = mul(2i64, 3i64) in {x, add(x, 1i64)}").unwrap();
    let expected = Ty::Tuple(vec![Ty::int(64), Ty::int(64)]);

    assert_eq!(checked.ty(), &expected);
    assert_eq!(
        checked.to_string(),
        "(let v0: i64 = mul(2i64, 3i64) in {v0, add(v0, 1i64)})"
    );
}

#[test]
fn test_rendered_diagnostics() {
    let cases = [
        ("let x: int = 1i32 in x", "main.phi:1:8: unknown type \"int\""),
        ("add(1i32,\n y)", "main.phi:2:2: variable \"y\" not in scope"),
        ("case (1i64 as &i32) { _ => 0i32 }", "main.phi:1:7: expected integer, got &i32"),
        ("(1i32)(2i32)", "main.phi:1:2: expected function, got i32"),
        ("add(1i32, 2i64)", "main.phi:1:11: type mismatch: expected i32, got i64"),
        ("// header\nlet x: i8 = 300i8 in x", "main.phi:2:13: error parsing number: \"300i8\""),
        ("add(1i32", "main.phi:1:9: unexpected token: \"EOF\""),
    ];

    for (source, expected) in cases {
        assert_eq!(check_source("main.phi", source).unwrap_err(), expected);
    }
}

#[test]
fn test_render_diagnostic_matches_check_source() {
    let source = "rec f(x: i32): i32 = x in f(1i32, 2i32)";
    let error = check(source).unwrap_err();

    let mut rendered = render_diagnostic(&error, source);
    rendered = rendered.replacen("test.phi", "main.phi", 1);
    assert_eq!(rendered, check_source("main.phi", source).unwrap_err());
    assert_eq!(rendered, "main.phi:1:27: wrong number of arguments: expected 1, received 2");
}

#[test]
fn test_lowering_end_to_end() {
    let facts = lower(PROGRAMS[6]).unwrap();

    // outer = v0, x = v1, inner = v2, n = v3
    let targets = facts.branch_targets().map(|m| (m.name, m.needs.clone())).collect::<Vec<_>>();
    assert_eq!(targets, vec![(2, vec![1])]);
    assert!(!facts.get(0).unwrap().is_branch_target());
}

#[test]
fn test_lowering_rejects_captured_non_tail_call() {
    let source = "let y: i32 = 1i32 in rec f(x: i32): i32 = add(x, y) in {f(1i32)}";
    let error = lower(source).unwrap_err();

    assert_eq!(error.get_error_name(), "NonTailCall");
    assert_eq!(
        render_diagnostic(&error, source),
        "test.phi:1:57: call to branch-target function v1 is not in tail position"
    );
}

#[test]
fn test_programs_without_bundles_have_no_facts() {
    assert!(lower("let x: i32 = 1i32 in add(x, x)").unwrap().members.is_empty());
}
