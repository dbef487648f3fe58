use std::rc::Rc;

use super::lowering::{analyze, free_vars, LoweringFacts, MemberFacts};
use crate::{
    errors::errors::Error, ir::ir::ExpKind, lexer::lexer::tokenize, parser::parser::parse,
    type_checker::type_checker::type_check,
};

fn lower(source: &str) -> Result<LoweringFacts, Error> {
    let tokens = tokenize(source.to_string(), Some("test.phi".to_string())).unwrap();
    let (_, ast) = parse(tokens, Rc::new("test.phi".to_string()));
    let checked = type_check(&ast.unwrap()).unwrap();
    analyze(&checked)
}

fn member(name: u32, needs: &[u32]) -> MemberFacts {
    MemberFacts {
        name,
        needs: needs.to_vec(),
    }
}

#[test]
fn test_independent_function_is_routine() {
    let facts = lower("rec f(x: i32): i32 = x in add(f(1i32), 1i32)").unwrap();

    assert_eq!(facts.members, vec![member(0, &[])]);
    assert!(!facts.members[0].is_branch_target());
    assert_eq!(facts.branch_targets().count(), 0);
}

#[test]
fn test_captured_variable_makes_branch_target() {
    // y = v0, f = v1, x = v2
    let facts = lower("let y: i32 = 1i32 in rec f(x: i32): i32 = add(x, y) in f(2i32)").unwrap();

    assert_eq!(facts.get(1), Some(&member(1, &[0])));
    assert!(facts.get(1).unwrap().is_branch_target());
}

#[test]
fn test_needs_propagate_through_bundle_calls() {
    // y = v0, f = v1, g = v2, x = v3, z = v4
    let source = "let y: i32 = 1i32 in \
                  rec f(x: i32): i32 = g(x) and g(z: i32): i32 = add(z, y) \
                  in f(2i32)";
    let facts = lower(source).unwrap();

    assert_eq!(facts.members, vec![member(1, &[0]), member(2, &[0])]);
}

#[test]
fn test_needs_are_sorted_and_deduplicated() {
    // a = v0, b = v1, f = v2, g = v3, x = v4, z = v5
    let source = "let a: i32 = 1i32 in let b: i32 = 2i32 in \
                  rec f(x: i32): i32 = g(add(x, b)) and g(z: i32): i32 = add(z, a, b) \
                  in 0i32";
    let facts = lower(source).unwrap();

    assert_eq!(facts.members, vec![member(2, &[0, 1]), member(3, &[0, 1])]);
}

#[test]
fn test_calls_to_plain_routines_do_not_capture() {
    // h = v0, a = v1, f = v2, x = v3
    let facts = lower("rec h(a: i32): i32 = a in rec f(x: i32): i32 = h(x) in f(1i32)").unwrap();

    assert_eq!(facts.members, vec![member(0, &[]), member(2, &[])]);
}

#[test]
fn test_nested_bundle_capturing_parameter() {
    // outer = v0, x = v1, inner = v2, n = v3
    let source = "rec outer(x: i32): i32 = \
                  rec inner(n: i32): i32 = add(n, x) in inner(1i32) \
                  in outer(2i32)";
    let facts = lower(source).unwrap();

    assert_eq!(facts.members, vec![member(0, &[]), member(2, &[1])]);
}

#[test]
fn test_tail_recursive_branch_target() {
    let source = "let y: i32 = 1i32 in \
                  rec loop(n: i32): i32 = case n { 0 => y, _ => loop(sub(n, 1i32)) } \
                  in loop(10i32)";
    let facts = lower(source).unwrap();

    assert_eq!(facts.branch_targets().map(|m| m.name).collect::<Vec<_>>(), vec![1]);
}

#[test]
fn test_non_tail_call_rejected() {
    let source = "let y: i32 = 1i32 in rec f(x: i32): i32 = add(x, y) in add(f(2i32), 1i32)";
    let error = lower(source).unwrap_err();

    assert_eq!(error.get_error_name(), "NonTailCall");
    assert_eq!(error.message(), "call to branch-target function v1 is not in tail position");
    assert_eq!(error.get_position().0, 59);
}

#[test]
fn test_non_tail_self_call_rejected() {
    let source = "let y: i32 = 1i32 in \
                  rec loop(n: i32): i32 = case n { 0 => y, _ => add(loop(sub(n, 1i32)), 1i32) } \
                  in loop(10i32)";

    assert_eq!(lower(source).unwrap_err().get_error_name(), "NonTailCall");
}

#[test]
fn test_escaping_branch_target_rejected() {
    let source = "let y: i32 = 1i32 in \
                  rec f(x: i32): i32 = add(x, y) \
                  in let g: fun (i32) -> i32 = f in 0i32";
    let error = lower(source).unwrap_err();

    assert_eq!(error.get_error_name(), "EscapingBranchTarget");
    assert_eq!(error.message(), "branch-target function v1 used as a value");
}

#[test]
fn test_routines_may_be_used_as_values() {
    let facts = lower("rec f(x: i32): i32 = x in let g: fun (i32) -> i32 = f in g(1i32)").unwrap();

    assert_eq!(facts.members, vec![member(0, &[])]);
}

#[test]
fn test_free_vars_skip_inner_binders() {
    let tokens = tokenize(
        "let a: i32 = 1i32 in rec f(x: i32): i32 = let b: i32 = x in add(a, b) in 0i32".to_string(),
        None,
    )
    .unwrap();
    let (_, ast) = parse(tokens, Rc::new("shell".to_string()));
    let checked = type_check(&ast.unwrap()).unwrap();

    assert!(free_vars(&checked).is_empty());

    let ExpKind::Let { body, .. } = &checked.kind else { panic!("expected let") };
    let ExpKind::Rec(funcs, _) = &body.kind else { panic!("expected rec") };
    // a = v0, f = v1, x = v2, b = v3
    assert_eq!(free_vars(&funcs[0].body).into_iter().collect::<Vec<_>>(), vec![0, 2]);
}
