use super::var_space::VarSpace;
use crate::Position;

#[test]
fn test_bind_allocates_dense_identities() {
    let mut vars = VarSpace::new();

    assert!(vars.is_empty());
    assert_eq!(vars.bind("x"), 0);
    assert_eq!(vars.bind("y"), 1);
    assert_eq!(vars.bind("z"), 2);
    assert_eq!(vars.len(), 3);
}

#[test]
fn test_resolve_is_stable() {
    let mut vars = VarSpace::new();
    let x = vars.bind("x");

    assert_eq!(vars.resolve("x", Position::null()).unwrap(), x);
    assert_eq!(vars.resolve("x", Position::null()).unwrap(), x);
    assert_eq!(vars.len(), 1);
}

#[test]
fn test_resolve_unbound_fails_at_position() {
    let vars = VarSpace::new();
    let position = Position(17, std::rc::Rc::new("scope.phi".to_string()));

    let error = vars.resolve("ghost", position).unwrap_err();
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
    assert_eq!(error.get_position().0, 17);
    assert_eq!(error.to_string(), "variable \"ghost\" not in scope");
}

#[test]
fn test_nested_binder_shadows() {
    let mut vars = VarSpace::new();
    let outer = vars.bind("x");

    vars.push_scope();
    let inner = vars.bind("x");
    assert_ne!(outer, inner);
    assert_eq!(vars.resolve("x", Position::null()).unwrap(), inner);
    vars.pop_scope();

    assert_eq!(vars.resolve("x", Position::null()).unwrap(), outer);
}

#[test]
fn test_popped_bindings_are_gone() {
    let mut vars = VarSpace::new();

    vars.push_scope();
    vars.bind("tmp");
    vars.pop_scope();

    assert!(vars.resolve("tmp", Position::null()).is_err());
    // The identity stays allocated
    assert_eq!(vars.name_of(0), Some("tmp"));
}

#[test]
fn test_outermost_scope_survives_pop() {
    let mut vars = VarSpace::new();
    vars.bind("x");

    vars.pop_scope();
    assert_eq!(vars.depth(), 1);
    assert!(vars.resolve("x", Position::null()).is_ok());
}
