use super::{
    ir::{Arm, Exp, ExpKind, Func, Param, Pattern, Prim, Step},
    types::{int_fits, FloatKind, PTy, Ty},
};

fn node(kind: ExpKind<()>) -> Exp<()> {
    Exp::new((), kind)
}

fn int(value: i128, width: u32) -> Exp<()> {
    node(ExpKind::Int { value, width })
}

fn var(id: u32) -> Exp<()> {
    node(ExpKind::Var(id))
}

#[test]
fn test_type_display() {
    let cases = [
        (Ty::Void, "void"),
        (Ty::int(64), "i64"),
        (Ty::float(FloatKind::Fp128), "fp128"),
        (Ty::ptr(Ty::ptr(Ty::int(8))), "&&i8"),
        (Ty::Vector(4, PTy::Float(FloatKind::Half)), "<4 x half>"),
        (Ty::Array(2, Box::new(Ty::Tuple(vec![]))), "[2 x {}]"),
        (Ty::Tuple(vec![Ty::int(1), Ty::float(FloatKind::Double)]), "{i1, double}"),
        (Ty::fun(vec![Ty::int(32), Ty::ptr(Ty::Void)], Ty::Void), "fun (i32, &void) -> void"),
    ];

    for (ty, text) in cases {
        assert_eq!(ty.to_string(), text);
    }
}

#[test]
fn test_type_equality_is_structural() {
    assert_eq!(Ty::ptr(Ty::int(32)), Ty::Prim(PTy::Ptr(Box::new(Ty::int(32)))));
    assert_ne!(Ty::int(32), Ty::int(64));
    assert_ne!(Ty::Vector(2, PTy::Int(8)), Ty::Array(2, Box::new(Ty::int(8))));
}

#[test]
fn test_type_queries() {
    assert_eq!(Ty::int(16).int_width(), Some(16));
    assert_eq!(Ty::float(FloatKind::Float).int_width(), None);
    assert!(Ty::float(FloatKind::Half).is_numeric());
    assert!(!Ty::ptr(Ty::int(8)).is_numeric());
    assert!(!Ty::Tuple(vec![Ty::int(8)]).is_numeric());
    assert_eq!(Ty::ptr(Ty::int(8)).pointee(), Some(&Ty::int(8)));
    assert_eq!(Ty::fun(vec![], Ty::Void).as_fun(), Some((&[][..], &Ty::Void)));
}

#[test]
fn test_int_fits() {
    assert!(int_fits(-128, 8));
    assert!(int_fits(255, 8));
    assert!(!int_fits(256, 8));
    assert!(!int_fits(-129, 8));
    assert!(int_fits(1, 1));
    assert!(int_fits(i128::MIN, 128));
    assert!(int_fits(i128::MAX, 127));
    assert!(int_fits(-(1i128 << 126), 127));
    assert!(!int_fits(i128::MIN, 127));
    assert!(!int_fits(-(1i128 << 126) - 1, 127));
    assert!(!int_fits(0, 0));
}

#[test]
fn test_expression_display() {
    let exp = node(ExpKind::Let {
        name: 0,
        ty: Ty::int(32),
        value: Box::new(int(-1, 32)),
        body: Box::new(node(ExpKind::Prim(Prim::Mul, vec![var(0), var(0)]))),
    });

    assert_eq!(exp.to_string(), "(let v0: i32 = -1i32 in mul(v0, v0))");
}

#[test]
fn test_trailing_forms_display() {
    let call = node(ExpKind::Call(Box::new(var(3)), vec![int(1, 8), int(2, 8)]));
    let coerced = node(ExpKind::Coerce(Box::new(call), Ty::ptr(Ty::int(8))));
    let ascribed = node(ExpKind::Ann(Box::new(coerced), Ty::ptr(Ty::int(8))));

    assert_eq!(ascribed.to_string(), "((v3(1i8, 2i8) as &i8): &i8)");
}

#[test]
fn test_case_and_rec_display() {
    let func = Func {
        ann: (),
        name: 0,
        params: vec![Param { ann: (), name: 1, ty: Ty::int(32) }],
        ret: Ty::int(32),
        body: node(ExpKind::Case(
            Box::new(var(1)),
            vec![
                Arm { pattern: Pattern::Lit(0), body: int(1, 32) },
                Arm { pattern: Pattern::Default, body: var(1) },
            ],
        )),
    };
    let exp = node(ExpKind::Rec(vec![func], Box::new(var(0))));

    assert_eq!(exp.to_string(), "(rec v0(v1: i32): i32 = case v1 { 0 => 1i32, _ => v1 } in v0)");
}

#[test]
fn test_path_display() {
    let path = vec![Step::Index(int(0, 64)), Step::Proj(1), Step::ElemA(2), Step::Elem(var(4))];
    let load = node(ExpKind::Load(Box::new(var(3)), path.clone()));
    let store = node(ExpKind::Store {
        dest: Box::new(var(3)),
        path,
        value: Box::new(int(7, 8)),
        body: Box::new(node(ExpKind::Tuple(vec![]))),
    });
    let update = node(ExpKind::Update {
        base: Box::new(var(5)),
        path: vec![Step::Proj(0)],
        value: Box::new(node(ExpKind::Vector(vec![int(1, 8)]))),
    });

    assert_eq!(load.to_string(), "load(v3 @0i64 .1 [2] <v4>)");
    assert_eq!(store.to_string(), "(store v3 @0i64 .1 [2] <v4> = 7i8 in {})");
    assert_eq!(update.to_string(), "update(v5 .0, <1i8>)");
    assert_eq!(node(ExpKind::Gep(Box::new(var(3)), vec![])).to_string(), "gep(v3)");
}

#[test]
fn test_map_ann_visits_in_source_order() {
    let exp = node(ExpKind::Prim(
        Prim::Add,
        vec![int(1, 8), node(ExpKind::Tuple(vec![int(2, 8), int(3, 8)]))],
    ));

    let mut counter = 0;
    let numbered = exp.map_ann(&mut |()| {
        counter += 1;
        counter
    });

    assert_eq!(numbered.ann, 1);
    let ExpKind::Prim(_, args) = &numbered.kind else { panic!("expected prim") };
    assert_eq!(args[0].ann, 2);
    assert_eq!(args[1].ann, 3);
    let ExpKind::Tuple(elems) = &args[1].kind else { panic!("expected tuple") };
    assert_eq!(elems.iter().map(|e| e.ann).collect::<Vec<_>>(), vec![4, 5]);
}

#[test]
fn test_children_and_binders() {
    let func = Func {
        ann: (),
        name: 1,
        params: vec![Param { ann: (), name: 2, ty: Ty::int(8) }, Param { ann: (), name: 3, ty: Ty::int(8) }],
        ret: Ty::int(8),
        body: var(2),
    };
    let rec = node(ExpKind::Rec(vec![func], Box::new(var(1))));
    assert_eq!(rec.binders(), vec![1, 2, 3]);
    assert_eq!(rec.children().len(), 2);

    let store = node(ExpKind::Store {
        dest: Box::new(var(0)),
        path: vec![Step::Proj(0), Step::Index(var(4))],
        value: Box::new(int(1, 8)),
        body: Box::new(var(5)),
    });
    let children = store.children().into_iter().map(|c| c.to_string()).collect::<Vec<_>>();
    assert_eq!(children, vec!["v0", "v4", "1i8", "v5"]);
    assert!(store.binders().is_empty());
}
