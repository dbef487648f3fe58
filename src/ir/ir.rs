//! Expression, access path and function bundle definitions.
//!
//! Every node carries an annotation of type `A`. The parser produces
//! `Exp<Span>`; the type checker produces `Exp<Checked>`. Nodes are never
//! edited in place, checking builds a new tree.

use crate::Span;

use super::types::Ty;

/// Dense, globally unique identity of a source variable.
pub type VarId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prim {
    Add,
    Sub,
    Mul,
    Div,
}

impl Prim {
    pub fn name(&self) -> &'static str {
        match self {
            Prim::Add => "add",
            Prim::Sub => "sub",
            Prim::Mul => "mul",
            Prim::Div => "div",
        }
    }
}

/// Annotation carried by every node of a checked tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Checked {
    pub span: Span,
    pub ty: Ty,
    /// Whether the node's value is returned directly by the enclosing routine.
    pub tail: bool,
}

/// One step of an access path.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<A> {
    /// Constant offset into a tuple.
    Proj(u32),
    /// Constant offset into a fixed array.
    ElemA(u32),
    /// Variable offset into a vector.
    Elem(Exp<A>),
    /// Address computation through a pointer.
    Index(Exp<A>),
}

pub type Path<A> = Vec<Step<A>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Lit(i128),
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arm<A> {
    pub pattern: Pattern,
    pub body: Exp<A>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param<A> {
    pub ann: A,
    pub name: VarId,
    pub ty: Ty,
}

/// A member of a `rec` bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct Func<A> {
    pub ann: A,
    pub name: VarId,
    pub params: Vec<Param<A>>,
    pub ret: Ty,
    pub body: Exp<A>,
}

impl<A> Func<A> {
    /// The function-pointer type other code sees when referring to this member.
    pub fn fun_type(&self) -> Ty {
        Ty::fun(self.params.iter().map(|p| p.ty.clone()).collect(), self.ret.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exp<A> {
    pub ann: A,
    pub kind: ExpKind<A>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpKind<A> {
    Var(VarId),
    Int {
        value: i128,
        width: u32,
    },
    Ann(Box<Exp<A>>, Ty),
    Prim(Prim, Vec<Exp<A>>),
    /// Unchecked reinterpretation.
    Coerce(Box<Exp<A>>, Ty),
    Let {
        name: VarId,
        ty: Ty,
        value: Box<Exp<A>>,
        body: Box<Exp<A>>,
    },
    Call(Box<Exp<A>>, Vec<Exp<A>>),
    Case(Box<Exp<A>>, Vec<Arm<A>>),
    Rec(Vec<Func<A>>, Box<Exp<A>>),
    Tuple(Vec<Exp<A>>),
    Vector(Vec<Exp<A>>),
    Gep(Box<Exp<A>>, Path<A>),
    Load(Box<Exp<A>>, Path<A>),
    Store {
        dest: Box<Exp<A>>,
        path: Path<A>,
        value: Box<Exp<A>>,
        body: Box<Exp<A>>,
    },
    Update {
        base: Box<Exp<A>>,
        path: Path<A>,
        value: Box<Exp<A>>,
    },
}

impl<A> Exp<A> {
    pub fn new(ann: A, kind: ExpKind<A>) -> Self {
        Exp { ann, kind }
    }

    /// Rebuilds the tree with every annotation passed through `f`.
    ///
    /// Nodes are visited in source order, so `f` sees annotations in the
    /// same order the parser produced them.
    pub fn map_ann<B, F: FnMut(A) -> B>(self, f: &mut F) -> Exp<B> {
        let ann = f(self.ann);
        let kind = match self.kind {
            ExpKind::Var(id) => ExpKind::Var(id),
            ExpKind::Int { value, width } => ExpKind::Int { value, width },
            ExpKind::Ann(inner, ty) => ExpKind::Ann(Box::new(inner.map_ann(f)), ty),
            ExpKind::Prim(op, args) => ExpKind::Prim(op, map_all(args, f)),
            ExpKind::Coerce(inner, ty) => ExpKind::Coerce(Box::new(inner.map_ann(f)), ty),
            ExpKind::Let { name, ty, value, body } => ExpKind::Let {
                name,
                ty,
                value: Box::new(value.map_ann(f)),
                body: Box::new(body.map_ann(f)),
            },
            ExpKind::Call(callee, args) => {
                let callee = Box::new(callee.map_ann(f));
                ExpKind::Call(callee, map_all(args, f))
            }
            ExpKind::Case(scrutinee, arms) => {
                let scrutinee = Box::new(scrutinee.map_ann(f));
                let arms = arms
                    .into_iter()
                    .map(|arm| Arm { pattern: arm.pattern, body: arm.body.map_ann(f) })
                    .collect();
                ExpKind::Case(scrutinee, arms)
            }
            ExpKind::Rec(funcs, body) => {
                let funcs = funcs.into_iter().map(|func| func.map_ann(f)).collect();
                ExpKind::Rec(funcs, Box::new(body.map_ann(f)))
            }
            ExpKind::Tuple(elems) => ExpKind::Tuple(map_all(elems, f)),
            ExpKind::Vector(elems) => ExpKind::Vector(map_all(elems, f)),
            ExpKind::Gep(base, path) => {
                let base = Box::new(base.map_ann(f));
                ExpKind::Gep(base, map_path(path, f))
            }
            ExpKind::Load(base, path) => {
                let base = Box::new(base.map_ann(f));
                ExpKind::Load(base, map_path(path, f))
            }
            ExpKind::Store { dest, path, value, body } => {
                let dest = Box::new(dest.map_ann(f));
                let path = map_path(path, f);
                let value = Box::new(value.map_ann(f));
                ExpKind::Store { dest, path, value, body: Box::new(body.map_ann(f)) }
            }
            ExpKind::Update { base, path, value } => {
                let base = Box::new(base.map_ann(f));
                let path = map_path(path, f);
                ExpKind::Update { base, path, value: Box::new(value.map_ann(f)) }
            }
        };

        Exp { ann, kind }
    }
}

impl<A> Func<A> {
    pub fn map_ann<B, F: FnMut(A) -> B>(self, f: &mut F) -> Func<B> {
        let ann = f(self.ann);
        let params = self
            .params
            .into_iter()
            .map(|p| Param { ann: f(p.ann), name: p.name, ty: p.ty })
            .collect();

        Func { ann, name: self.name, params, ret: self.ret, body: self.body.map_ann(f) }
    }
}

fn map_all<A, B, F: FnMut(A) -> B>(exps: Vec<Exp<A>>, f: &mut F) -> Vec<Exp<B>> {
    exps.into_iter().map(|e| e.map_ann(f)).collect()
}

fn map_path<A, B, F: FnMut(A) -> B>(path: Path<A>, f: &mut F) -> Path<B> {
    path.into_iter()
        .map(|step| match step {
            Step::Proj(n) => Step::Proj(n),
            Step::ElemA(n) => Step::ElemA(n),
            Step::Elem(e) => Step::Elem(e.map_ann(f)),
            Step::Index(e) => Step::Index(e.map_ann(f)),
        })
        .collect()
}

impl<A> Exp<A> {
    /// Direct sub-expressions in source order, including bundle member
    /// bodies and path offsets.
    pub fn children(&self) -> Vec<&Exp<A>> {
        fn steps<A>(path: &Path<A>) -> impl Iterator<Item = &Exp<A>> {
            path.iter().filter_map(|step| match step {
                Step::Elem(e) | Step::Index(e) => Some(e),
                Step::Proj(_) | Step::ElemA(_) => None,
            })
        }

        match &self.kind {
            ExpKind::Var(_) | ExpKind::Int { .. } => vec![],
            ExpKind::Ann(inner, _) | ExpKind::Coerce(inner, _) => vec![&**inner],
            ExpKind::Prim(_, args) | ExpKind::Tuple(args) | ExpKind::Vector(args) => args.iter().collect(),
            ExpKind::Let { value, body, .. } => vec![&**value, &**body],
            ExpKind::Call(callee, args) => std::iter::once(&**callee).chain(args).collect(),
            ExpKind::Case(scrutinee, arms) => {
                std::iter::once(&**scrutinee).chain(arms.iter().map(|arm| &arm.body)).collect()
            }
            ExpKind::Rec(funcs, body) => funcs.iter().map(|f| &f.body).chain(std::iter::once(&**body)).collect(),
            ExpKind::Gep(base, path) | ExpKind::Load(base, path) => {
                std::iter::once(&**base).chain(steps(path)).collect()
            }
            ExpKind::Store { dest, path, value, body } => std::iter::once(&**dest)
                .chain(steps(path))
                .chain([&**value, &**body])
                .collect(),
            ExpKind::Update { base, path, value } => std::iter::once(&**base)
                .chain(steps(path))
                .chain(std::iter::once(&**value))
                .collect(),
        }
    }

    /// Identities introduced by this node: a let name, or a bundle's member
    /// names followed by every member's parameters.
    pub fn binders(&self) -> Vec<VarId> {
        match &self.kind {
            ExpKind::Let { name, .. } => vec![*name],
            ExpKind::Rec(funcs, _) => funcs
                .iter()
                .map(|f| f.name)
                .chain(funcs.iter().flat_map(|f| f.params.iter().map(|p| p.name)))
                .collect(),
            _ => vec![],
        }
    }
}

impl Exp<Checked> {
    pub fn ty(&self) -> &Ty {
        &self.ann.ty
    }
}
