//! Textual rendering of expressions.
//!
//! The output is valid surface syntax: parsing it again yields the same
//! tree (modulo spans). Variables are rendered as `v<identity>`. Forms that
//! extend to the right (`let`, `rec`, `store`) and the trailing forms are
//! always parenthesized so no precedence context is needed.

use std::fmt::{Display, Formatter, Result};

use super::{
    ir::{Arm, Exp, ExpKind, Func, Param, Pattern, Step},
    types::write_list,
};

/// Renders a variable identity the way the parser reads it back.
pub fn var_name(id: u32) -> String {
    format!("v{}", id)
}

impl<A> Display for Exp<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self.kind {
            ExpKind::Var(id) => write!(f, "{}", var_name(*id)),
            ExpKind::Int { value, width } => write!(f, "{}i{}", value, width),
            ExpKind::Ann(inner, ty) => write!(f, "({}: {})", inner, ty),
            ExpKind::Coerce(inner, ty) => write!(f, "({} as {})", inner, ty),
            ExpKind::Prim(op, args) => {
                write!(f, "{}(", op.name())?;
                write_list(f, args)?;
                write!(f, ")")
            }
            ExpKind::Let { name, ty, value, body } => {
                write!(f, "(let {}: {} = {} in {})", var_name(*name), ty, value, body)
            }
            ExpKind::Call(callee, args) => {
                write!(f, "{}(", callee)?;
                write_list(f, args)?;
                write!(f, ")")
            }
            ExpKind::Case(scrutinee, arms) => {
                write!(f, "case {} {{ ", scrutinee)?;
                write_list(f, arms)?;
                write!(f, " }}")
            }
            ExpKind::Rec(funcs, body) => {
                write!(f, "(rec ")?;
                for (i, func) in funcs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " and ")?;
                    }
                    write!(f, "{}", func)?;
                }
                write!(f, " in {})", body)
            }
            ExpKind::Tuple(elems) => {
                write!(f, "{{")?;
                write_list(f, elems)?;
                write!(f, "}}")
            }
            ExpKind::Vector(elems) => {
                write!(f, "<")?;
                write_list(f, elems)?;
                write!(f, ">")
            }
            ExpKind::Gep(base, path) => write!(f, "gep({}{})", base, PathDisplay(path)),
            ExpKind::Load(base, path) => write!(f, "load({}{})", base, PathDisplay(path)),
            ExpKind::Store { dest, path, value, body } => {
                write!(f, "(store {}{} = {} in {})", dest, PathDisplay(path), value, body)
            }
            ExpKind::Update { base, path, value } => {
                write!(f, "update({}{}, {})", base, PathDisplay(path), value)
            }
        }
    }
}

impl<A> Display for Arm<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.pattern {
            Pattern::Lit(value) => write!(f, "{} => {}", value, self.body),
            Pattern::Default => write!(f, "_ => {}", self.body),
        }
    }
}

impl<A> Display for Param<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}: {}", var_name(self.name), self.ty)
    }
}

impl<A> Display for Func<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}(", var_name(self.name))?;
        write_list(f, &self.params)?;
        write!(f, "): {} = {}", self.ret, self.body)
    }
}

struct PathDisplay<'a, A>(&'a [Step<A>]);

impl<A> Display for PathDisplay<'_, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for step in self.0 {
            match step {
                Step::Proj(n) => write!(f, " .{}", n)?,
                Step::ElemA(n) => write!(f, " [{}]", n)?,
                Step::Elem(e) => write!(f, " <{}>", e)?,
                Step::Index(e) => write!(f, " @{}", e)?,
            }
        }
        Ok(())
    }
}
