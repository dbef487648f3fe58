use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    errors::errors::{Error, ErrorImpl},
    ir::{
        ir::{Arm, Checked, Exp, ExpKind, Func, Param, Path, Pattern, Step, VarId},
        types::{int_fits, Ty},
    },
    Position, Span,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub ty: Ty,
    /// Set for bindings that must lower to branch targets. The checker
    /// itself never sets it; see the lowering analysis.
    pub branch_target: bool,
}

/// Bindings visible to an expression plus the ambient tail flag.
///
/// Extending returns a new environment, so a binding added for one
/// sub-expression is never seen by its siblings.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    variable_lookup: Rc<HashMap<VarId, Binding>>,
    pub tail: bool,
}

impl Environment {
    pub fn new(tail: bool) -> Self {
        Environment {
            variable_lookup: Rc::new(HashMap::new()),
            tail,
        }
    }

    pub fn get_variable(&self, id: VarId) -> Option<&Binding> {
        self.variable_lookup.get(&id)
    }

    pub fn declare_variable(&self, id: VarId, ty: Ty) -> Environment {
        self.declare_variables([(id, ty)])
    }

    pub fn declare_variables(&self, variables: impl IntoIterator<Item = (VarId, Ty)>) -> Environment {
        let mut lookup = (*self.variable_lookup).clone();
        for (id, ty) in variables {
            lookup.insert(id, Binding { ty, branch_target: false });
        }

        Environment {
            variable_lookup: Rc::new(lookup),
            tail: self.tail,
        }
    }

    pub fn with_tail(&self, tail: bool) -> Environment {
        Environment {
            variable_lookup: Rc::clone(&self.variable_lookup),
            tail,
        }
    }

    /// The environment for an operand whose value is consumed by its parent.
    pub fn operand(&self) -> Environment {
        self.with_tail(false)
    }
}

fn annotate(env: &Environment, span: &Span, ty: Ty) -> Checked {
    Checked {
        span: span.clone(),
        ty,
        tail: env.tail,
    }
}

fn position(exp: &Exp<Span>) -> Position {
    exp.ann.start.clone()
}

/// Checks a whole program.
///
/// The program is the body of the implicit entry routine, so its root is in
/// tail position.
#[tracing::instrument(level = "debug", skip_all)]
pub fn type_check(program: &Exp<Span>) -> Result<Exp<Checked>, Error> {
    let checked = infer_expr(&Environment::new(true), program)?;
    debug!(ty = %checked.ty(), "type checked");

    Ok(checked)
}

/// Verifies that `exp` has type `expected`.
pub fn check_expr(env: &Environment, exp: &Exp<Span>, expected: &Ty) -> Result<Exp<Checked>, Error> {
    if let ExpKind::Case(scrutinee, arms) = &exp.kind {
        return check_case(env, exp, scrutinee, arms, Some(expected));
    }

    let checked = infer_expr(env, exp)?;
    if checked.ty() != expected {
        return Err(Error::new(
            ErrorImpl::TypeMismatch {
                expected: expected.clone(),
                received: checked.ty().clone(),
            },
            position(exp),
        ));
    }

    Ok(checked)
}

/// Computes the type of `exp`; the type is recorded in the returned tree.
pub fn infer_expr(env: &Environment, exp: &Exp<Span>) -> Result<Exp<Checked>, Error> {
    let (ty, kind) = match &exp.kind {
        ExpKind::Var(id) => match env.get_variable(*id) {
            Some(binding) => (binding.ty.clone(), ExpKind::Var(*id)),
            None => return Err(Error::new(ErrorImpl::NotInScope { id: *id }, position(exp))),
        },
        ExpKind::Int { value, width } => (
            Ty::int(*width),
            ExpKind::Int {
                value: *value,
                width: *width,
            },
        ),
        ExpKind::Ann(inner, ty) => {
            // Ascription is transparent, the inner expression keeps our tail position
            let inner = check_expr(env, inner, ty)?;
            (ty.clone(), ExpKind::Ann(Box::new(inner), ty.clone()))
        }
        ExpKind::Prim(op, args) => {
            let Some((first, rest)) = args.split_first() else {
                return Err(Error::new(
                    ErrorImpl::custom(format!("`{}` needs at least one argument", op.name())),
                    position(exp),
                ));
            };

            let operands = env.operand();
            let first = infer_expr(&operands, first)?;
            let ty = first.ty().clone();
            if !ty.is_numeric() {
                return Err(Error::new(ErrorImpl::shape("numeric type", &ty), first.ann.span.start.clone()));
            }

            let mut checked = vec![first];
            for arg in rest {
                checked.push(check_expr(&operands, arg, &ty)?);
            }

            (ty, ExpKind::Prim(*op, checked))
        }
        ExpKind::Coerce(inner, ty) => {
            // The type of `inner` is not compared with the target
            let inner = infer_expr(&env.operand(), inner)?;
            (ty.clone(), ExpKind::Coerce(Box::new(inner), ty.clone()))
        }
        ExpKind::Let { name, ty, value, body } => {
            let value = check_expr(&env.operand(), value, ty)?;
            let body = infer_expr(&env.declare_variable(*name, ty.clone()), body)?;

            (
                body.ty().clone(),
                ExpKind::Let {
                    name: *name,
                    ty: ty.clone(),
                    value: Box::new(value),
                    body: Box::new(body),
                },
            )
        }
        ExpKind::Call(callee, args) => {
            let operands = env.operand();
            let callee = infer_expr(&operands, callee)?;
            let Some((params, ret)) = callee.ty().as_fun().map(|(p, r)| (p.to_vec(), r.clone())) else {
                return Err(Error::new(ErrorImpl::shape("function", callee.ty()), callee.ann.span.start.clone()));
            };

            if params.len() != args.len() {
                return Err(Error::new(
                    ErrorImpl::ArityMismatch {
                        expected: params.len(),
                        received: args.len(),
                    },
                    position(exp),
                ));
            }

            let args = params
                .iter()
                .zip(args)
                .map(|(param, arg)| check_expr(&operands, arg, param))
                .collect::<Result<Vec<_>, _>>()?;

            (ret, ExpKind::Call(Box::new(callee), args))
        }
        ExpKind::Case(scrutinee, arms) => return check_case(env, exp, scrutinee, arms, None),
        ExpKind::Rec(funcs, body) => {
            let bundle = env.declare_variables(funcs.iter().map(|f| (f.name, f.fun_type())));
            let funcs = funcs
                .iter()
                .map(|func| check_func(&bundle, func))
                .collect::<Result<Vec<_>, _>>()?;
            let body = infer_expr(&bundle, body)?;

            (body.ty().clone(), ExpKind::Rec(funcs, Box::new(body)))
        }
        ExpKind::Tuple(elems) => {
            let operands = env.operand();
            let elems = elems
                .iter()
                .map(|elem| infer_expr(&operands, elem))
                .collect::<Result<Vec<_>, _>>()?;

            (Ty::Tuple(elems.iter().map(|e| e.ty().clone()).collect()), ExpKind::Tuple(elems))
        }
        ExpKind::Vector(elems) => {
            let Some((first, rest)) = elems.split_first() else {
                return Err(Error::new(ErrorImpl::custom("vector needs at least one element"), position(exp)));
            };

            let operands = env.operand();
            let first = infer_expr(&operands, first)?;
            let Some(prim) = first.ty().as_prim().cloned() else {
                return Err(Error::new(ErrorImpl::shape("primitive type", first.ty()), first.ann.span.start.clone()));
            };

            let elem_ty = Ty::from(prim.clone());
            let mut checked = vec![first];
            for elem in rest {
                checked.push(check_expr(&operands, elem, &elem_ty)?);
            }

            (Ty::Vector(checked.len() as u32, prim), ExpKind::Vector(checked))
        }
        ExpKind::Gep(base, path) => {
            let (base, target, path) = pointer_target(env, exp, base, path)?;
            (Ty::ptr(target), ExpKind::Gep(Box::new(base), path))
        }
        ExpKind::Load(base, path) => {
            let (base, target, path) = pointer_target(env, exp, base, path)?;
            (target, ExpKind::Load(Box::new(base), path))
        }
        ExpKind::Store { dest, path, value, body } => {
            let (dest, target, path) = pointer_target(env, exp, dest, path)?;
            let value = check_expr(&env.operand(), value, &target)?;
            let body = infer_expr(env, body)?;

            (
                body.ty().clone(),
                ExpKind::Store {
                    dest: Box::new(dest),
                    path,
                    value: Box::new(value),
                    body: Box::new(body),
                },
            )
        }
        ExpKind::Update { base, path, value } => {
            let operands = env.operand();
            let base = infer_expr(&operands, base)?;
            // Memory behind a pointer changes only through `store`
            if base.ty().pointee().is_some() {
                return Err(Error::new(ErrorImpl::shape("aggregate", base.ty()), base.ann.span.start.clone()));
            }
            if let Some(Step::Index(offset)) = path.iter().find(|step| matches!(step, Step::Index(_))) {
                return Err(Error::new(
                    ErrorImpl::custom("update path cannot step through a pointer with `@`"),
                    position(offset),
                ));
            }
            let (target, path) = resolve_path(&operands, base.ty().clone(), path, &position(exp))?;
            let value = check_expr(&operands, value, &target)?;

            (
                base.ty().clone(),
                ExpKind::Update {
                    base: Box::new(base),
                    path,
                    value: Box::new(value),
                },
            )
        }
    };

    Ok(Exp::new(annotate(env, &exp.ann, ty), kind))
}

fn check_func(bundle: &Environment, func: &Func<Span>) -> Result<Func<Checked>, Error> {
    // A body is the tail of its own routine, wherever the bundle sits
    let scope = bundle
        .declare_variables(func.params.iter().map(|p| (p.name, p.ty.clone())))
        .with_tail(true);
    let body = check_expr(&scope, &func.body, &func.ret)?;

    let params = func
        .params
        .iter()
        .map(|p| Param {
            ann: Checked {
                span: p.ann.clone(),
                ty: p.ty.clone(),
                tail: false,
            },
            name: p.name,
            ty: p.ty.clone(),
        })
        .collect();

    Ok(Func {
        ann: Checked {
            span: func.ann.clone(),
            ty: func.fun_type(),
            tail: false,
        },
        name: func.name,
        params,
        ret: func.ret.clone(),
        body,
    })
}

/// Checks a case; with `expected` every arm is checked against it, otherwise
/// the first arm decides the type of the rest.
fn check_case(
    env: &Environment,
    exp: &Exp<Span>,
    scrutinee: &Exp<Span>,
    arms: &[Arm<Span>],
    expected: Option<&Ty>,
) -> Result<Exp<Checked>, Error> {
    let scrutinee = infer_expr(&env.operand(), scrutinee)?;
    let Some(width) = scrutinee.ty().int_width() else {
        return Err(Error::new(ErrorImpl::shape("integer", scrutinee.ty()), scrutinee.ann.span.start.clone()));
    };

    if arms.is_empty() {
        return Err(Error::new(ErrorImpl::custom("case needs at least one arm"), position(exp)));
    }

    let mut seen = vec![];
    let mut result_ty = expected.cloned();
    let mut checked = vec![];

    for arm in arms {
        if let Pattern::Lit(value) = arm.pattern {
            if !int_fits(value, width) {
                return Err(Error::new(
                    ErrorImpl::custom(format!("case pattern {} does not fit i{}", value, width)),
                    position(&arm.body),
                ));
            }
            if seen.contains(&value) {
                return Err(Error::new(
                    ErrorImpl::custom(format!("duplicate case pattern {}", value)),
                    position(&arm.body),
                ));
            }
            seen.push(value);
        }

        let body = match &result_ty {
            Some(ty) => check_expr(env, &arm.body, ty)?,
            None => {
                let body = infer_expr(env, &arm.body)?;
                result_ty = Some(body.ty().clone());
                body
            }
        };

        checked.push(Arm {
            pattern: arm.pattern,
            body,
        });
    }

    let ty = result_ty.unwrap_or(Ty::Void);
    Ok(Exp::new(annotate(env, &exp.ann, ty), ExpKind::Case(Box::new(scrutinee), checked)))
}

/// Checks a pointer base and finds the type its path addresses.
fn pointer_target(
    env: &Environment,
    exp: &Exp<Span>,
    base: &Exp<Span>,
    path: &Path<Span>,
) -> Result<(Exp<Checked>, Ty, Path<Checked>), Error> {
    let operands = env.operand();
    let base = infer_expr(&operands, base)?;
    let Some(pointee) = base.ty().pointee().cloned() else {
        return Err(Error::new(ErrorImpl::shape("pointer", base.ty()), base.ann.span.start.clone()));
    };

    if path.is_empty() {
        return Ok((base, pointee, vec![]));
    }

    let (target, path) = resolve_path(&operands, base.ty().clone(), path, &position(exp))?;
    Ok((base, target, path))
}

/// Walks `path` left to right starting from `start`. An `@` step is only
/// accepted first, where it steps over the base pointer.
///
/// Constant-offset errors are reported at `at`, the position of the
/// expression owning the path.
pub fn resolve_path(
    env: &Environment,
    start: Ty,
    path: &Path<Span>,
    at: &Position,
) -> Result<(Ty, Path<Checked>), Error> {
    let mut current = start;
    let mut checked = vec![];

    for (i, step) in path.iter().enumerate() {
        let (next, step) = match step {
            Step::Proj(n) => {
                let Ty::Tuple(fields) = &current else {
                    return Err(Error::new(ErrorImpl::shape("tuple", &current), at.clone()));
                };
                let Some(field) = fields.get(*n as usize) else {
                    return Err(Error::new(
                        ErrorImpl::custom(format!("field .{} out of range for {}", n, current)),
                        at.clone(),
                    ));
                };

                (field.clone(), Step::Proj(*n))
            }
            Step::ElemA(n) => {
                let Ty::Array(len, elem) = &current else {
                    return Err(Error::new(ErrorImpl::shape("array", &current), at.clone()));
                };
                if n >= len {
                    return Err(Error::new(
                        ErrorImpl::custom(format!("element [{}] out of range for {}", n, current)),
                        at.clone(),
                    ));
                }

                ((**elem).clone(), Step::ElemA(*n))
            }
            Step::Elem(offset) => {
                let Ty::Vector(_, elem) = &current else {
                    return Err(Error::new(ErrorImpl::shape("vector", &current), position(offset)));
                };
                let elem = Ty::from(elem.clone());

                (elem, Step::Elem(check_offset(env, offset)?))
            }
            Step::Index(offset) => {
                // Only the base pointer is stepped over; going deeper needs a load
                if i > 0 {
                    return Err(Error::new(
                        ErrorImpl::custom("`@` step must come first in a path"),
                        position(offset),
                    ));
                }
                let Some(pointee) = current.pointee().cloned() else {
                    return Err(Error::new(ErrorImpl::shape("pointer", &current), position(offset)));
                };

                (pointee, Step::Index(check_offset(env, offset)?))
            }
        };

        current = next;
        checked.push(step);
    }

    Ok((current, checked))
}

/// Offsets may be of any integer width.
fn check_offset(env: &Environment, offset: &Exp<Span>) -> Result<Exp<Checked>, Error> {
    let offset = infer_expr(env, offset)?;
    if offset.ty().int_width().is_none() {
        return Err(Error::new(ErrorImpl::shape("integer", offset.ty()), offset.ann.span.start.clone()));
    }

    Ok(offset)
}
