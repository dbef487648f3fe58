use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::{
    errors::errors::{Error, ErrorImpl},
    ir::ir::{Checked, Exp, ExpKind, Func, VarId},
};

/// How one bundle member is lowered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFacts {
    pub name: VarId,
    /// Variables from outside the bundle the member depends on, sorted.
    /// Empty for plain routines.
    pub needs: Vec<VarId>,
}

impl MemberFacts {
    pub fn is_branch_target(&self) -> bool {
        !self.needs.is_empty()
    }
}

/// Classification of every bundle member of a program, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoweringFacts {
    pub members: Vec<MemberFacts>,
}

impl LoweringFacts {
    pub fn get(&self, name: VarId) -> Option<&MemberFacts> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn branch_targets(&self) -> impl Iterator<Item = &MemberFacts> {
        self.members.iter().filter(|m| m.is_branch_target())
    }
}

/// Variables referenced in `exp` that no binder inside `exp` introduces.
///
/// Identities are unique per binder, so anything bound somewhere inside
/// `exp` is bound at each of its uses.
pub fn free_vars(exp: &Exp<Checked>) -> BTreeSet<VarId> {
    fn walk(exp: &Exp<Checked>, refs: &mut BTreeSet<VarId>, bound: &mut BTreeSet<VarId>) {
        if let ExpKind::Var(id) = exp.kind {
            refs.insert(id);
        }
        bound.extend(exp.binders());
        for child in exp.children() {
            walk(child, refs, bound);
        }
    }

    let mut refs = BTreeSet::new();
    let mut bound = BTreeSet::new();
    walk(exp, &mut refs, &mut bound);

    refs.difference(&bound).copied().collect()
}

#[derive(Default)]
struct Analysis {
    facts: LoweringFacts,
    routines: HashSet<VarId>,
}

impl Analysis {
    /// Visits bundles outermost first, so names of plain routines from
    /// enclosing and earlier bundles are known when a bundle is classified.
    fn visit(&mut self, exp: &Exp<Checked>) {
        if let ExpKind::Rec(funcs, _) = &exp.kind {
            self.classify_bundle(funcs);
        }

        for child in exp.children() {
            self.visit(child);
        }
    }

    fn classify_bundle(&mut self, funcs: &[Func<Checked>]) {
        let names = funcs.iter().map(|f| f.name).collect::<BTreeSet<_>>();
        let params = funcs
            .iter()
            .map(|f| f.params.iter().map(|p| p.name).collect::<BTreeSet<_>>())
            .collect::<Vec<_>>();

        let mut calls = vec![];
        let mut needs = vec![];
        for (func, params) in funcs.iter().zip(&params) {
            let free = free_vars(&func.body);
            calls.push(free.intersection(&names).copied().collect::<Vec<_>>());
            needs.push(
                free.into_iter()
                    .filter(|id| !params.contains(id) && !names.contains(id) && !self.routines.contains(id))
                    .collect::<BTreeSet<_>>(),
            );
        }

        // needs(f) grows by needs(g) \ params(f) for every member g that f references
        let index = funcs.iter().enumerate().map(|(i, f)| (f.name, i)).collect::<BTreeMap<_, _>>();
        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..funcs.len() {
                for callee in &calls[i] {
                    let inherited = needs[index[callee]]
                        .iter()
                        .filter(|id| !params[i].contains(id))
                        .copied()
                        .collect::<Vec<_>>();
                    for id in inherited {
                        changed |= needs[i].insert(id);
                    }
                }
            }
        }

        for (func, needs) in funcs.iter().zip(needs) {
            if needs.is_empty() {
                self.routines.insert(func.name);
            }
            debug!(function = func.name, needs = needs.len(), "classified");
            self.facts.members.push(MemberFacts {
                name: func.name,
                needs: needs.into_iter().collect(),
            });
        }
    }
}

/// Rejects any use of a branch target other than a tail call.
fn enforce_tail_calls(exp: &Exp<Checked>, targets: &HashSet<VarId>) -> Result<(), Error> {
    match &exp.kind {
        ExpKind::Var(id) if targets.contains(id) => {
            return Err(Error::new(ErrorImpl::EscapingBranchTarget { function: *id }, exp.ann.span.start.clone()));
        }
        ExpKind::Call(callee, args) => {
            if let ExpKind::Var(id) = callee.kind {
                if targets.contains(&id) {
                    if !exp.ann.tail {
                        return Err(Error::new(
                            ErrorImpl::NonTailCall { function: id },
                            exp.ann.span.start.clone(),
                        ));
                    }

                    for arg in args {
                        enforce_tail_calls(arg, targets)?;
                    }
                    return Ok(());
                }
            }
        }
        _ => {}
    }

    for child in exp.children() {
        enforce_tail_calls(child, targets)?;
    }

    Ok(())
}

/// Classifies every bundle member of a checked program as a plain routine
/// or a branch target, and checks that branch targets are only ever tail
/// called.
#[tracing::instrument(level = "debug", skip_all)]
pub fn analyze(program: &Exp<Checked>) -> Result<LoweringFacts, Error> {
    let mut analysis = Analysis::default();
    analysis.visit(program);

    let targets = analysis
        .facts
        .branch_targets()
        .map(|m| m.name)
        .collect::<HashSet<_>>();
    enforce_tail_calls(program, &targets)?;

    debug!(
        members = analysis.facts.members.len(),
        branch_targets = targets.len(),
        "lowering facts"
    );
    Ok(analysis.facts)
}
