use std::collections::HashMap;

use crate::{
    errors::errors::{Error, ErrorImpl},
    ir::ir::VarId,
    Position,
};

/// A single lexical scope level.
#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<String, VarId>,
}

/// Assigns dense identities to source variables during parsing.
///
/// Identities are handed out in binding order starting at zero. Each binder
/// gets a fresh identity, so a name rebound in a nested scope shadows the
/// outer binding instead of aliasing it. The outermost scope is never popped.
#[derive(Debug)]
pub struct VarSpace {
    scopes: Vec<Scope>,
    /// Source text of every identity, indexed by identity.
    names: Vec<String>,
}

impl VarSpace {
    pub fn new() -> Self {
        VarSpace {
            scopes: vec![Scope::default()],
            names: vec![],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binding occurrence: allocates the next identity in the innermost scope.
    pub fn bind(&mut self, name: &str) -> VarId {
        let id = self.names.len() as VarId;
        self.names.push(name.to_string());
        // `new` always creates the outermost scope
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), id);
        }
        id
    }

    /// Use occurrence: innermost binding of `name`, never allocates.
    pub fn resolve(&self, name: &str, position: Position) -> Result<VarId, Error> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name).copied())
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::VariableNotDeclared { variable: name.to_string() },
                    position,
                )
            })
    }

    /// Source text an identity was bound from.
    pub fn name_of(&self, id: VarId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// Number of identities allocated so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for VarSpace {
    fn default() -> Self {
        Self::new()
    }
}
