//! Lexical scopes for the solver.
//!
//! Scopes live in one table per module and point at their parent by index. The solver enters a scope per nested
//! construct and leaves it afterwards; scopes are never removed, so completion points recorded while solving can
//! refer to them by [`ScopeId`] afterwards.

use indexmap::IndexMap;

use crate::frontend::ir::Variable;

/// Index of a scope in a [`ScopeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The copy of the builtin module's bindings every module starts from.
    pub const BUILTINS: ScopeId = ScopeId(0);
    pub const MODULE: ScopeId = ScopeId(1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Builtins,
    Module,
    Block,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    pub variables: IndexMap<String, Variable>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, kind: ScopeKind) -> Self {
        Self {
            parent,
            kind,
            variables: IndexMap::new(),
        }
    }
}

/// Scope chain of one module.
#[derive(Debug, Clone)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![
                Scope::new(None, ScopeKind::Builtins),
                Scope::new(Some(ScopeId::BUILTINS), ScopeKind::Module),
            ],
            current: ScopeId::MODULE,
        }
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Enter a new block scope whose parent is the current one.
    pub fn enter_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(Some(self.current), ScopeKind::Block));
        self.current = id;
        id
    }

    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current.0].parent {
            self.current = parent;
        }
    }

    /// Bind `name` in the current scope, returning the binding it replaced in that same scope.
    pub fn define(&mut self, name: impl Into<String>, variable: Variable) -> Option<Variable> {
        self.scopes[self.current.0].variables.insert(name.into(), variable)
    }

    pub fn define_builtin(&mut self, name: impl Into<String>, variable: Variable) {
        self.scopes[ScopeId::BUILTINS.0].variables.insert(name.into(), variable);
    }

    /// Look a name up from the current scope outwards.
    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.lookup_from(self.current, name)
    }

    pub fn lookup_from(&self, scope: ScopeId, name: &str) -> Option<&Variable> {
        self.chain(scope).find_map(|s| s.variables.get(name))
    }

    /// Look up a symbol only in the current scope (no parent lookup).
    pub fn lookup_local(&self, name: &str) -> Option<&Variable> {
        self.scopes[self.current.0].variables.get(name)
    }

    /// `scope` followed by its ancestors, innermost first.
    pub fn chain(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self.scope(scope)), |s| s.parent.map(|p| self.scope(p)))
    }

    pub fn module_variables(&self) -> &IndexMap<String, Variable> {
        &self.scope(ScopeId::MODULE).variables
    }

    pub fn builtin_variables(&self) -> &IndexMap<String, Variable> {
        &self.scope(ScopeId::BUILTINS).variables
    }
}

#[cfg(test)]
mod tests {
    use mtots_syntax::ast::Ident;
    use mtots_syntax::position::Location;

    use super::*;
    use crate::frontend::ir::TypeId;

    fn var(name: &str, type_id: TypeId) -> Variable {
        Variable::new(false, Ident::synthetic(name, Location::builtin()), type_id, None)
    }

    #[test]
    fn lookup_walks_outwards_and_shadows() {
        let mut table = ScopeTable::new();
        table.define_builtin("print", var("print", TypeId::ANY));
        table.define("x", var("x", TypeId::NUMBER));
        let inner = table.enter_scope();
        table.define("x", var("x", TypeId::STRING));

        assert_eq!(table.lookup("x").map(|v| v.type_id), Some(TypeId::STRING));
        assert!(table.lookup("print").is_some());
        assert!(table.lookup_local("print").is_none());

        table.exit_scope();
        assert_eq!(table.lookup("x").map(|v| v.type_id), Some(TypeId::NUMBER));
        assert_eq!(table.lookup_from(inner, "x").map(|v| v.type_id), Some(TypeId::STRING));
        assert_eq!(table.chain(inner).count(), 3);
    }

    #[test]
    fn redefining_in_the_same_scope_returns_the_old_binding() {
        let mut table = ScopeTable::new();
        assert!(table.define("x", var("x", TypeId::NUMBER)).is_none());
        let old = table.define("x", var("x", TypeId::STRING));
        assert_eq!(old.map(|v| v.type_id), Some(TypeId::NUMBER));
        assert_eq!(table.module_variables().len(), 1);
    }
}
