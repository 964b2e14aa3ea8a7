//! Side tables the solver records for editor features.
//!
//! Recording these never changes what the solver concludes; they only remember where names were resolved, where
//! calls take arguments, and what could be completed at a given spot.
//!
//! ## Notes
//!
//! - Completion points only remember what to complete: a scope or an owner type. Entries are computed on request.
//!   Binding the members of a generic instance allocates, so member entries are looked up in a scratch copy of the
//!   arena and the shared one is left untouched.

use mtots_core::lang::builtin_types::TYPE_COMPLETION_NAMES;
use mtots_syntax::ast::Ident;
use mtots_syntax::position::Location;
use serde::Serialize;

use crate::frontend::ir::{TypeId, Types, Variable};
use crate::frontend::scope::{ScopeId, ScopeTable};

/// An identifier resolved to a binding.
#[derive(Debug, Clone)]
pub struct Usage {
    pub identifier: Ident,
    pub variable: Variable,
    /// For calls that went through generic inference: the reified function type, for hover.
    pub bound_type: Option<TypeId>,
}

impl Usage {
    pub fn new(identifier: Ident, variable: Variable) -> Self {
        Self {
            identifier,
            variable,
            bound_type: None,
        }
    }
}

/// Signature help for one argument slot of a call.
#[derive(Debug, Clone)]
pub struct SignatureHelp {
    /// The argument slot, from the start of the argument to the start of the next one.
    pub location: Location,
    pub function_name: Option<String>,
    pub function_documentation: Option<String>,
    pub parameter_types: Vec<TypeId>,
    pub parameter_names: Option<Vec<String>>,
    pub parameter_index: usize,
    pub return_type: Option<TypeId>,
}

/// Which bare names a scope completion offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFilter {
    Default,
    /// In type position: builtin type names, classes and modules.
    TypesAndModulesOnly,
}

/// Which members a member completion offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberFilter {
    Default,
    /// In type position (`module.Name`): only classes.
    TypesOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionEntry {
    pub name: String,
    /// Rendered type of the binding, when there is one.
    pub detail: Option<String>,
}

impl CompletionEntry {
    fn keyword(name: &str) -> Self {
        Self {
            name: name.to_string(),
            detail: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CompletionKind {
    Scope { scope: ScopeId, filter: ScopeFilter },
    Member { owner: TypeId, filter: MemberFilter },
}

#[derive(Debug, Clone)]
pub struct CompletionPoint {
    pub location: Location,
    pub kind: CompletionKind,
}

impl CompletionPoint {
    pub fn scope(location: Location, scope: ScopeId, filter: ScopeFilter) -> Self {
        Self {
            location,
            kind: CompletionKind::Scope { scope, filter },
        }
    }

    pub fn member(location: Location, owner: TypeId, filter: MemberFilter) -> Self {
        Self {
            location,
            kind: CompletionKind::Member { owner, filter },
        }
    }

    pub fn entries(&self, types: &Types, scopes: &ScopeTable) -> Vec<CompletionEntry> {
        match &self.kind {
            CompletionKind::Scope { scope, filter } => scope_entries(types, scopes, *scope, *filter),
            CompletionKind::Member { owner, filter } => member_entries(&mut types.clone(), *owner, *filter),
        }
    }
}

/// Fields, then methods, each name once.
fn member_entries(types: &mut Types, owner: TypeId, filter: MemberFilter) -> Vec<CompletionEntry> {
    let mut names = types.field_names(owner);
    names.extend(types.method_names(owner));
    let mut entries: Vec<CompletionEntry> = Vec::new();
    for name in names {
        if entries.iter().any(|e| e.name == name) {
            continue;
        }
        let variable = match types.get_field(owner, &name) {
            Some(field) => Some(field),
            None => types.get_method(owner, &name),
        };
        if filter == MemberFilter::TypesOnly && !variable.as_ref().is_some_and(|v| types.is_class_type(v.type_id)) {
            continue;
        }
        let detail = variable.map(|v| types.render(v.type_id));
        entries.push(CompletionEntry { name, detail });
    }
    entries
}

/// Keywords (or builtin type names), then every visible binding innermost-first, nearer bindings shadowing.
fn scope_entries(types: &Types, scopes: &ScopeTable, scope: ScopeId, filter: ScopeFilter) -> Vec<CompletionEntry> {
    let mut entries = vec![CompletionEntry::keyword("nil")];
    match filter {
        ScopeFilter::Default => {
            entries.push(CompletionEntry::keyword("true"));
            entries.push(CompletionEntry::keyword("false"));
        }
        ScopeFilter::TypesAndModulesOnly => {
            entries.extend(TYPE_COMPLETION_NAMES.iter().map(|name| CompletionEntry::keyword(name)));
        }
    }
    let mut seen = std::collections::HashSet::new();
    for scope in scopes.chain(scope) {
        for (name, variable) in &scope.variables {
            if seen.contains(name.as_str()) {
                continue;
            }
            if filter == ScopeFilter::TypesAndModulesOnly
                && !types.is_class_type(variable.type_id)
                && !types.is_module_type(variable.type_id)
            {
                continue;
            }
            seen.insert(name.as_str());
            entries.push(CompletionEntry {
                name: name.clone(),
                detail: Some(types.render(variable.type_id)),
            });
        }
    }
    entries
}
