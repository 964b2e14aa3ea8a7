//! Solver: turns one parsed file plus its solved dependencies into a typed [`Module`].
//!
//! The solver never stops at a user error. Every unresolved name, arity mismatch or bad assignment becomes a
//! [`Diagnostic`] on the module and checking continues with `Any` (or the best type it can guess) in place of the
//! failed result.
//!
//! ## Notes
//!
//! - **Pipeline**: builtin scope, then imports ([`collect`]), then the top-level statement list. Every statement
//!   list runs in three passes ([`check_decl`]): class placeholders, member signatures, bodies.
//! - **Side tables**: usages, signature helps and completion points are recorded while solving. They never affect
//!   what the solver concludes.
//! - **Fatal errors**: only solver invariant violations are fatal ([`SolveError::Internal`]). They indicate a bug in
//!   the solver, not in the input.
//!
//! ## Examples
//!
//! ```rust
//! use indexmap::IndexMap;
//! use mtots::frontend::ir::Types;
//! use mtots::frontend::solver;
//! use mtots_syntax::{parser, position::SourceId};
//! use std::sync::Arc;
//!
//! let file = Arc::new(parser::parse(&SourceId::new("main.mtots"), "var x = y\n"));
//! let mut types = Types::new();
//! let module = solver::solve("__main__", file, &IndexMap::new(), &mut types).unwrap();
//! assert_eq!(module.errors[0].message, "Variable \"y\" not found");
//! ```
//!
//! ## See also
//!
//! - [`ir`](super::ir): the type arena the solver allocates into
//! - [`scope`](super::scope): lexical scopes

mod check_decl;
mod check_expr;
mod check_stmt;
mod collect;
mod const_eval;
mod types;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use miette::Diagnostic as MietteDiagnostic;
use mtots_syntax::ast::{File, Ident, NodeId};
use mtots_syntax::diagnostics::Diagnostic;
use mtots_syntax::position::{Location, SourceId};
use thiserror::Error;

use crate::frontend::ide::{CompletionPoint, SignatureHelp, Usage};
use crate::frontend::ir::{ModuleKey, TypeId, Types, Variable};
use crate::frontend::module::Module;
use crate::frontend::scope::ScopeTable;

/// A solver invariant that did not hold.
#[derive(Debug, Clone, Error, MietteDiagnostic)]
#[error("internal solver error at {location}: {message}")]
#[diagnostic(code(mtots::solver::internal), help("this is a bug in the solver, not in the source file"))]
pub struct InternalError {
    pub location: Location,
    pub message: String,
}

#[derive(Debug, Clone, Error, MietteDiagnostic)]
pub enum SolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Internal(#[from] InternalError),
}

/// Solver state for one module.
pub(crate) struct Solver<'a> {
    name: &'a str,
    source: SourceId,
    pub(crate) types: &'a mut Types,
    deps: &'a IndexMap<String, Arc<Module>>,
    pub(crate) scopes: ScopeTable,
    errors: Vec<Diagnostic>,
    usages: Vec<Usage>,
    /// Position of each parsed identifier's usage in `usages`.
    usage_index: HashMap<NodeId, usize>,
    signature_helps: Vec<SignatureHelp>,
    completion_points: Vec<CompletionPoint>,
    /// Function types computed in pass 2, keyed by the declaring identifier.
    function_types: HashMap<NodeId, TypeId>,
    /// Placeholder instance types created in pass 1, keyed by the declaring identifier.
    class_types: HashMap<NodeId, TypeId>,
}

/// Solve `file` as module `name` against already solved `deps`.
///
/// `deps` maps module names to modules solved against the same `types` arena. The builtin module, when present,
/// is found there under `__builtin__`.
///
/// ## Errors
/// - [`SolveError::Internal`] if a solver invariant is violated. User errors never fail the solve.
#[tracing::instrument(skip_all, fields(module = name, imports = file.imports.len()))]
pub fn solve(
    name: &str,
    file: Arc<File>,
    deps: &IndexMap<String, Arc<Module>>,
    types: &mut Types,
) -> Result<Module, SolveError> {
    let mut solver = Solver::new(name, file.location.source.clone(), types, deps);
    solver.errors.extend(file.syntax_errors.iter().cloned());
    solver.merge_builtin_scope();
    solver.solve_imports(&file);
    solver.solve_block_body(&file.statements)?;
    Ok(solver.finish(file))
}

impl<'a> Solver<'a> {
    fn new(
        name: &'a str,
        source: SourceId,
        types: &'a mut Types,
        deps: &'a IndexMap<String, Arc<Module>>,
    ) -> Self {
        Self {
            name,
            source,
            types,
            deps,
            scopes: ScopeTable::new(),
            errors: Vec::new(),
            usages: Vec::new(),
            usage_index: HashMap::new(),
            signature_helps: Vec::new(),
            completion_points: Vec::new(),
            function_types: HashMap::new(),
            class_types: HashMap::new(),
        }
    }

    fn finish(self, file: Arc<File>) -> Module {
        let globals = Arc::new(self.scopes.module_variables().clone());
        let builtins = Arc::new(self.scopes.builtin_variables().clone());
        Module {
            name: self.name.to_string(),
            key: ModuleKey::fresh(),
            file,
            scopes: self.scopes,
            globals,
            builtins,
            errors: self.errors,
            usages: self.usages,
            signature_helps: self.signature_helps,
            completion_points: self.completion_points,
        }
    }

    // ========================================================================
    // Diagnostics and side tables
    // ========================================================================

    pub(crate) fn error(&mut self, location: &Location, message: impl Into<String>) {
        self.errors.push(Diagnostic::semantic(location.clone(), message));
    }

    pub(crate) fn internal(&self, location: &Location, message: impl Into<String>) -> SolveError {
        SolveError::Internal(InternalError {
            location: location.clone(),
            message: message.into(),
        })
    }

    /// Record that `identifier` resolved to `variable`. Only the first resolution of a parsed identifier counts,
    /// and identifiers from other sources (an imported member's declaration) are not recorded here.
    pub(crate) fn declare_usage(&mut self, identifier: &Ident, variable: &Variable) {
        if identifier.location.source != self.source {
            return;
        }
        if identifier.id != NodeId::SYNTHETIC {
            if self.usage_index.contains_key(&identifier.id) {
                return;
            }
            self.usage_index.insert(identifier.id, self.usages.len());
        }
        self.usages.push(Usage::new(identifier.clone(), variable.clone()));
    }

    /// The usage recorded for `identifier`, if any.
    pub(crate) fn usage_mut(&mut self, identifier: &Ident) -> Option<&mut Usage> {
        if identifier.id == NodeId::SYNTHETIC {
            return None;
        }
        let index = *self.usage_index.get(&identifier.id)?;
        self.usages.get_mut(index)
    }

    pub(crate) fn push_signature_help(&mut self, help: SignatureHelp) {
        self.signature_helps.push(help);
    }

    pub(crate) fn push_completion_point(&mut self, point: CompletionPoint) {
        self.completion_points.push(point);
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    /// Bind `variable` under its own name in the current scope.
    pub(crate) fn declare_variable(&mut self, variable: Variable) {
        let name = variable.identifier.name.clone();
        let location = variable.identifier.location.clone();
        self.declare_variable_as(&name, &location, variable);
    }

    /// Bind `variable` under `name`, reporting a redeclaration at `location`. The new binding wins either way.
    pub(crate) fn declare_variable_as(&mut self, name: &str, location: &Location, variable: Variable) {
        if self.scopes.lookup_local(name).is_some() {
            self.error(
                location,
                format!("Variable with name \"{name}\" already declared in this scope"),
            );
        }
        self.declare_usage(&variable.identifier, &variable);
        self.scopes.define(name, variable);
    }

    /// Run `f` inside a fresh block scope.
    pub(crate) fn with_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scopes.enter_scope();
        let result = f(self);
        self.scopes.exit_scope();
        result
    }
}
