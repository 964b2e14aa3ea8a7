//! The solved form of one source file.
//!
//! A [`Module`] is immutable once [`solve`](crate::frontend::solver::solve) returns it. Importers see it through a
//! `ModuleType` built from its bindings; editors query its side tables by cursor position.

use std::sync::Arc;

use indexmap::IndexMap;
use mtots_syntax::ast::File;
use mtots_syntax::diagnostics::Diagnostic;
use mtots_syntax::position::{Location, Position};

use crate::frontend::ide::{CompletionPoint, SignatureHelp, Usage};
use crate::frontend::ir::{ModuleKey, ModuleType, TypeId, Types, Variable};
use crate::frontend::scope::ScopeTable;

#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub key: ModuleKey,
    pub file: Arc<File>,
    pub scopes: ScopeTable,
    /// Top-level bindings, shared with every `ModuleType` of this module.
    pub globals: Arc<IndexMap<String, Variable>>,
    pub builtins: Arc<IndexMap<String, Variable>>,
    /// Syntax errors of the file, then semantic diagnostics in the order they were found.
    pub errors: Vec<Diagnostic>,
    pub usages: Vec<Usage>,
    pub signature_helps: Vec<SignatureHelp>,
    pub completion_points: Vec<CompletionPoint>,
}

impl Module {
    pub fn documentation(&self) -> Option<&str> {
        self.file.documentation.as_deref()
    }

    /// Scope-style lookup: own top-level bindings, then builtins.
    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.globals.get(name).or_else(|| self.builtins.get(name))
    }

    /// A fresh value type for this module, for binding it in an importer.
    pub fn module_type(&self, types: &mut Types) -> TypeId {
        types.module(ModuleType {
            key: self.key,
            name: self.name.clone(),
            location: self.file.location.clone(),
            documentation: self.file.documentation.clone(),
            globals: self.globals.clone(),
            builtins: self.builtins.clone(),
        })
    }

    // ========================================================================
    // Position queries
    // ========================================================================

    /// The first usage whose identifier contains `position`.
    pub fn find_usage(&self, position: Position) -> Option<&Usage> {
        self.usages
            .iter()
            .find(|usage| usage.identifier.location.range.contains(position))
    }

    /// Among the argument slots touching `position`, the one starting last (the innermost call).
    pub fn find_signature_help(&self, position: Position) -> Option<&SignatureHelp> {
        let mut best: Option<&SignatureHelp> = None;
        for help in &self.signature_helps {
            let range = help.location.range;
            if range.contains_inclusive(position) && best.is_none_or(|b| b.location.range.start < range.start) {
                best = Some(help);
            }
        }
        best
    }

    pub fn find_completion_point(&self, position: Position) -> Option<&CompletionPoint> {
        self.completion_points
            .iter()
            .find(|point| point.location.range.contains_inclusive(position))
    }

    /// Where the name under `position` was declared. An imported module leads to its source file; builtin-provided
    /// names have no definition.
    pub fn find_definition(&self, types: &Types, position: Position) -> Option<Location> {
        let variable = &self.find_usage(position)?.variable;
        if let Some(module) = types.module_type(variable.type_id) {
            return Some(module.location.clone());
        }
        variable.definition_location().cloned()
    }
}
