//! Incremental module registry.
//!
//! The registry turns a root document into a solved [`Module`], loading and solving everything it imports along
//! the way. Work from the previous refresh of the same document is reused wherever it is still valid.
//!
//! ## Notes
//!
//! - **Parse cache**: keyed by (document identity, version). An unchanged version yields the same `Arc<File>`.
//!   A document that was not valid UTF-8 gets a lexical diagnostic at the start of its file.
//! - **Solve cache**: a module is reused only if its file is the same `Arc` as last time and every dependency it
//!   was solved against is the same `Arc` too. A change anywhere upstream re-solves everything downstream.
//! - **Order**: modules are solved dependencies first (depth-first post-order from the root), with the builtin
//!   module first unless it is the root itself. An import that closes a cycle is reported on the importing module.
//! - **Concurrency**: refreshes of one document coalesce ([`coalesce::InFlight`]); refreshes of different
//!   documents run independently.
//! - **Types**: each document owns one [`Types`] arena shared by all of its modules, so reused modules keep valid
//!   type ids. Reused modules form a prefix of the solve order; before solving the rest, the arena is cut back to
//!   where that prefix ended, or replaced when nothing is reused. Every [`Analysis`] shares the arena it was solved
//!   in; a later refresh copies it on write.
//!
//! ## Examples
//!
//! ```rust
//! use mtots::registry::{MemoryModuleFinder, Registry, SourceDocument};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! runtime.block_on(async {
//!     let registry = Registry::new(MemoryModuleFinder::new());
//!     let document = SourceDocument::new("memory:main", 1, "var x = missing\n");
//!     let analysis = registry.refresh(document).await.unwrap();
//!     assert_eq!(analysis.module.errors[0].message, "Variable \"missing\" not found");
//! });
//! ```

pub mod coalesce;
pub mod finder;


use std::collections::{HashMap, HashSet};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use miette::Diagnostic as MietteDiagnostic;
use mtots_core::lang::conventions::{BUILTIN_MODULE, MAIN_MODULE};
use mtots_syntax::ast::File;
use mtots_syntax::diagnostics::Diagnostic;
use mtots_syntax::parser;
use mtots_syntax::position::{Location, Position, SourceId};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::frontend::ide::{CompletionEntry, SignatureHelp};
use crate::frontend::ir::{Types, Variable, format_variable};
use crate::frontend::module::Module;
use crate::frontend::solver::{self, SolveError};

pub use coalesce::InFlight;
pub use finder::{FsModuleFinder, MemoryModuleFinder, ModuleFinder, SourceDocument};

// ============================================================================
// Errors
// ============================================================================

/// A refresh that could not produce a module.
#[derive(Debug, Clone, Error, MietteDiagnostic)]
pub enum RegistryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Solve(#[from] SolveError),

    #[error("refresh produced no root module")]
    #[diagnostic(code(mtots::registry::missing_main))]
    MissingMainModule,

    #[error("the refresh this request joined was abandoned")]
    #[diagnostic(code(mtots::registry::abandoned), help("retry the refresh"))]
    Abandoned,

    #[error("failed to read {}: {source}", path.display())]
    #[diagnostic(code(mtots::registry::io))]
    Io { path: PathBuf, source: Arc<io::Error> },
}

impl RegistryError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// A solved root module together with the types its ids refer to.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub module: Arc<Module>,
    pub types: Arc<Types>,
}

/// Hover text for a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hover {
    pub signature: String,
    pub documentation: Option<String>,
}

impl Analysis {
    /// What the name under `position` is. A call through a generic function shows the inferred signature.
    pub fn hover(&self, position: Position) -> Option<Hover> {
        let usage = self.module.find_usage(position)?;
        let signature = match usage.bound_type {
            Some(bound) => {
                let reified = Variable::new(
                    usage.variable.is_final,
                    usage.variable.identifier.clone(),
                    bound,
                    None,
                );
                format_variable(&self.types, &reified)
            }
            None => format_variable(&self.types, &usage.variable),
        };
        Some(Hover {
            signature,
            documentation: usage.variable.documentation.clone(),
        })
    }

    pub fn completions(&self, position: Position) -> Vec<CompletionEntry> {
        self.module
            .find_completion_point(position)
            .map(|point| point.entries(&self.types, &self.module.scopes))
            .unwrap_or_default()
    }

    pub fn signature_help(&self, position: Position) -> Option<&SignatureHelp> {
        self.module.find_signature_help(position)
    }

    pub fn definition(&self, position: Position) -> Option<Location> {
        self.module.find_definition(&self.types, position)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.module.errors
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Per-document caches that survive between refreshes.
#[derive(Debug, Default)]
struct EntryState {
    files: HashMap<(String, u64), Arc<File>>,
    modules: IndexMap<String, Arc<Module>>,
    /// Arena length right after each module in `modules` was solved.
    solved_at: HashMap<String, usize>,
    types: Arc<Types>,
    latest: Option<Analysis>,
}

#[derive(Debug, Default)]
struct Entry {
    in_flight: InFlight<Result<Analysis, RegistryError>>,
    state: Mutex<EntryState>,
}

/// Solved modules, per root document.
#[derive(Debug)]
pub struct Registry<F> {
    finder: F,
    entries: RwLock<HashMap<String, Arc<Entry>>>,
}

impl<F: ModuleFinder> Registry<F> {
    pub fn new(finder: F) -> Self {
        Self {
            finder,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn finder(&self) -> &F {
        &self.finder
    }

    /// Re-solve `document` and everything it imports.
    ///
    /// A refresh already running for the same document is joined rather than repeated; the caller then gets that
    /// refresh's result.
    ///
    /// ## Errors
    /// - [`RegistryError::Solve`] on a solver invariant violation
    /// - [`RegistryError::Io`] if a module source could not be read
    /// - [`RegistryError::Abandoned`] if the joined refresh was dropped before it finished
    #[tracing::instrument(skip_all, fields(uri = %document.uri, version = document.version))]
    pub async fn refresh(&self, document: SourceDocument) -> Result<Analysis, RegistryError> {
        let entry = self.entry(&document.uri).await;
        entry
            .in_flight
            .run(|| self.refresh_entry(&entry, document))
            .await
            .unwrap_or(Err(RegistryError::Abandoned))
    }

    /// The result of the last successful refresh of `uri`.
    pub async fn module(&self, uri: &str) -> Option<Analysis> {
        let entry = self.entries.read().await.get(uri).cloned()?;
        let state = entry.state.lock().await;
        state.latest.clone()
    }

    /// Forget everything cached for `uri`.
    pub async fn delete(&self, uri: &str) -> bool {
        self.entries.write().await.remove(uri).is_some()
    }

    /// Diagnostics of the last successful refresh of `uri`.
    pub async fn diagnostics(&self, uri: &str) -> Vec<Diagnostic> {
        self.module(uri)
            .await
            .map(|analysis| analysis.module.errors.clone())
            .unwrap_or_default()
    }

    async fn entry(&self, uri: &str) -> Arc<Entry> {
        if let Some(entry) = self.entries.read().await.get(uri) {
            return entry.clone();
        }
        self.entries.write().await.entry(uri.to_string()).or_default().clone()
    }

    async fn refresh_entry(&self, entry: &Entry, document: SourceDocument) -> Result<Analysis, RegistryError> {
        let mut guard = entry.state.lock().await;
        let state = &mut *guard;
        let mut files = FileCache::new(std::mem::take(&mut state.files));
        let previous_modules = std::mem::take(&mut state.modules);

        let graph = self.load(&document, &mut files).await;
        state.files = files.current;
        let graph = graph?;

        // Reuse stops at the first module that has to be solved again; everything after it in solve order is
        // solved again too, so the arena can be cut back to where the reused modules ended.
        let previous_solved_at = std::mem::take(&mut state.solved_at);
        let mut modules: IndexMap<String, Arc<Module>> = IndexMap::new();
        let mut reused_up_to = None;
        let mut solving = false;
        for name in &graph.order {
            let Some(file) = graph.files.get(name) else {
                continue;
            };
            if !solving {
                let dependencies = graph.dependencies(name);
                let reused = reusable(&previous_modules, &modules, name, file, &dependencies);
                if let (Some(module), Some(end)) = (reused, previous_solved_at.get(name)) {
                    tracing::debug!(module = %name, "solve (cached)");
                    reused_up_to = Some(reused_up_to.map_or(*end, |up_to: usize| up_to.max(*end)));
                    state.solved_at.insert(name.clone(), *end);
                    modules.insert(name.clone(), module);
                    continue;
                }
                solving = true;
                match reused_up_to {
                    Some(len) => Arc::make_mut(&mut state.types).truncate(len),
                    None => state.types = Arc::new(Types::new()),
                }
            }
            tracing::debug!(module = %name, "solve");
            let types = Arc::make_mut(&mut state.types);
            let mut module = solver::solve(name, file.clone(), &modules, types)?;
            if let Some(cycles) = graph.cycles.get(name) {
                module.errors.extend(cycles.iter().cloned());
            }
            state.solved_at.insert(name.clone(), types.len());
            modules.insert(name.clone(), Arc::new(module));
        }

        let main = modules.get(MAIN_MODULE).cloned();
        state.modules = modules;
        let module = main.ok_or(RegistryError::MissingMainModule)?;
        let analysis = Analysis {
            module,
            types: state.types.clone(),
        };
        state.latest = Some(analysis.clone());
        Ok(analysis)
    }

    /// Parse the root and everything reachable through imports, then order the modules for solving.
    async fn load(&self, document: &SourceDocument, files: &mut FileCache) -> Result<ModuleGraph, RegistryError> {
        let mut graph = ModuleGraph::default();
        let mut seen: HashSet<String> = HashSet::from([MAIN_MODULE.to_string()]);
        let mut stack = vec![(MAIN_MODULE.to_string(), files.parse(document))];

        let builtin = self.finder.find(BUILTIN_MODULE).await?;
        let builtin_is_root = builtin.as_ref().is_some_and(|b| b.uri == document.uri);
        if let Some(builtin) = builtin.filter(|_| !builtin_is_root) {
            seen.insert(BUILTIN_MODULE.to_string());
            stack.push((BUILTIN_MODULE.to_string(), files.parse(&builtin)));
        }

        while let Some((name, file)) = stack.pop() {
            let mut imports = Vec::with_capacity(file.imports.len());
            for import in &file.imports {
                let import_name = import.module.to_string();
                imports.push((import_name.clone(), import.location.clone()));
                if !seen.insert(import_name.clone()) {
                    continue;
                }
                if let Some(found) = self.finder.find(&import_name).await? {
                    stack.push((import_name, files.parse(&found)));
                }
            }
            graph.imports.insert(name.clone(), imports);
            graph.files.insert(name, file);
        }

        if !builtin_is_root && graph.files.contains_key(BUILTIN_MODULE) {
            graph.implicit_builtin = true;
        }
        graph.compute_order();
        Ok(graph)
    }
}

/// A previous solve of `name` that is still valid, if there is one.
fn reusable(
    previous: &IndexMap<String, Arc<Module>>,
    current: &IndexMap<String, Arc<Module>>,
    name: &str,
    file: &Arc<File>,
    dependencies: &[&str],
) -> Option<Arc<Module>> {
    let module = previous.get(name)?;
    if !Arc::ptr_eq(&module.file, file) {
        return None;
    }
    let unchanged = dependencies
        .iter()
        .all(|dep| match (previous.get(*dep), current.get(*dep)) {
            (Some(before), Some(now)) => Arc::ptr_eq(before, now),
            (None, None) => true,
            _ => false,
        });
    unchanged.then(|| module.clone())
}

// ============================================================================
// Loading
// ============================================================================

/// Parse cache for one refresh: hits come from the previous refresh, and everything used is kept for the next.
struct FileCache {
    previous: HashMap<(String, u64), Arc<File>>,
    current: HashMap<(String, u64), Arc<File>>,
}

impl FileCache {
    fn new(previous: HashMap<(String, u64), Arc<File>>) -> Self {
        Self {
            previous,
            current: HashMap::new(),
        }
    }

    fn parse(&mut self, document: &SourceDocument) -> Arc<File> {
        let key = (document.uri.clone(), document.version);
        if let Some(file) = self.current.get(&key) {
            return file.clone();
        }
        if let Some(file) = self.previous.remove(&key) {
            tracing::debug!(uri = %document.uri, "parse (cached)");
            self.current.insert(key, file.clone());
            return file;
        }
        tracing::debug!(uri = %document.uri, "parse");
        let source = SourceId::new(&document.uri);
        let mut file = parser::parse(&source, &document.text);
        if let Some(offset) = document.invalid_utf8_at {
            let message = format!("File is not valid UTF-8 (first invalid byte at offset {offset})");
            file.syntax_errors.insert(0, Diagnostic::lexical(Location::start_of(source), message));
        }
        let file = Arc::new(file);
        self.current.insert(key, file.clone());
        file
    }
}

/// Every module reachable from a root, with its imports and its place in the solve order.
#[derive(Debug, Default)]
struct ModuleGraph {
    files: HashMap<String, Arc<File>>,
    /// Imported module names with the location of each import, in source order.
    imports: HashMap<String, Vec<(String, Location)>>,
    implicit_builtin: bool,
    order: Vec<String>,
    cycles: HashMap<String, Vec<Diagnostic>>,
}

impl ModuleGraph {
    /// Names `name` depends on: its imports, plus the builtin module when it is implicit.
    fn dependencies(&self, name: &str) -> Vec<&str> {
        let mut dependencies: Vec<&str> = self
            .imports
            .get(name)
            .map(|imports| imports.iter().map(|(dep, _)| dep.as_str()).collect())
            .unwrap_or_default();
        if self.implicit_builtin && name != BUILTIN_MODULE {
            dependencies.push(BUILTIN_MODULE);
        }
        dependencies
    }

    fn compute_order(&mut self) {
        let mut visited = HashSet::new();
        let mut trace = Vec::new();
        if self.implicit_builtin {
            self.visit(BUILTIN_MODULE, &mut visited, &mut trace);
        }
        self.visit(MAIN_MODULE, &mut visited, &mut trace);
    }

    fn visit(&mut self, name: &str, visited: &mut HashSet<String>, trace: &mut Vec<String>) {
        if !visited.insert(name.to_string()) {
            return;
        }
        trace.push(name.to_string());
        let imports = self.imports.get(name).cloned().unwrap_or_default();
        for (dep, location) in imports {
            if trace.contains(&dep) {
                let message = format!("Import cycle detected: {name} imports {dep}");
                self.cycles
                    .entry(name.to_string())
                    .or_default()
                    .push(Diagnostic::semantic(location, message));
                continue;
            }
            self.visit(&dep, visited, trace);
        }
        trace.pop();
        self.order.push(name.to_string());
    }
}
