//! Module lookup configuration.
//!
//! A [`Config`] lists where modules live. Each workspace root is searched together with its conventional
//! subdirectories (`src`, `apps`, `root`), followed by any roots listed in the `MTOTSPATH` environment variable.

use std::env;
use std::path::{Path, PathBuf};

use mtots_core::lang::conventions::{SEARCH_PATH_ENV, WORKSPACE_SUBDIRS, module_relative_paths};

/// Module lookup configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace roots, searched in order
    pub roots: Vec<PathBuf>,
    /// Whether to append the roots listed in `MTOTSPATH`
    pub use_env_path: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            use_env_path: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a workspace root
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Ignore `MTOTSPATH`
    pub fn without_env_path(mut self) -> Self {
        self.use_env_path = false;
        self
    }

    /// Every directory searched for modules, in lookup order.
    pub fn search_roots(&self) -> Vec<PathBuf> {
        let env_path = if self.use_env_path {
            env::var_os(SEARCH_PATH_ENV)
        } else {
            None
        };
        search_roots(&self.roots, env_path.as_deref())
    }

    /// Candidate files for `module_name`, across all search roots, in lookup order.
    pub fn candidates(&self, module_name: &str) -> Vec<PathBuf> {
        let relative = module_relative_paths(module_name);
        self.search_roots()
            .iter()
            .flat_map(|root| relative.iter().map(move |rel| root.join(rel)))
            .collect()
    }
}

fn search_roots(workspace_roots: &[PathBuf], env_path: Option<&std::ffi::OsStr>) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    for root in workspace_roots {
        roots.push(root.clone());
        roots.extend(WORKSPACE_SUBDIRS.iter().map(|sub| root.join(sub)));
    }
    if let Some(env_path) = env_path {
        roots.extend(env::split_paths(env_path).filter(|p| !p.as_os_str().is_empty()));
    }
    roots
}

/// The workspace root implied by a source file: its parent directory.
pub fn root_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
