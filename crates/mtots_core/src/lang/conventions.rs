//! Naming conventions shared by the registry, the solver and module lookup.

/// Module whose top-level scope seeds every other module's builtin scope.
pub const BUILTIN_MODULE: &str = "__builtin__";

/// Module name given to the root document being edited or checked.
pub const MAIN_MODULE: &str = "__main__";

/// Environment variable listing extra module search roots.
pub const SEARCH_PATH_ENV: &str = "MTOTSPATH";

/// Subdirectories of a workspace root that are also searched for modules.
pub const WORKSPACE_SUBDIRS: &[&str] = &["src", "apps", "root"];

/// Source location name used for compiler-provided definitions.
pub const BUILTIN_SOURCE: &str = "(builtin)";

/// Candidate relative paths for a dotted module name, in lookup order.
///
/// ## Examples
/// ```rust
/// use mtots_core::lang::conventions::module_relative_paths;
///
/// assert_eq!(
///     module_relative_paths("a.b"),
///     vec![
///         "a/b/__init__.types.mtots".to_string(),
///         "a/b/__init__.mtots".to_string(),
///         "a/b.types.mtots".to_string(),
///         "a/b.mtots".to_string(),
///     ]
/// );
/// ```
pub fn module_relative_paths(module_name: &str) -> Vec<String> {
    let rel = module_name.replace('.', "/");
    vec![
        format!("{rel}/__init__.types.mtots"),
        format!("{rel}/__init__.mtots"),
        format!("{rel}.types.mtots"),
        format!("{rel}.mtots"),
    ]
}
