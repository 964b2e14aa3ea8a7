//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use miette::{NamedSource, Report};
use mtots_syntax::diagnostics::Diagnostic;
use mtots_syntax::position::SourceId;
use mtots_syntax::{lexer, parser};

use super::{CliError, CliResult, ExitCode, LookupArgs};
use crate::registry::{FsModuleFinder, Registry, SourceDocument};

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// while lexing.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let display = file_path.display();
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{display}': {e}")))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            display,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{display}': {e}")))
}

/// Render diagnostics against their source as miette reports.
pub fn render_diagnostics(file_path: &Path, source: &str, diagnostics: &[Diagnostic]) -> String {
    let name = file_path.display().to_string();
    let mut out = String::new();
    for diagnostic in diagnostics {
        let report = Report::new(diagnostic.clone()).with_source_code(NamedSource::new(&name, source.to_string()));
        out.push_str(&format!("{report:?}\n"));
    }
    out
}

/// Tokenize and display tokens.
pub fn lex_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = lexer::lex(&SourceId::new(file_path.display().to_string()), &source);
    for token in &tokens {
        println!("{token:?}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse and display the syntax tree as JSON.
pub fn parse_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let file = parser::parse(&SourceId::new(file_path.display().to_string()), &source);
    let json = serde_json::to_string_pretty(&file)
        .map_err(|e| CliError::failure(format!("Error serializing syntax tree: {e}")))?;
    println!("{json}");
    if file.syntax_errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        eprint!("{}", render_diagnostics(file_path, &source, &file.syntax_errors));
        Ok(ExitCode::FAILURE)
    }
}

/// Solve a file and everything it imports, then report its diagnostics.
pub fn check_file(file_path: &Path, lookup: &LookupArgs) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let document = SourceDocument::new(file_path.display().to_string(), 0, source.as_str());
    let registry = Registry::new(FsModuleFinder::new(lookup.config_for(file_path)));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("Error starting runtime: {e}")))?;
    let analysis = runtime
        .block_on(registry.refresh(document))
        .map_err(|e| CliError::failure(format!("{:?}", Report::new(e))))?;

    let diagnostics = analysis.diagnostics();
    if diagnostics.is_empty() {
        println!("✓ No problems found");
        return Ok(ExitCode::SUCCESS);
    }
    eprint!("{}", render_diagnostics(file_path, &source, diagnostics));
    eprintln!("{} problem(s) found", diagnostics.len());
    Ok(ExitCode::FAILURE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch(name: &str, text: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mtots-cli-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("main.mtots");
        fs::write(&path, text).unwrap();
        path
    }

    fn no_env() -> LookupArgs {
        LookupArgs {
            roots: Vec::new(),
            no_env_path: true,
        }
    }

    #[test]
    fn check_reports_problems() {
        let path = scratch("problems", "var x = missing\n");
        assert_eq!(check_file(&path, &no_env()).unwrap(), ExitCode::FAILURE);
    }

    #[test]
    fn check_resolves_sibling_modules() {
        let path = scratch("siblings", "from util import answer\nvar x = answer\n");
        fs::write(path.with_file_name("util.mtots"), "final answer = 42\n").unwrap();
        assert_eq!(check_file(&path, &no_env()).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_source(Path::new("definitely/not/here.mtots")).unwrap_err();
        assert!(err.message.starts_with("Cannot access file"));
    }

    #[test]
    fn rendered_diagnostics_carry_the_message() {
        let file = parser::parse(&SourceId::new("x.mtots"), "var = 1\n");
        let rendered = render_diagnostics(Path::new("x.mtots"), "var = 1\n", &file.syntax_errors);
        assert!(!file.syntax_errors.is_empty());
        assert!(rendered.contains(&file.syntax_errors[0].message));
    }
}
