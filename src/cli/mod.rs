//! CLI module for the mtots front end
//!
//! This module provides the command-line interface over the lexer, parser and solver.
//!
//! ## Commands
//!
//! - `lex <file>` - Dump the token stream
//! - `parse <file>` - Dump the syntax tree as JSON
//! - `check <file>` - Solve the file and everything it imports, and report diagnostics
//!
//! A bare `<file>` argument is the same as `check <file>`.
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Front end for the mtots language
#[derive(Parser, Debug)]
#[command(name = "mtots")]
#[command(version = VERSION)]
#[command(about = "Lexer, parser and type solver for the mtots language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to check (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub lookup: LookupArgs,
}

/// Where imported modules are looked up.
#[derive(Args, Debug, Clone, Default)]
pub struct LookupArgs {
    /// Extra workspace root to search for modules (repeatable)
    #[arg(long = "root", value_name = "DIR", global = true)]
    pub roots: Vec<PathBuf>,

    /// Ignore the MTOTSPATH environment variable
    #[arg(long = "no-env-path", global = true)]
    pub no_env_path: bool,
}

impl LookupArgs {
    /// Lookup configuration for checking `file`: its own directory first, then the extra roots.
    pub fn config_for(&self, file: &std::path::Path) -> Config {
        let mut config = Config::new().with_root(crate::config::root_of(file));
        for root in &self.roots {
            config = config.with_root(root.clone());
        }
        if self.no_env_path {
            config = config.without_env_path();
        }
        config
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dump the token stream (debug)
    Lex {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Dump the syntax tree as JSON (debug)
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Solve a file and report diagnostics
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Some(Command::Lex { file }) => commands::lex_file(&file),
        Some(Command::Parse { file }) => commands::parse_file(&file),
        Some(Command::Check { file }) => commands::check_file(&file, &cli.lookup),
        None => match cli.file {
            Some(file) => commands::check_file(&file, &cli.lookup),
            // No command and no file - show help
            None => Err(CliError::new("", ExitCode::FAILURE)),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_lex() {
        let cli = Cli::try_parse_from(["mtots", "lex", "main.mtots"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Lex { .. })));
    }

    #[test]
    fn test_cli_parse_check_with_roots() {
        let cli = Cli::try_parse_from([
            "mtots",
            "check",
            "main.mtots",
            "--root",
            "lib",
            "--root",
            "vendor",
            "--no-env-path",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Command::Check { .. })));
        assert_eq!(cli.lookup.roots, vec![PathBuf::from("lib"), PathBuf::from("vendor")]);
        assert!(cli.lookup.no_env_path);
    }

    #[test]
    fn test_cli_default_file_is_checked() {
        let cli = Cli::try_parse_from(["mtots", "main.mtots"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.file, Some(PathBuf::from("main.mtots")));
    }

    #[test]
    fn test_lookup_config_starts_at_the_file_directory() {
        let args = LookupArgs {
            roots: vec![PathBuf::from("lib")],
            no_env_path: true,
        };
        let config = args.config_for(std::path::Path::new("proj/main.mtots"));
        assert_eq!(config.roots, vec![PathBuf::from("proj"), PathBuf::from("lib")]);
        assert!(!config.use_env_path);
    }
}
