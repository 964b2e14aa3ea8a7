#![forbid(unsafe_code)]
//! mtots language front end
//!
//! Lexing, parsing and type solving for the indentation-sensitive mtots language, plus an incremental module
//! registry for editor integrations and a small command-line front end.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **User errors never panic**: malformed source becomes diagnostics on the parsed file or solved module. Only a
//!   broken solver invariant is fatal, and it surfaces as [`frontend::solver::SolveError`], not a panic.

pub mod cli;
pub mod config;
pub mod frontend;
pub mod registry;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;
pub use frontend::solver;

pub use config::Config;
pub use registry::{Analysis, Registry, RegistryError};
