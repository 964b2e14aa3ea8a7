//! Syntax front end for the mtots language: positions, lexer, parser, AST, diagnostics.
//!
//! This crate is dependency-light and shared by the solver, the module registry and command-line tooling.
//!
//! ## Notes
//! - This crate is intentionally "syntax-only": it does not do name resolution or type checking.
//! - Both [`lexer::lex`] and [`parser::parse`] are total: malformed input becomes diagnostics embedded in the
//!   output, never a failure.
//! - Vocabulary identity (keywords/symbols/magic methods) comes from `mtots_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use mtots_syntax::parser;
//! use mtots_syntax::position::SourceId;
//!
//! let file = parser::parse(&SourceId::new("main.mtots"), "var x = 1\n");
//! assert!(file.syntax_errors.is_empty());
//! assert_eq!(file.statements.len(), 2);
//! ```
//!
//! ## See also
//! - `mtots_core::lang` for registry-backed language vocabulary.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod token_helpers;
