//! mtots language vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: reserved keywords, symbols, operator
//! precedence, magic (dunder) methods, builtin type names and module naming conventions.
//!
//! The design goal is to avoid stringly-typed checks scattered across the lexer, parser and solver.
//! Callers work with **stable IDs** (e.g. `KeywordId`, `SymbolId`) and look up spellings/metadata via
//! registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - Every table is ordered by its ID's discriminant, so lookups by ID are direct indexing. The guardrail tests in
//!   `tests/lang_registry_guardrails.rs` keep that ordering honest.
//!
//! ## Examples
//! ```rust
//! use mtots_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("while"), Some(KeywordId::While));
//! assert_eq!(keywords::as_str(KeywordId::While), "while");
//! ```

pub mod builtin_types;
pub mod conventions;
pub mod keywords;
pub mod magic_methods;
pub mod operators;
pub mod registry;
pub mod symbols;
