//! Parser for the mtots language
//!
//! Converts a token stream into a [`File`] AST. The parser never fails: malformed input produces diagnostics plus
//! placeholder nodes, so editor features keep working on half-written code.
//!
//! ## Examples
//!
//! ```rust
//! use mtots_syntax::parser;
//! use mtots_syntax::position::SourceId;
//!
//! let file = parser::parse(&SourceId::new("main.mtots"), "def add(a Int, b Int) Int:\n  return a + b\n");
//! assert!(file.syntax_errors.is_empty());
//! assert_eq!(file.statements.len(), 1);
//! ```

use mtots_core::lang::keywords::KeywordId;
use mtots_core::lang::magic_methods::{self, MagicMethodId};
use mtots_core::lang::operators::{self, Associativity, prec};
use mtots_core::lang::symbols::SymbolId;

use crate::ast::*;
use crate::diagnostics::Diagnostic;
use crate::lexer::{self, MISSING, Token, TokenKind, TokenType};
use crate::position::{Location, Position, Range, SourceId};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
