//! Token types for the mtots lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Symbol(SymbolId)` for punctuation and operator symbols
//!
//! ## Notes
//! - ID-bearing tokens avoid stringly-typed checks in the parser.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use std::fmt;

use mtots_core::lang::keywords::{self, KeywordId};
use mtots_core::lang::symbols::{self, SymbolId};
use serde::Serialize;

use crate::position::Location;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer, with its literal payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    // ========== Keyword / symbol (ID-based) ==========
    Keyword(KeywordId),
    Symbol(SymbolId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Number(f64),
    String(String),

    /// A malformed token; the payload is the diagnostic message.
    Error(String),

    // ========== Layout ==========
    Newline,
    Indent,
    Dedent,
    Eof,
}

/// Payload-free token classification, used when the parser expects "a token of this type".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Keyword(KeywordId),
    Symbol(SymbolId),
    Ident,
    Number,
    String,
    Error,
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Keyword(id) => f.write_str(keywords::as_str(*id)),
            TokenType::Symbol(id) => f.write_str(symbols::as_str(*id)),
            TokenType::Ident => f.write_str("IDENTIFIER"),
            TokenType::Number => f.write_str("NUMBER"),
            TokenType::String => f.write_str("STRING"),
            TokenType::Error => f.write_str("ERROR"),
            TokenType::Newline => f.write_str("NEWLINE"),
            TokenType::Indent => f.write_str("INDENT"),
            TokenType::Dedent => f.write_str("DEDENT"),
            TokenType::Eof => f.write_str("EOF"),
        }
    }
}

/// A token with its kind and source location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Placeholder token of the given type, standing in for one the parser expected but did not find.
    pub fn placeholder(token_type: TokenType, location: Location) -> Self {
        let kind = match token_type {
            TokenType::Keyword(id) => TokenKind::Keyword(id),
            TokenType::Symbol(id) => TokenKind::Symbol(id),
            TokenType::Ident => TokenKind::Ident(MISSING.to_string()),
            TokenType::Number => TokenKind::Number(0.0),
            TokenType::String => TokenKind::String(MISSING.to_string()),
            TokenType::Error => TokenKind::Error(MISSING.to_string()),
            TokenType::Newline => TokenKind::Newline,
            TokenType::Indent => TokenKind::Indent,
            TokenType::Dedent => TokenKind::Dedent,
            TokenType::Eof => TokenKind::Eof,
        };
        Self { kind, location }
    }
}

/// Text given to placeholder identifiers and strings.
pub const MISSING: &str = "(missing)";

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
