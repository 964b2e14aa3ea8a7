//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to make it easy
//! to work with ID-based tokens.

use mtots_core::lang::keywords::KeywordId;
use mtots_core::lang::symbols::SymbolId;

use crate::lexer::{Token, TokenKind, TokenType};

impl TokenKind {
    /// Payload-free classification of this token.
    pub fn token_type(&self) -> TokenType {
        match self {
            TokenKind::Keyword(id) => TokenType::Keyword(*id),
            TokenKind::Symbol(id) => TokenType::Symbol(*id),
            TokenKind::Ident(_) => TokenType::Ident,
            TokenKind::Number(_) => TokenType::Number,
            TokenKind::String(_) => TokenType::String,
            TokenKind::Error(_) => TokenType::Error,
            TokenKind::Newline => TokenType::Newline,
            TokenKind::Indent => TokenType::Indent,
            TokenKind::Dedent => TokenType::Dedent,
            TokenKind::Eof => TokenType::Eof,
        }
    }

    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return the symbol id, if this is a symbol token.
    pub fn symbol_id(&self) -> Option<SymbolId> {
        match self {
            TokenKind::Symbol(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given symbol.
    pub fn is_symbol(&self, id: SymbolId) -> bool {
        matches!(self, TokenKind::Symbol(s) if *s == id)
    }

    /// Return `true` if this token is layout rather than content.
    pub fn is_layout(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent)
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.token_type()`.
    pub fn token_type(&self) -> TokenType {
        self.kind.token_type()
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.kind.is_keyword(id)
    }

    /// Return `true` if this is the given symbol.
    pub fn is_symbol(&self, id: SymbolId) -> bool {
        self.kind.is_symbol(id)
    }

    /// Identifier text, if this is an identifier token.
    pub fn ident_name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// String literal value, if this is a string token.
    pub fn string_value(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::String(value) => Some(value),
            _ => None,
        }
    }
}
