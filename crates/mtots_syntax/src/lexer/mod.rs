//! Lexer for the mtots language
//!
//! Handles tokenization including:
//! - Keywords and identifiers
//! - Number and string literals (raw and triple-quoted strings included)
//! - One- and two-character symbols
//! - Indentation-based blocks (INDENT/DEDENT tokens)
//!
//! ## Notes
//! - Lexing is total: malformed input becomes an `Error` token carrying the message, and scanning continues.
//! - The stream always ends with a synthetic `Newline` followed by `Eof`, so every statement terminator the parser
//!   expects can be satisfied.
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, TokenType, Token)
//! - `strings` - String literal scanning and unescaping
//! - `numbers` - Numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{MISSING, Token, TokenKind, TokenType, keyword_id};

use mtots_core::lang::symbols;

use crate::position::{Location, Position, Range, SourceId};

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Indentation is tracked as a pending delta rather than a stack:
//
// '\n' at depth 0 → emit NEWLINE → count spaces → indent_potential += new - old
//                                                         ↓
//                      next real token → flush INDENT/DEDENT × |indent_potential|
//
// The delta is only flushed in front of a real token (or EOF), so blank and comment-only lines never produce
// indentation tokens of their own.
// ============================================================================

/// Lexer for mtots source code.
pub struct Lexer<'a> {
    source_id: SourceId,
    source: &'a str,
    /// Byte offset of the next unread character.
    pos: usize,
    line: u32,
    column: u32,
    /// Start of the token being scanned.
    start: Position,
    /// Bracket nesting; newlines inside brackets are whitespace.
    depth: i32,
    indentation_level: i32,
    indent_potential: i32,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source_id: SourceId, source: &'a str) -> Self {
        Self {
            source_id,
            source,
            pos: 0,
            line: 0,
            column: 0,
            start: Position::default(),
            depth: 0,
            indentation_level: 0,
            indent_potential: 0,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source text.
    pub fn tokenize(mut self) -> Vec<Token> {
        loop {
            self.skip_spaces_and_comments();
            self.start = self.position();
            if self.cur() != Some('\n') {
                self.flush_indentation();
            }

            let Some(c) = self.cur() else {
                self.emit(TokenKind::Newline);
                // Close blocks left open by a file that ends without a trailing newline.
                while self.indentation_level > 0 {
                    self.indentation_level -= 1;
                    self.emit(TokenKind::Dedent);
                }
                self.emit(TokenKind::Eof);
                break;
            };
            self.scan_token(c);
        }
        self.tokens
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn cur(&self) -> Option<char> {
        self.peek_char(0)
    }

    fn peek_char(&self, ahead: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(ahead)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.cur()?;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += c.len_utf16() as u32;
        }
        self.pos += c.len_utf8();
        Some(c)
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column, self.pos as u32)
    }

    fn location(&self) -> Location {
        Location::new(self.source_id.clone(), Range::new(self.start, self.position()))
    }

    /// Text of the current token, skipping `skip` bytes of prefix.
    fn slice(&self, skip: usize) -> &'a str {
        let from = (self.start.index as usize + skip).min(self.pos);
        &self.source[from..self.pos]
    }

    fn emit(&mut self, kind: TokenKind) {
        let location = self.location();
        self.tokens.push(Token::new(kind, location));
    }

    fn is_space(&self, c: char) -> bool {
        match c {
            ' ' | '\t' | '\r' => true,
            '\n' => self.depth > 0,
            _ => false,
        }
    }

    fn skip_spaces_and_comments(&mut self) {
        loop {
            match self.cur() {
                Some(c) if self.is_space(c) => {
                    self.bump();
                }
                Some('#') => {
                    while self.cur().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn flush_indentation(&mut self) {
        while self.indent_potential > 0 {
            self.indent_potential -= 1;
            self.emit(TokenKind::Indent);
        }
        while self.indent_potential < 0 {
            self.indent_potential += 1;
            self.emit(TokenKind::Dedent);
        }
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self, c: char) {
        let next = self.peek_char(1);
        if c == '"' || c == '\'' || (c == 'r' && matches!(next, Some('"' | '\''))) {
            self.scan_string();
            return;
        }
        if is_ident_start(c) {
            self.scan_identifier();
            return;
        }
        if c.is_ascii_digit() {
            self.scan_number(c);
            return;
        }
        if let Some(single) = symbols::lex_symbol(c, None) {
            self.bump();
            match symbols::lex_symbol(c, self.cur()).filter(|id| *id != single) {
                Some(double) => {
                    self.bump();
                    self.emit(TokenKind::Symbol(double));
                }
                None => {
                    self.emit(TokenKind::Symbol(single));
                    self.depth += symbols::depth_delta(single);
                }
            }
            return;
        }
        if c == '\n' {
            self.scan_newline();
            return;
        }
        while self.cur().is_some_and(|c| !self.is_space(c)) {
            self.bump();
        }
        let message = format!("Unrecognized token {}", self.slice(0));
        self.emit(TokenKind::Error(message));
    }

    /// A significant newline: emit it, then measure the indentation of the next non-blank line.
    fn scan_newline(&mut self) {
        self.bump();
        self.emit(TokenKind::Newline);
        while matches!(self.cur(), Some('\r' | '\n')) {
            self.bump();
        }
        let mut space_count = 0;
        while self.cur() == Some(' ') {
            self.bump();
            space_count += 1;
        }
        if space_count % 2 != 0 {
            self.emit(TokenKind::Error(format!(
                "Indentations must always be a multiple of 2 but got {space_count}"
            )));
        }
        let new_level = space_count / 2;
        self.indent_potential += new_level - self.indentation_level;
        self.indentation_level = new_level;
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self) {
        while self.cur().is_some_and(is_ident_continue) {
            self.bump();
        }
        let spelling = self.slice(0);
        let kind = match keyword_id(spelling) {
            Some(id) => TokenKind::Keyword(id),
            None => TokenKind::Ident(spelling.to_string()),
        };
        self.emit(kind);
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source_id, source).tokenize()`.
#[tracing::instrument(skip_all, fields(source = %source_id, source_len = source.len()))]
pub fn lex(source_id: &SourceId, source: &str) -> Vec<Token> {
    Lexer::new(source_id.clone(), source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mtots_core::lang::keywords::{self, KeywordId};
    use mtots_core::lang::symbols::{SymbolId, SYMBOLS};

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(&SourceId::new("test"), source).into_iter().map(|t| t.kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.to_string())
    }

    #[test]
    fn test_keyword_registry_parity() {
        for k in keywords::KEYWORDS {
            let tokens = kinds(k.canonical);
            assert_eq!(
                tokens,
                vec![TokenKind::Keyword(k.id), TokenKind::Newline, TokenKind::Eof],
                "keyword {:?}",
                k.id
            );
        }
    }

    #[test]
    fn test_symbol_registry_parity() {
        for s in SYMBOLS {
            let tokens = kinds(s.canonical);
            assert_eq!(tokens[0], TokenKind::Symbol(s.id), "symbol {}", s.canonical);
            assert_eq!(tokens.len(), 3, "symbol {} should lex as one token", s.canonical);
        }
    }

    #[test]
    fn test_indented_block() {
        assert_eq!(
            kinds("var x = 1\n  y\n"),
            vec![
                TokenKind::Keyword(KeywordId::Var),
                ident("x"),
                TokenKind::Symbol(SymbolId::Eq),
                TokenKind::Number(1.0),
                TokenKind::Newline,
                TokenKind::Indent,
                ident("y"),
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_odd_indentation_is_reported_not_fatal() {
        for source in ["a\n b\n", "a\n   b\n"] {
            let tokens = kinds(source);
            assert!(
                tokens
                    .iter()
                    .any(|t| matches!(t, TokenKind::Error(m) if m.starts_with("Indentations must always be a multiple of 2"))),
                "{tokens:?}"
            );
            assert_eq!(tokens.last(), Some(&TokenKind::Eof));
        }
    }

    #[test]
    fn test_blank_and_comment_lines_do_not_indent() {
        let tokens = kinds("a\n\n    # comment\n\nb\n");
        assert!(!tokens.contains(&TokenKind::Indent), "{tokens:?}");
        assert!(!tokens.contains(&TokenKind::Dedent), "{tokens:?}");
    }

    #[test]
    fn test_missing_trailing_newline_still_closes_block() {
        assert_eq!(
            kinds("a\n  b"),
            vec![
                ident("a"),
                TokenKind::Newline,
                TokenKind::Indent,
                ident("b"),
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_newlines_inside_brackets_are_whitespace() {
        assert_eq!(
            kinds("f(a,\n  b)"),
            vec![
                ident("f"),
                TokenKind::Symbol(SymbolId::LParen),
                ident("a"),
                TokenKind::Symbol(SymbolId::Comma),
                ident("b"),
                TokenKind::Symbol(SymbolId::RParen),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_char_symbols_win() {
        assert_eq!(
            &kinds("a<=b")[..3],
            &[ident("a"), TokenKind::Symbol(SymbolId::LtEq), ident("b")]
        );
        assert_eq!(
            &kinds("a//b")[..3],
            &[ident("a"), TokenKind::Symbol(SymbolId::SlashSlash), ident("b")]
        );
    }

    #[test]
    fn test_unrecognized_token_consumes_to_space() {
        let tokens = kinds("$foo bar");
        assert_eq!(tokens[0], TokenKind::Error("Unrecognized token $foo".to_string()));
        assert_eq!(tokens[1], ident("bar"));
    }

    #[test]
    fn test_token_locations() {
        let tokens = lex(&SourceId::new("test"), "ab\n  cd");
        let cd = &tokens[3];
        assert_eq!(cd.kind, ident("cd"));
        assert_eq!(cd.location.range.start, Position::new(1, 2, 5));
        assert_eq!(cd.location.range.end, Position::new(1, 4, 7));
        // INDENT is zero-width, immediately before `cd`.
        assert_eq!(tokens[2].kind, TokenKind::Indent);
        assert_eq!(tokens[2].location.range.start, tokens[2].location.range.end);
    }

    #[test]
    fn test_tokens_serialize_with_vocabulary_names() {
        let tokens = lex(&SourceId::new("test"), "var x <= 1");
        let json = serde_json::to_value(&tokens[..3].iter().map(|t| &t.kind).collect::<Vec<_>>()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "Keyword": "Var" }, { "Ident": "x" }, { "Symbol": "LtEq" }])
        );
    }
}
