//! String literal scanning.
//!
//! ## Notes
//! - `r"..."` disables unescaping; the backslash still protects the following character from ending the string.
//! - Three repeated quote characters open a triple-quoted string, which may span lines.
//! - Unknown escapes are kept verbatim (`\q` stays two characters).

use super::{Lexer, TokenKind};

impl<'a> Lexer<'a> {
    pub(super) fn scan_string(&mut self) {
        let raw = self.cur() == Some('r');
        if raw {
            self.bump();
        }
        let Some(quote_char) = self.cur() else {
            return;
        };
        let triple = self.peek_char(1) == Some(quote_char) && self.peek_char(2) == Some(quote_char);
        let quote_len = if triple { 3 } else { 1 };
        let quote: String = std::iter::repeat_n(quote_char, quote_len).collect();
        for _ in 0..quote_len {
            self.bump();
        }

        while self.cur().is_some() && !self.source[self.pos..].starts_with(&quote) {
            if self.cur() == Some('\\') {
                self.bump();
            }
            self.bump();
        }

        let body = self.slice(usize::from(raw) + quote.len());
        let value = if raw { body.to_string() } else { unescape(body) };

        if self.source[self.pos..].starts_with(&quote) {
            for _ in 0..quote_len {
                self.bump();
            }
        } else {
            self.emit(TokenKind::Error("Unterminated string literal".to_string()));
        }
        self.emit(TokenKind::String(value));
    }
}

/// Replace the two-character escapes `\n \t \r \" \' \\`.
pub(crate) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let replacement = match chars.peek() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('\\') => '\\',
            _ => {
                out.push(c);
                continue;
            }
        };
        chars.next();
        out.push(replacement);
    }
    out
}
