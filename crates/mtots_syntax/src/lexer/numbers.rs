//! Numeric literal scanning.
//!
//! Every number is a double. `0x` and `0b` prefixes introduce hexadecimal and binary integers; otherwise a
//! literal is digits with at most one fractional part. There is no exponent syntax.

use super::{Lexer, TokenKind};

impl<'a> Lexer<'a> {
    pub(super) fn scan_number(&mut self, first: char) {
        if first == '0' {
            let radix = match self.peek_char(1) {
                Some('x') => Some(16),
                Some('b') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.bump();
                self.bump();
                while self.cur().is_some_and(|c| c.is_digit(radix)) {
                    self.bump();
                }
                let value = parse_radix(self.slice(2), radix);
                self.emit(TokenKind::Number(value));
                return;
            }
        }
        while self.cur().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.cur() == Some('.') {
            self.bump();
            while self.cur().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        let value = self.slice(0).parse::<f64>().unwrap_or(f64::NAN);
        self.emit(TokenKind::Number(value));
    }
}

/// Accumulate digits in floating point so arbitrarily long literals cannot overflow; no digits is NaN.
fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d))
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};
    use crate::position::SourceId;

    fn number(source: &str) -> f64 {
        match lex(&SourceId::new("test"), source).first().map(|t| &t.kind) {
            Some(TokenKind::Number(value)) => *value,
            other => panic!("expected a number, got {other:?}"),
        }
    }

    #[test]
    fn decimal_and_fractional() {
        assert_eq!(number("42"), 42.0);
        assert_eq!(number("3.25"), 3.25);
        assert_eq!(number("7."), 7.0);
    }

    #[test]
    fn hex_and_binary() {
        assert_eq!(number("0xff"), 255.0);
        assert_eq!(number("0xFF"), 255.0);
        assert_eq!(number("0b101"), 5.0);
    }

    #[test]
    fn prefix_without_digits_is_nan() {
        assert!(number("0x").is_nan());
    }
}
