//! Symbol (punctuation and operator) vocabulary.
//!
//! Every non-word token the lexer can produce is listed here, one- and two-character spellings alike.
//!
//! ## Notes
//! - The lexer matches greedily: a two-character spelling wins over its one-character prefix (see [`lex_symbol`]).
//! - Only the single-character brackets change the lexer's nesting depth.
//!
//! ## Examples
//! ```rust
//! use mtots_core::lang::symbols::{self, SymbolId};
//!
//! assert_eq!(symbols::from_str("<="), Some(SymbolId::LtEq));
//! assert_eq!(symbols::lex_symbol('<', Some('=')), Some(SymbolId::LtEq));
//! assert_eq!(symbols::lex_symbol('<', Some(' ')), Some(SymbolId::Lt));
//! assert_eq!(symbols::lex_symbol('$', None), None);
//! ```

/// Stable identifier for every symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SymbolId {
    // One character
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Colon,
    Semicolon,
    Comma,
    Dot,
    Minus,
    Plus,
    Slash,
    Percent,
    Star,
    At,
    Pipe,
    Amp,
    Caret,
    Tilde,
    Question,
    Bang,
    Eq,
    Lt,
    Gt,

    // Two characters
    SlashSlash,
    StarStar,
    NotEq,
    EqEq,
    LtLt,
    LtEq,
    GtGt,
    GtEq,
}

/// Coarse role of a symbol, for tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Bracket,
    Delimiter,
    Operator,
}

/// Metadata for a symbol.
#[derive(Debug, Clone, Copy)]
pub struct SymbolInfo {
    pub id: SymbolId,
    pub canonical: &'static str,
    pub kind: SymbolKind,
}

/// Registry of all symbols, ordered by [`SymbolId`] discriminant.
pub const SYMBOLS: &[SymbolInfo] = &[
    info(SymbolId::LParen, "(", SymbolKind::Bracket),
    info(SymbolId::RParen, ")", SymbolKind::Bracket),
    info(SymbolId::LBracket, "[", SymbolKind::Bracket),
    info(SymbolId::RBracket, "]", SymbolKind::Bracket),
    info(SymbolId::LBrace, "{", SymbolKind::Bracket),
    info(SymbolId::RBrace, "}", SymbolKind::Bracket),
    info(SymbolId::Colon, ":", SymbolKind::Delimiter),
    info(SymbolId::Semicolon, ";", SymbolKind::Delimiter),
    info(SymbolId::Comma, ",", SymbolKind::Delimiter),
    info(SymbolId::Dot, ".", SymbolKind::Delimiter),
    info(SymbolId::Minus, "-", SymbolKind::Operator),
    info(SymbolId::Plus, "+", SymbolKind::Operator),
    info(SymbolId::Slash, "/", SymbolKind::Operator),
    info(SymbolId::Percent, "%", SymbolKind::Operator),
    info(SymbolId::Star, "*", SymbolKind::Operator),
    info(SymbolId::At, "@", SymbolKind::Delimiter),
    info(SymbolId::Pipe, "|", SymbolKind::Operator),
    info(SymbolId::Amp, "&", SymbolKind::Operator),
    info(SymbolId::Caret, "^", SymbolKind::Operator),
    info(SymbolId::Tilde, "~", SymbolKind::Operator),
    info(SymbolId::Question, "?", SymbolKind::Operator),
    info(SymbolId::Bang, "!", SymbolKind::Operator),
    info(SymbolId::Eq, "=", SymbolKind::Delimiter),
    info(SymbolId::Lt, "<", SymbolKind::Operator),
    info(SymbolId::Gt, ">", SymbolKind::Operator),
    info(SymbolId::SlashSlash, "//", SymbolKind::Operator),
    info(SymbolId::StarStar, "**", SymbolKind::Operator),
    info(SymbolId::NotEq, "!=", SymbolKind::Operator),
    info(SymbolId::EqEq, "==", SymbolKind::Operator),
    info(SymbolId::LtLt, "<<", SymbolKind::Operator),
    info(SymbolId::LtEq, "<=", SymbolKind::Operator),
    info(SymbolId::GtGt, ">>", SymbolKind::Operator),
    info(SymbolId::GtEq, ">=", SymbolKind::Operator),
];

/// Canonical spelling.
pub fn as_str(id: SymbolId) -> &'static str {
    info_for(id).canonical
}

/// Full metadata entry.
pub fn info_for(id: SymbolId) -> &'static SymbolInfo {
    &SYMBOLS[id as usize]
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<SymbolId> {
    SYMBOLS.iter().find(|info| info.canonical == s).map(|info| info.id)
}

/// Match the symbol starting at `first`, preferring a two-character spelling when `second` completes one.
pub fn lex_symbol(first: char, second: Option<char>) -> Option<SymbolId> {
    if let Some(second) = second {
        let mut buf = [0u8; 8];
        let len = first.encode_utf8(&mut buf).len();
        let len = len + second.encode_utf8(&mut buf[len..]).len();
        if let Some(id) = std::str::from_utf8(&buf[..len]).ok().and_then(from_str) {
            return Some(id);
        }
    }
    let mut buf = [0u8; 4];
    from_str(first.encode_utf8(&mut buf))
}

/// Change in bracket nesting depth caused by this symbol.
pub fn depth_delta(id: SymbolId) -> i32 {
    match id {
        SymbolId::LParen | SymbolId::LBracket | SymbolId::LBrace => 1,
        SymbolId::RParen | SymbolId::RBracket | SymbolId::RBrace => -1,
        _ => 0,
    }
}

// --- helpers -----------------------------------------------------------------

const fn info(id: SymbolId, canonical: &'static str, kind: SymbolKind) -> SymbolInfo {
    SymbolInfo { id, canonical, kind }
}
