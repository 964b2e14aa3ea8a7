//! Define the reserved keyword vocabulary for mtots.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) recording canonical spellings and categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Several words are reserved without any grammar using them yet (`assert`, `try`, ...). They still lex as
//!   keywords so that they cannot be used as identifiers.
//! - Some reserved words are also "word operators" (e.g. `and`). If you need operator precedence, use
//!   [`crate::lang::operators`].
//!
//! ## Examples
//! ```rust
//! use mtots_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("trait"), Some(KeywordId::Trait));
//! assert_eq!(keywords::from_str("Trait"), None);
//! assert_eq!(keywords::as_str(KeywordId::Nil), "nil");
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum KeywordId {
    And,
    Class,
    Def,
    Elif,
    Else,
    False,
    For,
    If,
    Nil,
    Or,
    Return,
    Super,
    This,
    True,
    Var,
    While,
    As,
    Assert,
    Async,
    Await,
    Break,
    Continue,
    Del,
    Except,
    Final,
    Finally,
    From,
    Global,
    Import,
    In,
    Is,
    Lambda,
    Not,
    Pass,
    Raise,
    Static,
    Then,
    Trait,
    Try,
    With,
    Yield,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    ControlFlow,
    Definition,
    Import,
    Binding,
    Literal,
    Operator,
    /// Reserved for future use; no grammar rule consumes it.
    Reserved,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
}

/// Registry of all keywords, ordered by [`KeywordId`] discriminant.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::And, "and", KeywordCategory::Operator),
    info(KeywordId::Class, "class", KeywordCategory::Definition),
    info(KeywordId::Def, "def", KeywordCategory::Definition),
    info(KeywordId::Elif, "elif", KeywordCategory::ControlFlow),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow),
    info(KeywordId::False, "false", KeywordCategory::Literal),
    info(KeywordId::For, "for", KeywordCategory::ControlFlow),
    info(KeywordId::If, "if", KeywordCategory::ControlFlow),
    info(KeywordId::Nil, "nil", KeywordCategory::Literal),
    info(KeywordId::Or, "or", KeywordCategory::Operator),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow),
    info(KeywordId::Super, "super", KeywordCategory::Binding),
    info(KeywordId::This, "this", KeywordCategory::Binding),
    info(KeywordId::True, "true", KeywordCategory::Literal),
    info(KeywordId::Var, "var", KeywordCategory::Binding),
    info(KeywordId::While, "while", KeywordCategory::ControlFlow),
    info(KeywordId::As, "as", KeywordCategory::Operator),
    info(KeywordId::Assert, "assert", KeywordCategory::Reserved),
    info(KeywordId::Async, "async", KeywordCategory::Reserved),
    info(KeywordId::Await, "await", KeywordCategory::Reserved),
    info(KeywordId::Break, "break", KeywordCategory::Reserved),
    info(KeywordId::Continue, "continue", KeywordCategory::Reserved),
    info(KeywordId::Del, "del", KeywordCategory::Reserved),
    info(KeywordId::Except, "except", KeywordCategory::Reserved),
    info(KeywordId::Final, "final", KeywordCategory::Binding),
    info(KeywordId::Finally, "finally", KeywordCategory::Reserved),
    info(KeywordId::From, "from", KeywordCategory::Import),
    info(KeywordId::Global, "global", KeywordCategory::Reserved),
    info(KeywordId::Import, "import", KeywordCategory::Import),
    info(KeywordId::In, "in", KeywordCategory::Operator),
    info(KeywordId::Is, "is", KeywordCategory::Operator),
    info(KeywordId::Lambda, "lambda", KeywordCategory::Reserved),
    info(KeywordId::Not, "not", KeywordCategory::Operator),
    info(KeywordId::Pass, "pass", KeywordCategory::ControlFlow),
    info(KeywordId::Raise, "raise", KeywordCategory::ControlFlow),
    info(KeywordId::Static, "static", KeywordCategory::Definition),
    info(KeywordId::Then, "then", KeywordCategory::ControlFlow),
    info(KeywordId::Trait, "trait", KeywordCategory::Definition),
    info(KeywordId::Try, "try", KeywordCategory::Reserved),
    info(KeywordId::With, "with", KeywordCategory::Reserved),
    info(KeywordId::Yield, "yield", KeywordCategory::Reserved),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category of a keyword.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata entry.
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    &KEYWORDS[id as usize]
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if `s` is a reserved word, `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
    }
}
