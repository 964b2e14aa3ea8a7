//! Operator precedence and desugaring metadata.
//!
//! Expressions are parsed by precedence climbing over the levels below (lowest binds loosest). Binary operators
//! that are not short-circuiting desugar into method calls on magic methods; the comparison spellings normalize
//! onto `__eq__` and `__lt__` by swapping operands and/or negating the result.
//!
//! ## Examples
//! ```rust
//! use mtots_core::lang::magic_methods::MagicMethodId;
//! use mtots_core::lang::operators::{self, prec};
//! use mtots_core::lang::symbols::SymbolId;
//!
//! assert_eq!(operators::symbol_precedence(SymbolId::Plus), Some(prec::ADDITIVE));
//! let gt = operators::binary_method(SymbolId::Gt).unwrap();
//! assert_eq!(gt.method, MagicMethodId::Lt);
//! assert!(gt.swap && !gt.negate);
//! ```

use super::keywords::KeywordId;
use super::magic_methods::MagicMethodId;
use super::symbols::SymbolId;

/// Precedence levels, lowest first.
pub mod prec {
    /// Lowest level; nothing binds here.
    pub const NONE: u8 = 0;
    pub const OR: u8 = 1;
    pub const AND: u8 = 2;
    /// Operand level of prefix `not`.
    pub const UNARY_NOT: u8 = 3;
    /// `== != < > <= >= in not is as`
    pub const COMPARISON: u8 = 4;
    pub const SHIFT: u8 = 5;
    pub const BIT_AND: u8 = 6;
    pub const BIT_XOR: u8 = 7;
    pub const BIT_OR: u8 = 8;
    pub const ADDITIVE: u8 = 9;
    pub const MULTIPLICATIVE: u8 = 10;
    /// Operand level of prefix `- + ~`.
    pub const UNARY_MINUS: u8 = 11;
    pub const POWER: u8 = 12;
    /// `. ( [`
    pub const POSTFIX: u8 = 13;
    /// Operand level of a decorator expression.
    pub const PRIMARY: u8 = 14;
}

/// Associativity of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// How a binary symbol operator desugars.
///
/// `a OP b` becomes `a.method(b)`, or `b.method(a)` when `swap` is set, wrapped in a boolean `not` when `negate`
/// is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryMethod {
    pub method: MagicMethodId,
    pub swap: bool,
    pub negate: bool,
}

/// Infix precedence of a symbol, if it can continue an expression.
pub fn symbol_precedence(id: SymbolId) -> Option<u8> {
    let level = match id {
        SymbolId::EqEq | SymbolId::NotEq | SymbolId::Lt | SymbolId::Gt | SymbolId::LtEq | SymbolId::GtEq => {
            prec::COMPARISON
        }
        SymbolId::LtLt | SymbolId::GtGt => prec::SHIFT,
        SymbolId::Amp => prec::BIT_AND,
        SymbolId::Caret => prec::BIT_XOR,
        SymbolId::Pipe => prec::BIT_OR,
        SymbolId::Plus | SymbolId::Minus => prec::ADDITIVE,
        SymbolId::Star | SymbolId::Slash | SymbolId::SlashSlash | SymbolId::Percent => prec::MULTIPLICATIVE,
        SymbolId::StarStar => prec::POWER,
        SymbolId::Dot | SymbolId::LParen | SymbolId::LBracket => prec::POSTFIX,
        _ => return None,
    };
    Some(level)
}

/// Infix precedence of a word operator.
///
/// ## Notes
/// - `not` is listed because it begins the infix `not in`.
pub fn keyword_precedence(id: KeywordId) -> Option<u8> {
    match id {
        KeywordId::Or => Some(prec::OR),
        KeywordId::And => Some(prec::AND),
        KeywordId::In | KeywordId::Not | KeywordId::Is | KeywordId::As => Some(prec::COMPARISON),
        _ => None,
    }
}

/// Associativity of an infix symbol.
pub fn associativity(id: SymbolId) -> Associativity {
    match id {
        SymbolId::StarStar => Associativity::Right,
        _ => Associativity::Left,
    }
}

/// Desugaring of a binary symbol operator, or `None` for symbols that are not binary operators.
pub fn binary_method(id: SymbolId) -> Option<BinaryMethod> {
    let (method, swap, negate) = match id {
        SymbolId::EqEq => (MagicMethodId::Eq, false, false),
        SymbolId::NotEq => (MagicMethodId::Eq, false, true),
        SymbolId::Lt => (MagicMethodId::Lt, false, false),
        SymbolId::Gt => (MagicMethodId::Lt, true, false),
        SymbolId::LtEq => (MagicMethodId::Lt, true, true),
        SymbolId::GtEq => (MagicMethodId::Lt, false, true),
        SymbolId::LtLt => (MagicMethodId::LShift, false, false),
        SymbolId::GtGt => (MagicMethodId::RShift, false, false),
        SymbolId::Amp => (MagicMethodId::BitAnd, false, false),
        SymbolId::Caret => (MagicMethodId::BitXor, false, false),
        SymbolId::Pipe => (MagicMethodId::BitOr, false, false),
        SymbolId::Plus => (MagicMethodId::Add, false, false),
        SymbolId::Minus => (MagicMethodId::Sub, false, false),
        SymbolId::Star => (MagicMethodId::Mul, false, false),
        SymbolId::Slash => (MagicMethodId::Div, false, false),
        SymbolId::SlashSlash => (MagicMethodId::FloorDiv, false, false),
        SymbolId::Percent => (MagicMethodId::Mod, false, false),
        SymbolId::StarStar => (MagicMethodId::Pow, false, false),
        _ => return None,
    };
    Some(BinaryMethod { method, swap, negate })
}

/// Desugaring of a prefix symbol operator.
pub fn unary_method(id: SymbolId) -> Option<MagicMethodId> {
    match id {
        SymbolId::Minus => Some(MagicMethodId::Neg),
        SymbolId::Plus => Some(MagicMethodId::Pos),
        SymbolId::Tilde => Some(MagicMethodId::Not),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparisons_normalize_onto_eq_and_lt() {
        for id in [
            SymbolId::EqEq,
            SymbolId::NotEq,
            SymbolId::Lt,
            SymbolId::Gt,
            SymbolId::LtEq,
            SymbolId::GtEq,
        ] {
            let method = binary_method(id).map(|m| m.method);
            assert!(matches!(method, Some(MagicMethodId::Eq | MagicMethodId::Lt)), "{id:?}");
        }
    }

    #[test]
    fn only_power_is_right_associative() {
        assert_eq!(associativity(SymbolId::StarStar), Associativity::Right);
        assert_eq!(associativity(SymbolId::Minus), Associativity::Left);
    }
}
