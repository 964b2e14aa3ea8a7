//! Compiler-recognized magic (dunder) method spellings.
//!
//! Operators desugar into calls on these names, so a type supports an operator exactly when its method table
//! defines the corresponding entry.

use crate::lang::registry::{LangItemInfo, item};

/// Stable identifier for magic methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagicMethodId {
    Eq,
    Lt,
    LShift,
    RShift,
    BitAnd,
    BitXor,
    BitOr,
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Neg,
    Pos,
    Not,
    Contains,
    GetItem,
    SetItem,
    Slice,
    Iter,
    Init,
    Len,
    Bmon,
}

/// Metadata entry for a magic method.
pub type MagicMethodInfo = LangItemInfo<MagicMethodId>;

/// Registry of recognized magic methods, ordered by [`MagicMethodId`] discriminant.
pub const MAGIC_METHODS: &[MagicMethodInfo] = &[
    item(MagicMethodId::Eq, "__eq__", "Equality; also backs `!=`."),
    item(MagicMethodId::Lt, "__lt__", "Ordering; backs `<`, `<=`, `>`, `>=`."),
    item(MagicMethodId::LShift, "__lshift__", "Left shift `<<`."),
    item(MagicMethodId::RShift, "__rshift__", "Right shift `>>`."),
    item(MagicMethodId::BitAnd, "__and__", "Bitwise and `&`."),
    item(MagicMethodId::BitXor, "__xor__", "Bitwise xor `^`."),
    item(MagicMethodId::BitOr, "__or__", "Bitwise or `|`."),
    item(MagicMethodId::Add, "__add__", "Addition `+`."),
    item(MagicMethodId::Sub, "__sub__", "Subtraction `-`."),
    item(MagicMethodId::Mul, "__mul__", "Multiplication `*`."),
    item(MagicMethodId::Div, "__div__", "Division `/`."),
    item(MagicMethodId::FloorDiv, "__floordiv__", "Floor division `//`."),
    item(MagicMethodId::Mod, "__mod__", "Modulo `%`."),
    item(MagicMethodId::Pow, "__pow__", "Power `**`."),
    item(MagicMethodId::Neg, "__neg__", "Unary minus."),
    item(MagicMethodId::Pos, "__pos__", "Unary plus."),
    item(MagicMethodId::Not, "__not__", "Unary `~`."),
    item(MagicMethodId::Contains, "__contains__", "Membership; backs `in` and `not in`."),
    item(MagicMethodId::GetItem, "__getitem__", "Subscript read `a[i]`."),
    item(MagicMethodId::SetItem, "__setitem__", "Subscript write `a[i] = v`."),
    item(MagicMethodId::Slice, "__slice__", "Slicing `a[i:j]`."),
    item(MagicMethodId::Iter, "__iter__", "Returns the step function driving a `for` loop."),
    item(MagicMethodId::Init, "__init__", "Constructor signature."),
    item(MagicMethodId::Len, "__len__", "Length of a container."),
    item(MagicMethodId::Bmon, "__bmon__", "Opaque builtin monitor hook on mutable containers."),
];

/// Resolve a magic method name to its stable id.
pub fn from_str(name: &str) -> Option<MagicMethodId> {
    MAGIC_METHODS.iter().find(|m| m.canonical == name).map(|m| m.id)
}

/// Return the canonical spelling for a magic method.
pub fn as_str(id: MagicMethodId) -> &'static str {
    info_for(id).canonical
}

/// Return the metadata entry for a magic method.
pub fn info_for(id: MagicMethodId) -> &'static MagicMethodInfo {
    &MAGIC_METHODS[id as usize]
}
