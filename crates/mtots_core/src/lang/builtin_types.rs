//! Builtin type names understood directly in type expressions.
//!
//! These names never need to be declared: the solver resolves them before consulting scope. They are also the
//! fixed prefix of type-position completion lists.

use crate::lang::registry::{LangItemInfo, item};

/// Stable identifier for builtin type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTypeId {
    Nil,
    Bool,
    Int,
    Float,
    Number,
    String,
    Any,
    Never,
    Class,
    Tuple,
    List,
    FrozenList,
    Optional,
    Union,
    Iteration,
    Iterable,
    Dict,
    FrozenDict,
    Function,
}

/// Metadata entry for a builtin type name.
pub type BuiltinTypeInfo = LangItemInfo<BuiltinTypeId>;

/// Registry of builtin type names, ordered by [`BuiltinTypeId`] discriminant.
pub const BUILTIN_TYPES: &[BuiltinTypeInfo] = &[
    item(BuiltinTypeId::Nil, "nil", "The type of `nil`."),
    item(BuiltinTypeId::Bool, "Bool", "`true` and `false`."),
    item(BuiltinTypeId::Int, "Int", "Alias of `Number`."),
    item(BuiltinTypeId::Float, "Float", "Alias of `Number`."),
    item(BuiltinTypeId::Number, "Number", "Double-precision number."),
    item(BuiltinTypeId::String, "String", "Text."),
    item(BuiltinTypeId::Any, "Any", "Top type; everything is assignable to it."),
    item(BuiltinTypeId::Never, "Never", "Bottom type; assignable to everything."),
    item(BuiltinTypeId::Class, "Class", "Metatype of every class."),
    item(BuiltinTypeId::Tuple, "Tuple", "`Tuple[A, B, ...]`."),
    item(BuiltinTypeId::List, "List", "`List[T]`."),
    item(BuiltinTypeId::FrozenList, "FrozenList", "`FrozenList[T]`."),
    item(BuiltinTypeId::Optional, "Optional", "`Optional[T]`, also written `T?`."),
    item(BuiltinTypeId::Union, "Union", "`Union[A, B]`, also written `A|B`."),
    item(BuiltinTypeId::Iteration, "Iteration", "`Iteration[T]`, a step result."),
    item(BuiltinTypeId::Iterable, "Iterable", "`Iterable[T]`."),
    item(BuiltinTypeId::Dict, "Dict", "`Dict[K, V]`."),
    item(BuiltinTypeId::FrozenDict, "FrozenDict", "`FrozenDict[K, V]`."),
    item(BuiltinTypeId::Function, "Function", "`Function[A, ..., R]`."),
];

/// Names offered (in order) at the front of a type-position completion list.
///
/// ## Notes
/// - `nil` repeats the value entry every completion list starts with.
pub const TYPE_COMPLETION_NAMES: &[&str] = &[
    "nil",
    "Bool",
    "Int",
    "Float",
    "Number",
    "String",
    "Any",
    "Never",
    "Class",
    "List",
    "FrozenList",
    "Optional",
    "Iteration",
    "Iterable",
    "Dict",
    "FrozenDict",
    "Function",
];

/// Resolve a builtin type name.
pub fn from_str(name: &str) -> Option<BuiltinTypeId> {
    BUILTIN_TYPES.iter().find(|t| t.canonical == name).map(|t| t.id)
}

/// Canonical spelling.
pub fn as_str(id: BuiltinTypeId) -> &'static str {
    info_for(id).canonical
}

/// Return the metadata entry for a builtin type name.
pub fn info_for(id: BuiltinTypeId) -> &'static BuiltinTypeInfo {
    &BUILTIN_TYPES[id as usize]
}
