//! Type algebra for the mtots solver.
//!
//! Every type the solver produces lives in a [`Types`] arena and is addressed by a [`TypeId`]. Shapes that point
//! back at each other (an instance type and its class metatype, a bound instance and its lazily bound members)
//! store indices rather than owning references, and lazy memoization goes into side tables on the arena.
//!
//! ## Notes
//!
//! - **Identity vs structure**: `TypeId` equality is identity. Structural equality (two `List[Number]` created
//!   independently) is [`Types::equals`]. Class-like shapes, literals and type variables compare by identity only.
//! - **Reserved ids**: `Any`, `Never`, the primitives, the `Class` metatype and the untyped list are allocated first
//!   by [`Types::new`] and are available as associated constants on [`TypeId`].
//! - **Arena lifetime**: an arena only grows. A solved module keeps referring to ids of the arena it was solved
//!   against, so the registry keeps one arena per document across refreshes.
//!
//! ## See also
//!
//! - [`relate`]: assignability, merging and union canonicalization
//! - [`binder`]: generic substitution
//! - [`display`]: rendering types and hover text

pub mod binder;
pub mod display;
pub mod members;
pub mod relate;
pub mod store;

#[cfg(test)]
mod tests;

use mtots_syntax::ast::Ident;
use mtots_syntax::position::Location;

pub use binder::Binder;
pub use display::{DisplayType, format_variable, render_const};
pub use store::{
    BoundInstanceType, FrozenDictLiteralType, FunctionType, InstanceType, LiteralType, ModuleKey, ModuleType,
    PrimitiveType, TypeData, TypeId, TypeVariable, Types,
};

/// Compile-time constant value carried by literal types and parameter defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
}

impl ConstValue {
    /// The primitive type a literal of this value narrows.
    pub fn primitive(&self) -> TypeId {
        match self {
            ConstValue::Nil => TypeId::NIL,
            ConstValue::Bool(_) => TypeId::BOOL,
            ConstValue::Number(_) => TypeId::NUMBER,
            ConstValue::String(_) => TypeId::STRING,
        }
    }
}

/// A named, typed binding: locals, parameters, fields, methods and type parameters alike.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub is_final: bool,
    /// Declaring identifier. Builtin members point at the `(builtin)` source.
    pub identifier: Ident,
    pub type_id: TypeId,
    pub documentation: Option<String>,
}

impl Variable {
    pub fn new(is_final: bool, identifier: Ident, type_id: TypeId, documentation: Option<String>) -> Self {
        Self {
            is_final,
            identifier,
            type_id,
            documentation,
        }
    }

    pub fn name(&self) -> &str {
        &self.identifier.name
    }

    /// Where "go to definition" should land, or `None` for compiler-provided bindings.
    pub fn definition_location(&self) -> Option<&Location> {
        if self.identifier.location.is_builtin() {
            None
        } else {
            Some(&self.identifier.location)
        }
    }
}

/// One parameter of a function type.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub identifier: Ident,
    pub type_id: TypeId,
    /// A parameter with a default is optional at call sites.
    pub default: Option<ConstValue>,
}

impl Parameter {
    pub fn new(identifier: Ident, type_id: TypeId, default: Option<ConstValue>) -> Self {
        Self {
            identifier,
            type_id,
            default,
        }
    }
}

/// Identifier for a compiler-provided member.
pub(crate) fn builtin_ident(name: &str) -> Ident {
    Ident::synthetic(name, Location::builtin())
}
