//! Provide shared, pure vocabulary and semantic helpers for the mtots front end.
//!
//! This crate is intentionally small and dependency-free. It contains the canonical spellings the lexer, parser
//! and solver agree on, plus the numeric helpers used when folding constant expressions.
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global state, and no AST or IR types.
//! - Callers work with stable IDs (`KeywordId`, `SymbolId`, `MagicMethodId`, `BuiltinTypeId`) and look up
//!   spellings through the registry tables in [`lang`].

pub mod lang;
pub mod numeric;
