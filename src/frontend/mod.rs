//! mtots compiler front end
//!
//! This module contains the semantic half of the front end:
//! - `ir`: the type arena and type algebra
//! - `scope`: lexical scopes of one module
//! - `solver`: name resolution and type checking of one file
//! - `module`: the solved form of a file
//! - `ide`: usages, signature help and completion points recorded while solving

// Syntax components are provided by the shared mtots_syntax crate.
pub use mtots_syntax::{ast, diagnostics, lexer, parser, position};

pub mod ide;
pub mod ir;
pub mod module;
pub mod scope;
pub mod solver;
