//! Property-based tests for the mtots front end
//!
//! Every stage must be total: arbitrary input becomes diagnostics, never a panic or a fatal error.

use std::sync::Arc;

use indexmap::IndexMap;
use mtots::frontend::ir::Types;
use mtots::frontend::position::SourceId;
use mtots::lexer::{self, TokenKind};
use mtots::{parser, solver};
use mtots_core::lang::keywords;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Lines built from real tokens, so the parser gets past the lexer often enough to be interesting.
fn token_soup() -> impl Strategy<Value = String> {
    let piece = prop::sample::select(vec![
        "var", "final", "def", "class", "trait", "if", "else", "while", "for", "in", "return", "import", "from",
        "x", "y", "f", "Number", "List", "1", "2.5", "\"s\"", "(", ")", "[", "]", ",", ":", ".", "=", "+", "-", "*",
        "<", "==", "and", "or", "not", "nil", "true", "\n", "\n  ", "\n    ",
    ]);
    prop::collection::vec(piece, 0..40).prop_map(|pieces| pieces.join(" "))
}

fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}".prop_filter("Not a keyword", |s| keywords::from_str(s).is_none() && s != "copy")
}

fn solve_str(source: &str) -> Result<usize, solver::SolveError> {
    let file = Arc::new(parser::parse(&SourceId::new("prop.mtots"), source));
    let mut types = Types::default();
    let module = solver::solve("__main__", file, &IndexMap::new(), &mut types)?;
    Ok(module.errors.len())
}

// =============================================================================
// Lexer
// =============================================================================

proptest! {
    /// Property: the lexer accepts any input and always ends with EOF
    #[test]
    fn lexer_is_total(source in any::<String>()) {
        let tokens = lexer::lex(&SourceId::new("prop.mtots"), &source);
        prop_assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }

    /// Property: indents and dedents always balance
    #[test]
    fn indents_balance(source in token_soup()) {
        let tokens = lexer::lex(&SourceId::new("prop.mtots"), &source);
        let indents = tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
        let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        prop_assert_eq!(indents, dedents);
    }
}

// =============================================================================
// Parser and solver
// =============================================================================

proptest! {
    /// Property: the parser accepts any input
    #[test]
    fn parser_is_total(source in any::<String>()) {
        let _file = parser::parse(&SourceId::new("prop.mtots"), &source);
    }

    /// Property: malformed programs become diagnostics, never a solver failure
    #[test]
    fn solver_is_total_on_token_soup(source in token_soup()) {
        prop_assert!(solve_str(&source).is_ok());
    }

    /// Property: a well-formed declaration followed by its use solves cleanly
    #[test]
    fn declared_names_resolve(name in ident_strategy(), value in 0u32..1000) {
        let source = format!("final {name} = {value}\nvar copy = {name}\n");
        prop_assert_eq!(solve_str(&source).ok(), Some(0));
    }
}
