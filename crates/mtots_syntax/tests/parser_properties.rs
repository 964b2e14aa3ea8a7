//! Property and snapshot tests for the syntax front end.
//!
//! The lexer and parser are total functions; these tests feed them arbitrary and half-written input.

use mtots_syntax::lexer::{self, TokenKind};
use mtots_syntax::parser;
use mtots_syntax::position::SourceId;
use proptest::prelude::*;

fn source_id() -> SourceId {
    SourceId::new("test.mtots")
}

/// Source-like text: identifiers, keywords, punctuation and layout characters.
fn source_text() -> impl Strategy<Value = String> {
    let fragments = prop::sample::select(vec![
        "def ", "class ", "trait ", "var ", "final ", "if ", "then ", "else ", "elif ", "while ", "for ", "in ",
        "return ", "import ", "from ", "as ", "not ", "and ", "or ", "is ", "nil ", "x", "y", "Int", "List", "(",
        ")", "[", "]", "{", "}", ":", ";", ",", ".", "=", "==", "+", "-", "**", "?", "|", "@", "1", "2.5", "'s'",
        "\"", "\n", "  ", " ", "#c", "$",
    ]);
    prop::collection::vec(fragments, 0..60).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn lexer_always_ends_with_eof(text in source_text()) {
        let tokens = lexer::lex(&source_id(), &text);
        prop_assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }

    #[test]
    fn indentation_tokens_balance(text in source_text()) {
        let tokens = lexer::lex(&source_id(), &text);
        let indents = tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
        let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        prop_assert_eq!(indents, dedents);
    }

    #[test]
    fn parser_is_total_and_stays_in_bounds(text in source_text()) {
        let file = parser::parse(&source_id(), &text);
        let end = text.len() as u32;
        for diagnostic in &file.syntax_errors {
            prop_assert!(diagnostic.location.range.start.index <= end);
            prop_assert!(diagnostic.location.range.end.index <= end);
        }
        for statement in &file.statements {
            prop_assert!(statement.location.range.start <= statement.location.range.end);
        }
    }
}

#[test]
fn syntax_error_listing() {
    let file = parser::parse(&source_id(), "x = $\n");
    let rendered = file
        .syntax_errors
        .iter()
        .map(|d| format!("{} {}: {}", d.location, d.kind, d.message))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    test.mtots:1:5 lexical error: Unrecognized token $
    test.mtots:1:6 syntax error: Expected expression but got 'NEWLINE'
    ");
}
