//! Diagnostics produced while lexing, parsing and solving.
//!
//! Every user-facing problem is a [`Diagnostic`]: a location, a message and the phase that produced it. None of
//! them stop the pipeline; they accumulate on the parsed file or solved module and are reported at warning
//! severity.

use std::fmt;

use miette::{LabeledSpan, Severity, SourceSpan};
use serde::Serialize;
use thiserror::Error;

use crate::position::Location;

/// A non-fatal problem found in user source.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{message}")]
pub struct Diagnostic {
    pub location: Location,
    pub message: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            kind,
        }
    }

    /// A malformed token reported by the lexer.
    pub fn lexical(location: Location, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Lexical, location, message)
    }

    pub fn syntax(location: Location, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Syntax, location, message)
    }

    /// An unresolved name, arity mismatch, type mismatch, and so on.
    pub fn semantic(location: Location, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Semantic, location, message)
    }

    /// Byte span of the diagnostic in its source text.
    pub fn source_span(&self) -> SourceSpan {
        let start = self.location.range.start.index as usize;
        let end = self.location.range.end.index as usize;
        (start, end.saturating_sub(start)).into()
    }
}

/// Phase that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    Semantic,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Lexical => write!(f, "lexical error"),
            DiagnosticKind::Syntax => write!(f, "syntax error"),
            DiagnosticKind::Semantic => write!(f, "type error"),
        }
    }
}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("mtots::{}", self.kind)))
    }

    // Diagnostics never block downstream use of a module.
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Warning)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.kind.to_string()),
            self.source_span(),
        ))))
    }
}
