use std::fmt;

use thiserror::Error;

/// A byte offset range into a query string.
pub type Span = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JSONPathErrorType {
    /// Lexical or grammatical malformation of a query.
    SyntaxError,
    /// A filter expression or function call that is not well-typed.
    TypeError,
}

impl fmt::Display for JSONPathErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JSONPathErrorType::SyntaxError => f.write_str("syntax error:"),
            JSONPathErrorType::TypeError => f.write_str("type error:"),
        }
    }
}

/// An error raised while compiling a JSONPath query.
///
/// `span` is a pair of byte offsets pointing at the offending part of the
/// query string. Evaluating a compiled query never fails.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} {msg} ({})", display_span(.span))]
pub struct JSONPathError {
    pub kind: JSONPathErrorType,
    pub msg: String,
    pub span: Span,
}

fn display_span(span: &Span) -> String {
    format!("{}..{}", span.0, span.1)
}

impl JSONPathError {
    pub fn new(kind: JSONPathErrorType, msg: String, span: Span) -> Self {
        Self { kind, msg, span }
    }

    pub fn syntax(msg: String, span: Span) -> Self {
        Self::new(JSONPathErrorType::SyntaxError, msg, span)
    }

    pub fn typ(msg: String, span: Span) -> Self {
        Self::new(JSONPathErrorType::TypeError, msg, span)
    }
}
