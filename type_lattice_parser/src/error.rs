//! Parse error types

use crate::span::Span;
use thiserror::Error;

/// Errors produced while lexing or parsing a type expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected token '{found}' at {}:{}, expected {expected}", span.line, span.column)]
    UnexpectedToken {
        found: String,
        expected: String,
        span: Span,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    #[error("invalid array length '{literal}' at {}:{}", span.line, span.column)]
    InvalidNumber { literal: String, span: Span },

    #[error("unrecognized character at {}:{}", span.line, span.column)]
    LexerError { span: Span },
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEof { span, .. }
            | ParseError::InvalidNumber { span, .. }
            | ParseError::LexerError { span } => span,
        }
    }

    pub fn unexpected_token(
        found: impl Into<String>,
        expected: impl Into<String>,
        span: Span,
    ) -> Self {
        ParseError::UnexpectedToken {
            found: found.into(),
            expected: expected.into(),
            span,
        }
    }

    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        ParseError::UnexpectedEof {
            expected: expected.into(),
            span,
        }
    }

    /// Render the offending line with a caret marker under the error span.
    pub fn format_with_context(&self, source: &str) -> String {
        let span = self.span();
        let Some(line) = source.lines().nth(span.line.saturating_sub(1)) else {
            return String::new();
        };
        let col = span.column.saturating_sub(1);
        let width = span.len().clamp(1, line.len().saturating_sub(col).max(1));
        let gutter = " ".repeat(span.line.to_string().len());

        format!(
            "  {} | {}\n  {} | {}{}",
            span.line,
            line,
            gutter,
            " ".repeat(col),
            "^".repeat(width)
        )
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
