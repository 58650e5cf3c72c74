//! type_lattice_parser
//!
//! Lexer and recursive-descent parser for the canonical textual rendering of
//! dataflow port types.
//!
//! The parser only builds a syntax tree; it does not know which names are
//! valid types. `type_lattice` lowers the tree into its `Type` values.
//!
//! # Example
//!
//! ```
//! use type_lattice_parser::{parse, TypeExprKind};
//!
//! let expr = parse("{x = double, y = int}").expect("parse failed");
//! assert!(matches!(expr.kind, TypeExprKind::Record(ref fields) if fields.len() == 2));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use ast::{FieldExpr, ObjectExpr, TypeExpr, TypeExprKind};
pub use error::{ParseError, ParseResult};
pub use lexer::{Lexer, SpannedToken};
pub use parser::Parser;
pub use span::{SourceMap, Span};
pub use token::Token;

/// Parse a single type expression.
pub fn parse(source: &str) -> ParseResult<TypeExpr> {
    Parser::new(source)?.parse()
}

/// Tokenize a type expression.
pub fn tokenize(source: &str) -> Vec<ParseResult<SpannedToken<'_>>> {
    lexer::tokenize(source)
}

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        let err = parse("int int").unwrap_err();
        assert!(
            matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "int"),
            "unexpected error: {:?}",
            err
        );
    }
}
