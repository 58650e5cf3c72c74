//! Lexer for type expressions
//!
//! Wraps the logos-generated lexer with spans and one token of lookahead.

use logos::Logos;

use crate::error::{ParseError, ParseResult};
use crate::span::{SourceMap, Span};
use crate::token::Token;

/// A token with its span
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub span: Span,
    pub text: &'a str,
}

pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Token>,
    source_map: SourceMap,
    peeked: Option<ParseResult<SpannedToken<'a>>>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("source", &self.source)
            .field("peeked", &self.peeked)
            .finish_non_exhaustive()
    }
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            source_map: SourceMap::new(source),
            peeked: None,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Zero-width span at the end of input, used for EOF errors.
    pub fn eof_span(&self) -> Span {
        let end = self.source.len();
        self.source_map.span(end, end)
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> Option<&ParseResult<SpannedToken<'a>>> {
        if self.peeked.is_none() {
            self.peeked = self.lex_one();
        }
        self.peeked.as_ref()
    }

    pub fn next_token(&mut self) -> Option<ParseResult<SpannedToken<'a>>> {
        match self.peeked.take() {
            Some(peeked) => Some(peeked),
            None => self.lex_one(),
        }
    }

    fn lex_one(&mut self) -> Option<ParseResult<SpannedToken<'a>>> {
        let result = self.inner.next()?;
        let range = self.inner.span();
        let span = self.source_map.span(range.start, range.end);
        Some(match result {
            Ok(token) => Ok(SpannedToken {
                token,
                span,
                text: &self.source[range],
            }),
            Err(()) => Err(ParseError::LexerError { span }),
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = ParseResult<SpannedToken<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize a whole type expression.
pub fn tokenize(source: &str) -> Vec<ParseResult<SpannedToken<'_>>> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("[int]");
        assert_eq!(lexer.peek().unwrap().as_ref().unwrap().token, Token::LBracket);
        assert_eq!(lexer.next_token().unwrap().unwrap().token, Token::LBracket);
        let ident = lexer.next_token().unwrap().unwrap();
        assert_eq!(ident.token, Token::Identifier);
        assert_eq!(ident.text, "int");
        assert_eq!(ident.span, Span::new(1, 4, 1, 2));
    }

    #[test]
    fn test_tokenize_reports_lexer_errors() {
        let tokens = tokenize("{x = #}");
        assert!(tokens
            .iter()
            .any(|t| matches!(t, Err(ParseError::LexerError { .. }))));
    }
}
