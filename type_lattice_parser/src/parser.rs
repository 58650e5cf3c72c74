//! Recursive descent parser for type expressions.
//!
//! Grammar (terminals quoted):
//!
//! ```text
//! type    := NAME
//!          | '[' NAME ']'
//!          | 'arrayType' '(' type [ ',' INT ] ')'
//!          | '{' type '}'
//!          | '{' [ field { ',' field } ] '}'
//!          | '{|' [ field { ',' field } ] '|}'
//!          | '(' 'function' '(' [ arg { ',' arg } ] ')' type ')'
//!          | 'object' [ '(' [ NAME { '/' NAME } ] ')' ]
//! field   := LABEL '=' type
//! arg     := LABEL ':' type
//! ```
//!
//! `{` is ambiguous between an array and a record; a label followed by `=`
//! selects the record reading.

use crate::ast::{FieldExpr, ObjectExpr, TypeExpr, TypeExprKind};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, SpannedToken};
use crate::span::Span;
use crate::token::Token;

#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Option<SpannedToken<'a>>,
    /// Span of the most recently consumed token
    previous: Span,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> ParseResult<Self> {
        let mut parser = Self {
            lexer: Lexer::new(source),
            current: None,
            previous: Span::default(),
        };
        parser.advance()?;
        Ok(parser)
    }

    /// Parse exactly one type expression spanning the whole input.
    pub fn parse(mut self) -> ParseResult<TypeExpr> {
        let expr = self.parse_type()?;
        match &self.current {
            None => Ok(expr),
            Some(tok) => Err(ParseError::unexpected_token(
                tok.text,
                "end of input",
                tok.span,
            )),
        }
    }

    // ==================== Token Management ====================

    fn advance(&mut self) -> ParseResult<Option<SpannedToken<'a>>> {
        let next = self.lexer.next_token().transpose()?;
        let prev = std::mem::replace(&mut self.current, next);
        if let Some(tok) = &prev {
            self.previous = tok.span;
        }
        Ok(prev)
    }

    fn check(&self, expected: Token) -> bool {
        self.current.as_ref().is_some_and(|t| t.token == expected)
    }

    fn peek_is(&mut self, expected: Token) -> ParseResult<bool> {
        match self.lexer.peek() {
            Some(Ok(tok)) => Ok(tok.token == expected),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(false),
        }
    }

    fn error_here(&self, expected: &str) -> ParseError {
        match &self.current {
            Some(tok) => ParseError::unexpected_token(tok.text, expected, tok.span),
            None => ParseError::unexpected_eof(expected, self.lexer.eof_span()),
        }
    }

    fn expect(&mut self, expected: Token) -> ParseResult<SpannedToken<'a>> {
        if self.check(expected) {
            if let Some(tok) = self.advance()? {
                return Ok(tok);
            }
        }
        Err(self.error_here(&format!("'{}'", expected)))
    }

    fn expect_label(&mut self) -> ParseResult<SpannedToken<'a>> {
        if self.current.as_ref().is_some_and(|t| t.token.is_label()) {
            if let Some(tok) = self.advance()? {
                return Ok(tok);
            }
        }
        Err(self.error_here("a label"))
    }

    fn span_from(&self, start: Span) -> Span {
        start.merge(&self.previous)
    }

    // ==================== Productions ====================

    fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        let Some(tok) = self.current.clone() else {
            return Err(self.error_here("a type"));
        };
        match tok.token {
            Token::Identifier => {
                self.advance()?;
                Ok(TypeExpr::new(TypeExprKind::Named(tok.text.to_string()), tok.span))
            }
            Token::LBracket => self.parse_matrix(tok.span),
            Token::KwArrayType => self.parse_sized_array(tok.span),
            Token::LBrace => self.parse_brace(tok.span),
            Token::UnionOpen => self.parse_union(tok.span),
            Token::LParen => self.parse_function(tok.span),
            Token::KwObject => self.parse_object(tok.span),
            _ => Err(self.error_here("a type")),
        }
    }

    fn parse_matrix(&mut self, start: Span) -> ParseResult<TypeExpr> {
        self.expect(Token::LBracket)?;
        let name = self.expect(Token::Identifier)?;
        self.expect(Token::RBracket)?;
        Ok(TypeExpr::new(
            TypeExprKind::Matrix(name.text.to_string()),
            self.span_from(start),
        ))
    }

    fn parse_sized_array(&mut self, start: Span) -> ParseResult<TypeExpr> {
        self.expect(Token::KwArrayType)?;
        self.expect(Token::LParen)?;
        let element = self.parse_type()?;
        let length = if self.check(Token::Comma) {
            self.advance()?;
            let lit = self.expect(Token::Integer)?;
            let n = lit.text.parse::<usize>().map_err(|_| ParseError::InvalidNumber {
                literal: lit.text.to_string(),
                span: lit.span,
            })?;
            Some(n)
        } else {
            None
        };
        self.expect(Token::RParen)?;
        Ok(TypeExpr::new(
            TypeExprKind::Array {
                element: Box::new(element),
                length,
            },
            self.span_from(start),
        ))
    }

    fn parse_brace(&mut self, start: Span) -> ParseResult<TypeExpr> {
        self.expect(Token::LBrace)?;

        if self.check(Token::RBrace) {
            self.advance()?;
            return Ok(TypeExpr::new(
                TypeExprKind::Record(Vec::new()),
                self.span_from(start),
            ));
        }

        let is_record = self.current.as_ref().is_some_and(|t| t.token.is_label())
            && self.peek_is(Token::Equals)?;
        if is_record {
            let fields = self.parse_fields(Token::Equals, Token::RBrace)?;
            return Ok(TypeExpr::new(
                TypeExprKind::Record(fields),
                self.span_from(start),
            ));
        }

        let element = self.parse_type()?;
        self.expect(Token::RBrace)?;
        Ok(TypeExpr::new(
            TypeExprKind::Array {
                element: Box::new(element),
                length: None,
            },
            self.span_from(start),
        ))
    }

    fn parse_union(&mut self, start: Span) -> ParseResult<TypeExpr> {
        self.expect(Token::UnionOpen)?;
        let fields = self.parse_fields(Token::Equals, Token::UnionClose)?;
        Ok(TypeExpr::new(
            TypeExprKind::Union(fields),
            self.span_from(start),
        ))
    }

    fn parse_function(&mut self, start: Span) -> ParseResult<TypeExpr> {
        self.expect(Token::LParen)?;
        self.expect(Token::KwFunction)?;
        self.expect(Token::LParen)?;
        let args = self.parse_fields(Token::Colon, Token::RParen)?;
        let ret = self.parse_type()?;
        self.expect(Token::RParen)?;
        Ok(TypeExpr::new(
            TypeExprKind::Function {
                args,
                ret: Box::new(ret),
            },
            self.span_from(start),
        ))
    }

    fn parse_object(&mut self, start: Span) -> ParseResult<TypeExpr> {
        self.expect(Token::KwObject)?;
        if !self.check(Token::LParen) {
            return Ok(TypeExpr::new(
                TypeExprKind::Object(ObjectExpr::Unconstrained),
                start,
            ));
        }
        self.advance()?;

        let mut path = Vec::new();
        if !self.check(Token::RParen) {
            path.push(self.expect(Token::Identifier)?.text.to_string());
            while self.check(Token::Slash) {
                self.advance()?;
                path.push(self.expect(Token::Identifier)?.text.to_string());
            }
        }
        self.expect(Token::RParen)?;

        let class = if path.is_empty() {
            ObjectExpr::Impossible
        } else {
            ObjectExpr::Class(path)
        };
        Ok(TypeExpr::new(
            TypeExprKind::Object(class),
            self.span_from(start),
        ))
    }

    /// Comma-separated `label <sep> type` list, consuming the closing token.
    fn parse_fields(&mut self, separator: Token, close: Token) -> ParseResult<Vec<FieldExpr>> {
        let mut fields = Vec::new();
        if self.check(close) {
            self.advance()?;
            return Ok(fields);
        }
        loop {
            let label = self.expect_label()?;
            self.expect(separator)?;
            let ty = self.parse_type()?;
            fields.push(FieldExpr {
                label: label.text.to_string(),
                span: label.span.merge(&ty.span),
                ty,
            });
            if self.check(Token::Comma) {
                self.advance()?;
                continue;
            }
            self.expect(close)?;
            return Ok(fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(source: &str) -> TypeExprKind {
        Parser::new(source).unwrap().parse().unwrap().kind
    }

    #[test]
    fn test_brace_with_label_is_record() {
        assert!(matches!(kind("{x = int}"), TypeExprKind::Record(f) if f.len() == 1));
    }

    #[test]
    fn test_brace_without_label_is_array() {
        assert!(matches!(
            kind("{int}"),
            TypeExprKind::Array { length: None, .. }
        ));
    }

    #[test]
    fn test_empty_braces_is_empty_record() {
        assert_eq!(kind("{}"), TypeExprKind::Record(Vec::new()));
    }

    #[test]
    fn test_keyword_label_in_record() {
        let TypeExprKind::Record(fields) = kind("{object = int}") else {
            panic!("expected record");
        };
        assert_eq!(fields[0].label, "object");
    }

    #[test]
    fn test_span_covers_whole_expression() {
        let expr = Parser::new("  arrayType(int,3)").unwrap().parse().unwrap();
        assert_eq!(expr.span.start, 2);
        assert_eq!(expr.span.end, 18);
    }
}
