//! Token definitions for the type expression lexer.

use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // ==================== Keywords ====================
    #[token("arrayType")]
    KwArrayType,
    #[token("function")]
    KwFunction,
    #[token("object")]
    KwObject,

    // ==================== Delimiters ====================
    #[token("{|")]
    UnionOpen,
    #[token("|}")]
    UnionClose,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // ==================== Punctuation ====================
    #[token(",")]
    Comma,
    #[token("=")]
    Equals,
    #[token(":")]
    Colon,
    #[token("/")]
    Slash,

    // ==================== Atoms ====================
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"[0-9]+")]
    Integer,
}

impl Token {
    pub fn is_keyword(&self) -> bool {
        matches!(self, Token::KwArrayType | Token::KwFunction | Token::KwObject)
    }

    /// Tokens usable as a record/union label or function argument name.
    ///
    /// Keywords are only reserved in type position, so `{object = int}` is a
    /// valid record.
    pub fn is_label(&self) -> bool {
        matches!(self, Token::Identifier) || self.is_keyword()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Token::KwArrayType => "arrayType",
            Token::KwFunction => "function",
            Token::KwObject => "object",
            Token::UnionOpen => "{|",
            Token::UnionClose => "|}",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Comma => ",",
            Token::Equals => "=",
            Token::Colon => ":",
            Token::Slash => "/",
            Token::Identifier => "identifier",
            Token::Integer => "integer",
        };
        write!(f, "{}", s)
    }
}
