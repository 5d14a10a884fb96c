//! Tokens of the rule syntax

use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token<'a> {
    #[token("@prefix")]
    Prefix,

    #[token("@base")]
    Base,

    #[token("@import")]
    Import,

    #[token("<-")]
    #[token(":-")]
    Arrow,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("_", priority = 3)]
    Wildcard,

    #[regex(r"\?[A-Za-z_][A-Za-z0-9_]*")]
    Variable(&'a str),

    #[regex(r"<[^<>\s]*>")]
    Iri(&'a str),

    #[regex(r"([A-Za-z][A-Za-z0-9_\-]*)?:([A-Za-z0-9_][A-Za-z0-9_\-]*)?")]
    PrefixedName(&'a str),

    #[regex(r#""([^"\\]|\\.)*""#)]
    Literal(&'a str),

    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number(&'a str),

    #[regex(r"[A-Za-z_][A-Za-z0-9_\-]*")]
    Identifier(&'a str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Prefix => f.write_str("@prefix"),
            Token::Base => f.write_str("@base"),
            Token::Import => f.write_str("@import"),
            Token::Arrow => f.write_str("<-"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::Dot => f.write_str("."),
            Token::Wildcard => f.write_str("_"),
            Token::Variable(text)
            | Token::Iri(text)
            | Token::PrefixedName(text)
            | Token::Literal(text)
            | Token::Number(text)
            | Token::Identifier(text) => f.write_str(text),
        }
    }
}
