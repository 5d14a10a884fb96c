//! Recursive-descent parser over the token stream

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::Token;
use logos::Logos;
use rulelog_core::{Node, Rel, Rule, RuleSet, RuleSetBuilder, Term};
use rulelog_store::RelSource;
use std::collections::BTreeMap;
use std::ops::Range;

/// One parsed statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Fact(Rel<Node>),
    Rule(Rule<Node>),
}

/// Directives and statements of one document, in source order
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub base: Option<String>,
    pub prefixes: BTreeMap<String, String>,
    pub imports: Vec<String>,
    pub statements: Vec<(Statement, usize)>,
}

pub(crate) struct Parser<'s> {
    source: &'s str,
    tokens: Vec<(Token<'s>, Range<usize>)>,
    pos: usize,
    base: Option<String>,
    prefixes: BTreeMap<String, String>,
}

impl<'s> Parser<'s> {
    pub(crate) fn new(source: &'s str, prefixes: BTreeMap<String, String>) -> Result<Self, ParseError> {
        let mut tokens = Vec::new();
        let mut lexer = Token::lexer(source);
        while let Some(token) = lexer.next() {
            let span = lexer.span();
            match token {
                Ok(token) => tokens.push((token, span)),
                Err(()) => {
                    return Err(Self::error_at(
                        source,
                        span.start,
                        ParseErrorKind::InvalidToken(lexer.slice().to_string()),
                    ))
                }
            }
        }

        Ok(Self {
            source,
            tokens,
            pos: 0,
            base: None,
            prefixes,
        })
    }

    fn error_at(source: &str, offset: usize, kind: ParseErrorKind) -> ParseError {
        let before = &source[..offset.min(source.len())];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        ParseError {
            line,
            column: before[line_start..].chars().count() + 1,
            kind,
        }
    }

    /// Error located at byte `offset`
    pub(crate) fn error(&self, offset: usize, kind: ParseErrorKind) -> ParseError {
        Self::error_at(self.source, offset, kind)
    }

    /// Byte offset of the current token, or of the end of input
    pub(crate) fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.source.len(), |(_, span)| span.start)
    }

    fn peek(&self) -> Option<Token<'s>> {
        self.tokens.get(self.pos).map(|(token, _)| *token)
    }

    fn peek_second(&self) -> Option<Token<'s>> {
        self.tokens.get(self.pos + 1).map(|(token, _)| *token)
    }

    fn advance(&mut self) -> Option<Token<'s>> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let kind = match self.peek() {
            Some(found) => ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: found.to_string(),
            },
            None => ParseErrorKind::UnexpectedEnd {
                expected: expected.to_string(),
            },
        };
        self.error(self.offset(), kind)
    }

    fn expect(&mut self, expected: Token<'static>) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{}`", expected)))
        }
    }

    pub(crate) fn eat(&mut self, token: Token<'static>) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Parse a whole document
    pub(crate) fn document(mut self) -> Result<Document, ParseError> {
        let mut imports = Vec::new();
        let mut statements = Vec::new();

        while let Some(token) = self.peek() {
            match token {
                Token::Prefix => self.prefix_directive()?,
                Token::Base => {
                    self.advance();
                    let iri = self.iri_ref("a base IRI")?;
                    self.expect(Token::Dot)?;
                    self.base = Some(iri);
                }
                Token::Import => {
                    self.advance();
                    imports.push(self.iri_ref("an import IRI")?);
                    self.expect(Token::Dot)?;
                }
                _ => {
                    let start = self.offset();
                    statements.push((self.statement()?, start));
                }
            }
        }

        Ok(Document {
            base: self.base,
            prefixes: self.prefixes,
            imports,
            statements,
        })
    }

    fn prefix_directive(&mut self) -> Result<(), ParseError> {
        self.expect(Token::Prefix)?;
        let name = match self.peek() {
            Some(Token::PrefixedName(text)) if text.ends_with(':') => text.trim_end_matches(':').to_string(),
            _ => return Err(self.unexpected("a prefix name such as `ex:`")),
        };
        self.advance();
        let iri = self.iri_ref("a namespace IRI")?;
        self.expect(Token::Dot)?;
        self.prefixes.insert(name, iri);
        Ok(())
    }

    fn iri_ref(&mut self, expected: &str) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::Iri(text)) => {
                self.pos += 1;
                Ok(self.resolve_iri(&text[1..text.len() - 1]))
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Relative IRIs are joined onto the base when one is declared
    fn resolve_iri(&self, iri: &str) -> String {
        match &self.base {
            Some(base) if !iri.contains(':') => format!("{}{}", base, iri),
            _ => iri.to_string(),
        }
    }

    /// Declared prefixes expand; undeclared names are kept verbatim
    fn expand(&self, name: &str) -> String {
        match name.split_once(':') {
            Some((prefix, local)) => match self.prefixes.get(prefix) {
                Some(namespace) => format!("{}{}", namespace, local),
                None => name.to_string(),
            },
            None => name.to_string(),
        }
    }

    /// `atom .` or `atom <- atom, ... .`
    pub(crate) fn statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.offset();
        let head = self.atom()?;

        if self.eat(Token::Arrow) {
            let mut body = vec![self.atom()?];
            while self.eat(Token::Comma) {
                body.push(self.atom()?);
            }
            self.expect(Token::Dot)?;

            let rule = Rule::new(head, body);
            rule.check_safety().map_err(|err| self.error(start, err.into()))?;
            Ok(Statement::Rule(rule))
        } else {
            self.expect(Token::Dot)?;
            if !head.is_ground() {
                return Err(self.error(start, ParseErrorKind::NonGroundFact(head.to_string())));
            }
            Ok(Statement::Fact(head))
        }
    }

    /// `[name] ( term, ... )`
    pub(crate) fn atom(&mut self) -> Result<Rel<Node>, ParseError> {
        let start = self.offset();
        let name = match self.peek() {
            Some(Token::LParen) => None,
            Some(Token::Identifier(text)) if self.peek_second() == Some(Token::LParen) => {
                self.pos += 1;
                Some(text.to_string())
            }
            Some(Token::PrefixedName(text)) if self.peek_second() == Some(Token::LParen) => {
                self.pos += 1;
                Some(self.expand(text))
            }
            Some(Token::Iri(_)) if self.peek_second() == Some(Token::LParen) => Some(self.iri_ref("a relation name")?),
            _ => return Err(self.unexpected("a relation")),
        };

        self.expect(Token::LParen)?;
        let mut terms = Vec::new();
        if !self.eat(Token::RParen) {
            terms.push(self.term()?);
            while self.eat(Token::Comma) {
                terms.push(self.term()?);
            }
            self.expect(Token::RParen)?;
        }

        match name {
            Some(name) => Ok(Rel::new(name, terms)),
            None if terms.len() == 3 => Ok(Rel::new("", terms)),
            None => Err(self.error(start, ParseErrorKind::TripleArity(terms.len()))),
        }
    }

    fn term(&mut self) -> Result<Term<Node>, ParseError> {
        let term = match self.peek() {
            Some(Token::Variable(text)) => Term::var(text),
            Some(Token::Wildcard) => Term::Any,
            Some(Token::Iri(_)) => return self.iri_ref("a term").map(|iri| Term::Const(Node::new(iri))),
            Some(Token::PrefixedName(text)) => Term::Const(Node::new(self.expand(text))),
            Some(Token::Literal(text)) | Some(Token::Number(text)) | Some(Token::Identifier(text)) => {
                Term::Const(Node::new(text))
            }
            _ => return Err(self.unexpected("a term")),
        };
        self.pos += 1;
        Ok(term)
    }
}

/// Parse a rule document into a frozen rule set
///
/// Facts in the document become the rule set's embedded facts.
pub fn parse_rule_set(source: &str) -> Result<RuleSet<Node>, ParseError> {
    let document = parse_document(source)?;
    let mut builder = RuleSetBuilder::new();

    if let Some(base) = &document.base {
        builder.base(base.clone());
    }
    for (prefix, iri) in &document.prefixes {
        builder.prefix(prefix.clone(), iri.clone());
    }
    for import in &document.imports {
        builder.import(import.clone());
    }
    for (statement, _) in document.statements {
        match statement {
            Statement::Fact(fact) => builder.add_fact(fact),
            Statement::Rule(rule) => builder.add(rule),
        };
    }

    let rules = builder
        .build()
        .map_err(|err| Parser::error_at(source, source.len(), err.into()))?;
    tracing::debug!(
        rules = rules.len(),
        facts = rules.facts().len(),
        prefixes = rules.prefixes().len(),
        "parsed rule set"
    );
    Ok(rules)
}

/// Parse a document of ground facts into a store
pub fn parse_facts(source: &str) -> Result<rulelog_store::RelStore<Node>, ParseError> {
    let document = parse_document(source)?;
    let mut store = rulelog_store::RelStore::new();

    for (statement, offset) in document.statements {
        match statement {
            Statement::Fact(fact) => {
                store.add(fact);
            }
            Statement::Rule(_) => return Err(Parser::error_at(source, offset, ParseErrorKind::RuleInFacts)),
        }
    }

    tracing::debug!(facts = store.len(), "parsed facts");
    Ok(store)
}

/// Parse directives and statements without assembling them
pub fn parse_document(source: &str) -> Result<Document, ParseError> {
    Parser::new(source, BTreeMap::new())?.document()
}

/// Parse a single atom, e.g. a query pattern
///
/// A trailing `.` is accepted.
pub fn parse_atom(source: &str, prefixes: &BTreeMap<String, String>) -> Result<Rel<Node>, ParseError> {
    let mut parser = Parser::new(source, prefixes.clone())?;
    let atom = parser.atom()?;
    parser.eat(Token::Dot);
    if !parser.at_end() {
        return Err(parser.unexpected("end of input"));
    }
    Ok(atom)
}
