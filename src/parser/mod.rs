//! Recursive-descent PHP parser producing a [`Tree`].
//!
//! The grammar is split across submodules: statements, declarations
//! (namespaces, classes, functions, types) and expressions. Every
//! production yields a node of exactly one [`Kind`].

mod declaration;
mod expression;
mod statement;

use std::fmt;

use crate::punctuator::{Keyword, Punctuator, TokenValue};
use crate::token::{Span, Token, TokenKind};
use crate::tree::{Kind, Tree};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A specific construct was required but another token was found.
    Expected { expected: String, found: String },
    /// Input ended while a construct was still open.
    UnexpectedEof { expected: String },
    /// A token that cannot start the construct being parsed.
    UnexpectedToken { found: String },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected { expected, found } => {
                write!(f, "expected {expected}, got '{found}'")
            }
            Self::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input, expected {expected}")
            }
            Self::UnexpectedToken { found } => {
                write!(f, "unexpected '{found}'")
            }
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Parse a token stream into a `CompilationUnit` tree.
///
/// The stream must end with the [`TokenKind::Eof`] token appended by
/// the lexer.
///
/// # Errors
///
/// Returns the first syntax error; no partial tree is produced.
pub fn parse(tokens: &[Token]) -> Result<Tree, ParseError> {
    match tokens.last() {
        Some(last) if last.kind == TokenKind::Eof => Parser::new(tokens).compilation_unit(),
        last => Err(ParseError {
            kind: ParseErrorKind::UnexpectedEof {
                expected: "end-of-file token".to_string(),
            },
            span: last.map(Token::end).unwrap_or_default(),
        }),
    }
}

pub(crate) fn is_punctuator(token: &Token, punctuator: Punctuator) -> bool {
    token.kind == TokenKind::Punctuator && punctuator.matches(&token.text)
}

pub(crate) fn is_keyword(token: &Token, keyword: Keyword) -> bool {
    token.kind == TokenKind::Identifier && keyword.matches(&token.text)
}

type PResult = Result<Tree, ParseError>;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn compilation_unit(mut self) -> PResult {
        let mut children = Vec::new();
        while !self.at_eof() {
            children.push(Some(self.statement()?));
        }
        children.push(Some(self.token()));
        Ok(Tree::node(Kind::CompilationUnit, children))
    }

    // -- cursor

    fn peek(&self) -> &'a Token {
        self.peek_at(0)
    }

    /// Token `offset` places ahead; clamps to the end-of-file token.
    fn peek_at(&self, offset: usize) -> &'a Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn at(&self, punctuator: Punctuator) -> bool {
        is_punctuator(self.peek(), punctuator)
    }

    fn nth_at(&self, offset: usize, punctuator: Punctuator) -> bool {
        is_punctuator(self.peek_at(offset), punctuator)
    }

    fn at_any(&self, punctuators: &[Punctuator]) -> bool {
        punctuators.iter().any(|p| self.at(*p))
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        is_keyword(self.peek(), keyword)
    }

    fn nth_keyword(&self, offset: usize, keyword: Keyword) -> bool {
        is_keyword(self.peek_at(offset), keyword)
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn bump(&mut self) -> &'a Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn leaf(&mut self, kind: Kind) -> Tree {
        Tree::leaf(kind, self.bump().clone())
    }

    /// Consume the current token as a plain `Token` leaf.
    fn token(&mut self) -> Tree {
        self.leaf(Kind::Token)
    }

    fn eat(&mut self, punctuator: Punctuator) -> Option<Tree> {
        self.at(punctuator).then(|| self.token())
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> Option<Tree> {
        self.at_keyword(keyword).then(|| self.token())
    }

    fn expect(&mut self, punctuator: Punctuator) -> PResult {
        if self.at(punctuator) {
            Ok(self.token())
        } else {
            Err(self.expected(&format!("'{}'", punctuator.value())))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> PResult {
        if self.at_keyword(keyword) {
            Ok(self.token())
        } else {
            Err(self.expected(&format!("'{}'", keyword.value())))
        }
    }

    fn expect_variable(&mut self) -> PResult {
        if self.at_kind(TokenKind::Variable) {
            Ok(self.leaf(Kind::VariableIdentifier))
        } else {
            Err(self.expected("variable"))
        }
    }

    /// Any identifier, keywords included.
    fn expect_identifier(&mut self) -> PResult {
        if self.at_kind(TokenKind::Identifier) {
            Ok(self.leaf(Kind::NameIdentifier))
        } else {
            Err(self.expected("identifier"))
        }
    }

    /// A simple or qualified name.
    fn expect_name(&mut self) -> PResult {
        if self.at_kind(TokenKind::Identifier) {
            let kind = if self.peek().text.contains('\\') {
                Kind::NamespaceName
            } else {
                Kind::NameIdentifier
            };
            Ok(self.leaf(kind))
        } else {
            Err(self.expected("name"))
        }
    }

    fn expected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let kind = if token.kind == TokenKind::Eof {
            ParseErrorKind::UnexpectedEof {
                expected: expected.to_string(),
            }
        } else {
            ParseErrorKind::Expected {
                expected: expected.to_string(),
                found: token.text.clone(),
            }
        };
        ParseError {
            kind,
            span: token.span,
        }
    }

    fn unexpected(&self, context: &str) -> ParseError {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            return self.expected(context);
        }
        ParseError {
            kind: ParseErrorKind::UnexpectedToken {
                found: token.text.clone(),
            },
            span: token.span,
        }
    }

    // -- shared productions

    /// `;` or `?>`.
    fn at_eos(&self) -> bool {
        self.at(Punctuator::Semicolon) || self.at_kind(TokenKind::CloseTag)
    }

    fn eos(&mut self) -> PResult {
        if self.at_eos() {
            Ok(self.token())
        } else {
            Err(self.expected("';'"))
        }
    }

    /// Comma-separated elements up to (not including) one of `close`.
    ///
    /// A trailing comma is accepted. With `allow_empty`, elements may be
    /// omitted (`list(, $b)`), leaving a `None` slot.
    fn separated_list(
        &mut self,
        close: &[Punctuator],
        allow_empty: bool,
        mut element: impl FnMut(&mut Self) -> PResult,
    ) -> PResult {
        let mut children = Vec::new();
        while !self.at_any(close) && !self.at_eof() {
            if allow_empty && self.at(Punctuator::Comma) {
                children.push(None);
                children.push(Some(self.token()));
                continue;
            }
            children.push(Some(element(self)?));
            match self.eat(Punctuator::Comma) {
                Some(comma) => children.push(Some(comma)),
                None => break,
            }
        }
        Ok(Tree::node(Kind::SeparatedList, children))
    }

    /// Elements separated by a single punctuator with no trailing separator.
    fn delimited(
        &mut self,
        kind: Kind,
        separator: Punctuator,
        mut element: impl FnMut(&mut Self) -> PResult,
    ) -> PResult {
        let mut children = vec![Some(element(self)?)];
        while let Some(sep) = self.eat(separator) {
            children.push(Some(sep));
            children.push(Some(element(self)?));
        }
        Ok(Tree::node(kind, children))
    }

    /// Statements up to `is_end` or end of input.
    fn statement_list(&mut self, is_end: impl Fn(&Self) -> bool) -> PResult {
        let mut children = Vec::new();
        while !is_end(self) && !self.at_eof() {
            children.push(Some(self.statement()?));
        }
        Ok(Tree::node(Kind::List, children))
    }
}
