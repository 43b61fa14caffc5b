//! PHP lexer, parser, syntax tree, and embedded regex analysis.
//!
//! A front end for static analyzers: source text becomes a token
//! stream, the token stream becomes a homogeneous [`Tree`], and the
//! tree can be compared structurally, printed back, or searched for
//! `preg_*` calls whose pattern literals are parsed as regexes.
//!
//! # Quick start
//!
//! ## Parse a file and walk its tree
//!
//! ```
//! use php_frontend_rs::{Kind, parse_str};
//!
//! let tree = parse_str("<?php echo strlen($name);").unwrap();
//! let calls = tree.descendants().filter(|t| t.is(Kind::FunctionCall)).count();
//! assert_eq!(calls, 1);
//! ```
//!
//! ## Compare two expressions
//!
//! ```
//! use php_frontend_rs::{equivalent, parse_str};
//!
//! let a = parse_str("<?php $a + 1;").unwrap();
//! let b = parse_str("<?php $a  +  1 ;").unwrap();
//! assert!(equivalent(&a, &b));
//! ```
//!
//! ## Check regex patterns
//!
//! ```
//! use php_frontend_rs::{parse_str, regex::duplicates_in_character_class};
//!
//! let tree = parse_str("<?php preg_match('/[A-Za-z]/i', $s);").unwrap();
//! assert_eq!(duplicates_in_character_class(&tree).len(), 1);
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod argument;
pub mod ast;
pub mod equivalence;
pub mod issue;
pub mod lexer;
pub mod literal;
pub mod parser;
pub mod printer;
pub mod punctuator;
pub mod regex;
pub mod token;
pub mod token_utils;
pub mod tree;

use tracing::debug;

pub use argument::{ArgumentMatcher, ArgumentMatcherError};
pub use equivalence::{equivalent, equivalent_opt, equivalent_sequences};
pub use issue::{Finding, IssueLocation, SecondaryLocation};
pub use lexer::{LexError, LexErrorKind, Lexed, LexerOptions, tokenize, tokenize_with};
pub use parser::{ParseError, ParseErrorKind, parse};
pub use punctuator::{Keyword, Punctuator, TokenValue};
pub use token::{Comment, Span, Token, TokenKind};
pub use token_utils::{is_on_same_line, is_type, spacing_between};
pub use tree::{Kind, Tree, skip_parentheses};

/// Unified error type covering both lexing and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// Tokenize and parse PHP source in one step.
///
/// Fails on the first lexical error, then on the first syntax error.
pub fn parse_str(input: &str) -> Result<Tree, Error> {
    let tokens = tokenize(input).into_result()?;
    parse(&tokens).map_err(|err| {
        debug!(%err, "parse failed");
        Error::from(err)
    })
}
