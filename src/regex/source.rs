//! A string literal read as a delimited regex pattern.

use std::ops::Range;

use super::chars::{Quote, SourceChar, decode};
use super::flags::FlagSet;
use super::parser::{RegexParseResult, parse_regex};
use crate::issue::IssueLocation;
use crate::token::{Span, end_of};
use crate::tree::{Kind, Tree};

/// Why a literal cannot be read as a regex pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegexSourceError {
    #[error("Only string literals allowed")]
    NotAStringLiteral,
    #[error("Regular expression does not contain delimiters")]
    MissingDelimiters,
}

/// The pattern of a regular string literal, delimiters stripped.
///
/// ```
/// use php_frontend_rs::{parse_str, regex::RegexSource, tree::Kind};
///
/// let tree = parse_str("<?php preg_match('/a.b/i', $s);").unwrap();
/// let literal = tree.descendants().find(|t| t.is(Kind::RegularStringLiteral)).unwrap();
/// let source = RegexSource::from_string_literal(literal).unwrap();
/// assert_eq!(source.text(), "a.b");
/// assert_eq!(source.modifiers(), "i");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexSource {
    text: String,
    quote: Quote,
    delimiters: (char, char),
    modifiers: String,
    start: Span,
}

impl RegexSource {
    /// Read a `RegularStringLiteral` leaf as a delimited pattern.
    ///
    /// Leading whitespace before the opening delimiter is skipped. The
    /// delimiter is the first remaining character and must not be a word
    /// character, whitespace, a control character or a backslash. Bracket
    /// delimiters close with their partner; any other delimiter closes at
    /// its last occurrence.
    pub fn from_string_literal(literal: &Tree) -> Result<Self, RegexSourceError> {
        let token = literal
            .token()
            .filter(|_| literal.is(Kind::RegularStringLiteral))
            .ok_or(RegexSourceError::NotAStringLiteral)?;
        let quote = Quote::of_literal(&token.text).ok_or(RegexSourceError::NotAStringLiteral)?;
        let chars: Vec<char> = token.text.chars().collect();
        if chars.len() < 2 {
            return Err(RegexSourceError::NotAStringLiteral);
        }
        let body = &chars[1..chars.len() - 1];
        let open_at = body
            .iter()
            .position(|c| !c.is_whitespace())
            .ok_or(RegexSourceError::MissingDelimiters)?;
        let pattern = &body[open_at..];
        if pattern.len() < 2 {
            return Err(RegexSourceError::MissingDelimiters);
        }
        let open = pattern[0];
        if !is_delimiter(open) {
            return Err(RegexSourceError::MissingDelimiters);
        }
        let close = closing_delimiter(open);
        let close_at = pattern
            .iter()
            .rposition(|c| *c == close)
            .filter(|at| *at > 0)
            .ok_or(RegexSourceError::MissingDelimiters)?;

        let prefix: String = chars[..=open_at + 1].iter().collect();
        Ok(Self {
            text: pattern[1..close_at].iter().collect(),
            quote,
            delimiters: (open, close),
            modifiers: pattern[close_at + 1..].iter().collect(),
            start: end_of(&prefix, token.span),
        })
    }

    /// Raw pattern text between the delimiters, PHP escapes not decoded.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn quote(&self) -> Quote {
        self.quote
    }

    /// Opening and closing delimiter.
    #[must_use]
    pub const fn delimiters(&self) -> (char, char) {
        self.delimiters
    }

    /// Everything after the closing delimiter.
    #[must_use]
    pub fn modifiers(&self) -> &str {
        &self.modifiers
    }

    /// Flags given by the modifiers.
    #[must_use]
    pub fn flags(&self) -> FlagSet {
        FlagSet::from_modifiers(&self.modifiers)
    }

    /// File position of the first pattern character.
    #[must_use]
    pub const fn start(&self) -> Span {
        self.start
    }

    /// Pattern characters after PHP string decoding.
    #[must_use]
    pub fn characters(&self) -> Vec<SourceChar> {
        decode(&self.text, self.quote)
    }

    /// Parse the pattern with the modifiers' flags.
    #[must_use]
    pub fn parse(&self) -> RegexParseResult {
        parse_regex(self)
    }

    /// File location of a half-open range of raw pattern offsets.
    ///
    /// Offsets count characters of [`text`](Self::text). A newline inside
    /// the literal moves to the next line, column 0.
    #[must_use]
    pub fn location_in_file_for(&self, range: Range<usize>) -> IssueLocation {
        let start = self.position_at(range.start);
        let end = self.position_at(range.end.max(range.start));
        IssueLocation::new(start, end)
    }

    fn position_at(&self, offset: usize) -> Span {
        let before: String = self.text.chars().take(offset).collect();
        end_of(&before, self.start)
    }
}

fn is_delimiter(c: char) -> bool {
    !(c.is_ascii_alphanumeric() || c == '_' || c == '\\' || c.is_whitespace() || c.is_control())
}

const fn closing_delimiter(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn literal_source(literal: &str) -> Result<RegexSource, RegexSourceError> {
        let tree = parse(&tokenize(&format!("<?php\n\n{literal};")).tokens).expect("should parse");
        let expr = tree
            .descendants()
            .find(|t| t.is(Kind::ExpressionStatement))
            .and_then(|s| s.child(0))
            .expect("expression");
        RegexSource::from_string_literal(expr)
    }

    #[test]
    fn strips_delimiters() {
        let source = literal_source("'/a.b/'").expect("pattern");
        assert_eq!(source.text(), "a.b");
        assert_eq!(source.delimiters(), ('/', '/'));
        assert_eq!(source.start(), Span::new(3, 2));
    }

    #[test]
    fn bracket_delimiters() {
        let source = literal_source("'[a]'").expect("pattern");
        assert_eq!(source.text(), "a");
        let source = literal_source("'{a{1}}x'").expect("pattern");
        assert_eq!(source.text(), "a{1}");
        assert_eq!(source.modifiers(), "x");
    }

    #[test]
    fn too_few_delimiters() {
        assert_eq!(literal_source("'/'"), Err(RegexSourceError::MissingDelimiters));
        assert_eq!(literal_source("''"), Err(RegexSourceError::MissingDelimiters));
        assert_eq!(literal_source("'aFooa'"), Err(RegexSourceError::MissingDelimiters));
        assert_eq!(literal_source("'[FOO'"), Err(RegexSourceError::MissingDelimiters));
        assert_eq!(literal_source("'[FOO['"), Err(RegexSourceError::MissingDelimiters));
    }

    #[test]
    fn non_string_literal() {
        let err = literal_source("1").expect_err("not a string");
        assert_eq!(err.to_string(), "Only string literals allowed");
        assert_eq!(literal_source("\"/$a/\""), Err(RegexSourceError::NotAStringLiteral));
    }

    #[test]
    fn leading_whitespace_skipped() {
        let source = literal_source("\"  /a/i\"").expect("pattern");
        assert_eq!(source.text(), "a");
        assert_eq!(source.flags(), FlagSet::CASE_INSENSITIVE);
        assert_eq!(source.start(), Span::new(3, 4));
    }

    #[test]
    fn single_line_locations() {
        let source = literal_source("'/ABC/'").expect("pattern");
        let loc = source.location_in_file_for(1..2);
        assert_eq!(loc.start, Span::new(3, 3));
        assert_eq!(loc.end, Span::new(3, 4));
        let empty = literal_source("'//'").expect("pattern").location_in_file_for(0..0);
        assert_eq!((empty.start.column, empty.end.column), (2, 2));
    }

    #[test]
    fn multi_line_locations() {
        let source = literal_source("'/a\nbc\r\nde/'").expect("pattern");
        assert_eq!(source.location_in_file_for(2..3).start, Span::new(4, 0));
        assert_eq!(source.location_in_file_for(3..4).start, Span::new(4, 1));
        assert_eq!(source.location_in_file_for(6..7).start, Span::new(5, 0));
        assert_eq!(source.location_in_file_for(6..8).end, Span::new(5, 2));
    }
}
