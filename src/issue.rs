//! Findings produced by analyzers.
//!
//! Reporting them is left to the caller.

use crate::token::{Span, Token};

/// A half-open source range: `end` points just past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssueLocation {
    pub start: Span,
    pub end: Span,
}

impl IssueLocation {
    #[must_use]
    pub const fn new(start: Span, end: Span) -> Self {
        Self { start, end }
    }

    /// Location covering a single token.
    #[must_use]
    pub fn of_token(token: &Token) -> Self {
        Self::new(token.span, token.end())
    }

    /// Location from the start of `first` to the end of `last`.
    #[must_use]
    pub fn between(first: &Token, last: &Token) -> Self {
        Self::new(first.span, last.end())
    }
}

/// Auxiliary location pointing at contributing evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryLocation {
    pub location: IssueLocation,
    pub message: Option<String>,
}

/// One finding: primary location, message, and ordered secondaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub primary: IssueLocation,
    pub message: String,
    pub secondaries: Vec<SecondaryLocation>,
}

impl Finding {
    #[must_use]
    pub fn new(primary: IssueLocation, message: impl Into<String>) -> Self {
        Self {
            primary,
            message: message.into(),
            secondaries: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_secondary(mut self, location: IssueLocation, message: Option<&str>) -> Self {
        self.secondaries.push(SecondaryLocation {
            location,
            message: message.map(str::to_string),
        });
        self
    }
}
