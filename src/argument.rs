//! Matching the argument bound to a parameter of a function call.

use std::collections::BTreeSet;

use crate::ast::{CallArgument, FunctionCall, Literal};
use crate::tree::Tree;

/// Invalid matcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentMatcherError {
    #[error("a value matcher needs at least one value")]
    NoValues,
}

/// Locates the argument passed for one parameter, by position or by name.
///
/// ```
/// use php_frontend_rs::{argument::ArgumentMatcher, ast::FunctionCall, parse_str};
///
/// let tree = parse_str("<?php setcookie('id', secure: 'TRUE');").unwrap();
/// let call = tree.descendants().find_map(FunctionCall::cast).unwrap();
/// let secure = ArgumentMatcher::new(5, Some("secure")).with_values(["true"]).unwrap();
/// assert!(secure.matches_value(call));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentMatcher {
    position: usize,
    name: Option<String>,
    values: BTreeSet<String>,
}

impl ArgumentMatcher {
    /// Matcher for the parameter at `position`, optionally also reachable
    /// as the named argument `name`.
    #[must_use]
    pub fn new(position: usize, name: Option<&str>) -> Self {
        Self {
            position,
            name: name.map(str::to_string),
            values: BTreeSet::new(),
        }
    }

    /// Restrict matches to string literals with one of `values`, compared
    /// case-insensitively.
    pub fn with_values<I, S>(self, values: I) -> Result<Self, ArgumentMatcherError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_lowercase())
            .collect();
        if values.is_empty() {
            return Err(ArgumentMatcherError::NoValues);
        }
        Ok(Self { values, ..self })
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Lower-cased accepted values; empty when the matcher has none.
    #[must_use]
    pub const fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    /// The argument bound to the parameter.
    ///
    /// A named argument wins; otherwise the positional argument at
    /// `position`, counting unnamed arguments only.
    #[must_use]
    pub fn matched_argument<'a>(&self, call: FunctionCall<'a>) -> Option<CallArgument<'a>> {
        self.name
            .as_deref()
            .and_then(|name| call.arguments().find(|a| a.name() == Some(name)))
            .or_else(|| {
                call.arguments()
                    .filter(|a| a.name().is_none())
                    .nth(self.position)
            })
    }

    /// Value expression of the bound argument.
    #[must_use]
    pub fn matched_value<'a>(&self, call: FunctionCall<'a>) -> Option<&'a Tree> {
        self.matched_argument(call).and_then(|a| a.value())
    }

    /// Whether the bound argument is a string literal with an accepted value.
    #[must_use]
    pub fn matches_value(&self, call: FunctionCall<'_>) -> bool {
        self.matched_value(call)
            .and_then(Literal::cast)
            .and_then(|literal| literal.string_value())
            .is_some_and(|value| self.values.contains(&value.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn with_call(source: &str, check: impl FnOnce(FunctionCall<'_>)) {
        let tree = parse(&tokenize(source).tokens).expect("should parse");
        let call = tree
            .descendants()
            .find_map(FunctionCall::cast)
            .expect("call");
        check(call);
    }

    #[test]
    fn values_are_lower_cased() {
        let matcher = ArgumentMatcher::new(1, None)
            .with_values(["VALUE"])
            .expect("valid");
        assert_eq!(matcher.values().iter().collect::<Vec<_>>(), vec!["value"]);
        assert_eq!(matcher.position(), 1);
        assert_eq!(matcher.name(), None);
    }

    #[test]
    fn empty_values_rejected() {
        let result = ArgumentMatcher::new(0, Some("x")).with_values(Vec::<String>::new());
        assert_eq!(result, Err(ArgumentMatcherError::NoValues));
    }

    #[test]
    fn positional_argument() {
        with_call("<?php f($a, $b, $c);", |call| {
            let arg = ArgumentMatcher::new(1, None).matched_value(call);
            assert_eq!(arg.and_then(Tree::text), Some("$b"));
            assert!(ArgumentMatcher::new(3, None).matched_argument(call).is_none());
        });
    }

    #[test]
    fn named_argument_wins() {
        with_call("<?php f($a, flags: $b);", |call| {
            let matcher = ArgumentMatcher::new(0, Some("flags"));
            assert_eq!(matcher.matched_value(call).and_then(Tree::text), Some("$b"));
        });
    }

    #[test]
    fn named_arguments_do_not_count_as_positions() {
        with_call("<?php f(x: $a, $b);", |call| {
            let matcher = ArgumentMatcher::new(0, Some("pattern"));
            assert_eq!(matcher.matched_value(call).and_then(Tree::text), Some("$b"));
        });
    }

    #[test]
    fn value_containment() {
        with_call("<?php ini_set('display_errors', \"On\");", |call| {
            let matcher = ArgumentMatcher::new(1, Some("value"))
                .with_values(["on", "1"])
                .expect("valid");
            assert!(matcher.matches_value(call));
            let other = ArgumentMatcher::new(0, None)
                .with_values(["on"])
                .expect("valid");
            assert!(!other.matches_value(call));
        });
    }

    #[test]
    fn non_literal_never_matches() {
        with_call("<?php ini_set('x', $on);", |call| {
            let matcher = ArgumentMatcher::new(1, None)
                .with_values(["on"])
                .expect("valid");
            assert!(!matcher.matches_value(call));
        });
    }
}
