//! Small predicates over tokens shared by analyzers.

use crate::punctuator::TokenValue;
use crate::token::Token;

/// Whether the token spells one of `candidates`.
///
/// Punctuators compare exactly; keywords ignore ASCII case.
#[must_use]
pub fn is_type<T: TokenValue>(token: &Token, candidates: &[T]) -> bool {
    candidates.iter().any(|c| c.matches(&token.text))
}

/// Whether every token sits on the line of the first one.
///
/// # Panics
///
/// Panics when `tokens` is empty.
#[must_use]
pub fn is_on_same_line(tokens: &[&Token]) -> bool {
    let (first, rest) = tokens
        .split_first()
        .unwrap_or_else(|| panic!("is_on_same_line requires at least one token"));
    rest.iter().all(|t| t.line() == first.line())
}

/// Number of columns between the end of `a` and the start of `b`.
///
/// Only meaningful when both tokens are on the same line. A negative
/// result means the tokens overlap, which is a caller error.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn spacing_between(a: &Token, b: &Token) -> isize {
    let last_of_a = a.column() as isize + a.len() as isize - 1;
    b.column() as isize - last_of_a - 1
}
