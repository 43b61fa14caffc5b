//! PHP string decoding of a pattern, keeping raw offsets.
//!
//! The regex parser works on decoded characters, but every position it
//! reports must point into the literal as written. Each [`SourceChar`]
//! therefore carries the raw range it was decoded from.

use std::ops::Range;

use crate::literal::decode_escape;

/// Quote style of the literal a pattern came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
}

impl Quote {
    /// Quote style of literal text, from its first character.
    #[must_use]
    pub fn of_literal(text: &str) -> Option<Self> {
        match text.chars().next()? {
            '\'' => Some(Self::Single),
            '"' => Some(Self::Double),
            _ => None,
        }
    }
}

/// One decoded character and the raw character range it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChar {
    pub ch: char,
    pub range: Range<usize>,
}

/// Decode `raw` the way PHP decodes a string with the given quotes.
///
/// Offsets are character indices into `raw`.
#[must_use]
pub fn decode(raw: &str, quote: Quote) -> Vec<SourceChar> {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let (ch, next) = match (chars[i], quote) {
            ('\\', Quote::Single) => match chars.get(i + 1) {
                Some(&escaped @ ('\\' | '\'')) => (escaped, i + 2),
                _ => ('\\', i + 1),
            },
            ('\\', Quote::Double) => decode_escape(&chars, i + 1).unwrap_or(('\\', i + 1)),
            (ch, _) => (ch, i + 1),
        };
        out.push(SourceChar { ch, range: i..next });
        i = next;
    }
    out
}
