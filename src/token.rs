/// Source location of a token: 1-based line, 0-based column.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Text outside of PHP tags.
    InlineHtml,
    /// `<?php` (or `<?` with short open tags).
    OpenTag,
    /// `<?=`.
    OpenTagWithEcho,
    /// `?>`.
    CloseTag,
    /// `$name`.
    Variable,
    /// Identifier, keyword, or (qualified) name such as `Foo\Bar`.
    Identifier,
    /// Integer literal in any base.
    Integer,
    /// Floating point literal.
    Float,
    /// Single-quoted string (`'...'`).
    SingleQuotedString,
    /// Double-quoted string without interpolation.
    DoubleQuotedString,
    /// Double-quoted string containing `$var`, `{$` or `${`.
    ExpandableString,
    /// Heredoc (`<<<ID ... ID`).
    Heredoc,
    /// Nowdoc (`<<<'ID' ... ID`).
    Nowdoc,
    /// Backtick shell command (`` `...` ``).
    ShellCommand,
    /// Cast operator such as `(int)`.
    Cast,
    /// Operator or delimiter.
    Punctuator,
    /// End of input.
    Eof,
}

/// A comment preceding a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// A single token with its kind, exact source text, and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    /// Comments between the previous token and this one.
    pub trivia: Vec<Comment>,
}

impl Token {
    #[must_use]
    pub const fn line(&self) -> usize {
        self.span.line
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.span.column
    }

    /// Number of characters in the token text.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Position just past the last character of the token.
    #[must_use]
    pub fn end(&self) -> Span {
        end_of(&self.text, self.span)
    }
}

/// Position reached after laying out `text` starting at `start`.
pub(crate) fn end_of(text: &str, start: Span) -> Span {
    let mut line = start.line;
    let mut column = start.column;
    for ch in text.chars() {
        if ch == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    Span { line, column }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, line: usize, column: usize) -> Token {
        Token {
            kind: TokenKind::Identifier,
            text: text.to_string(),
            span: Span::new(line, column),
            trivia: Vec::new(),
        }
    }

    #[test]
    fn end_on_same_line() {
        assert_eq!(token("foo", 3, 4).end(), Span::new(3, 7));
    }

    #[test]
    fn end_after_newlines() {
        assert_eq!(token("<<<A\nxy\nA", 1, 5).end(), Span::new(3, 1));
    }

    #[test]
    fn length_counts_characters() {
        assert_eq!(token("'é'", 1, 0).len(), 3);
    }
}
