use std::fmt;

use crate::punctuator::{Punctuator, TokenValue};
use crate::token::{Comment, Span, Token, TokenKind};

const CAST_TYPES: &[&str] = &[
    "int", "integer", "bool", "boolean", "float", "double", "real", "string", "binary", "array",
    "object", "unset",
];

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// String literal without its closing quote.
    UnterminatedString,
    /// `/* ...` without `*/`.
    UnterminatedComment,
    /// Heredoc or nowdoc whose closing label never appears.
    UnterminatedHeredoc { label: String },
    /// Character that cannot start any token.
    UnexpectedCharacter(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => {
                write!(f, "unterminated string literal")
            }
            Self::UnterminatedComment => {
                write!(f, "unterminated comment")
            }
            Self::UnterminatedHeredoc { label } => {
                write!(
                    f,
                    "unterminated heredoc, \
                     expected closing label: {label}"
                )
            }
            Self::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character: {ch}")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Lexer configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerOptions {
    /// Recognise `<?` as an opening tag (the `short_open_tag` ini setting).
    pub short_open_tag: bool,
}

/// Result of lexing: every token recovered, plus the errors met on the way.
///
/// The token stream always ends with a [`TokenKind::Eof`] token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl Lexed {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Tokens if lexing was clean, otherwise the first error.
    pub fn into_result(self) -> Result<Vec<Token>, LexError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.tokens),
        }
    }
}

/// Tokenize PHP source with default options.
///
/// Lexing never stops early: malformed constructs are reported in
/// [`Lexed::errors`] and the scan resumes after them.
#[must_use]
pub fn tokenize(input: &str) -> Lexed {
    tokenize_with(input, &LexerOptions::default())
}

/// Tokenize PHP source with explicit options.
#[must_use]
pub fn tokenize_with(input: &str, options: &LexerOptions) -> Lexed {
    Lexer::new(input, *options).run()
}

struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    in_php: bool,
    options: LexerOptions,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
    trivia: Vec<Comment>,
}

impl Lexer {
    fn new(input: &str, options: LexerOptions) -> Self {
        let input: Vec<char> = input.chars().collect();
        let start = usize::from(input.first() == Some(&'\u{FEFF}'));
        Self {
            input,
            pos: start,
            line: 1,
            col: 0,
            in_php: false,
            options,
            tokens: Vec::new(),
            errors: Vec::new(),
            trivia: Vec::new(),
        }
    }

    fn run(mut self) -> Lexed {
        while self.pos < self.input.len() {
            if self.in_php {
                self.scan_php();
            } else {
                self.scan_html();
            }
        }
        let span = self.span();
        self.push(TokenKind::Eof, self.pos, span);
        Lexed {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    const fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.col,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        let mut i = self.pos;
        for ch in s.chars() {
            if self.input.get(i) != Some(&ch) {
                return false;
            }
            i += 1;
        }
        true
    }

    fn starts_with_ignore_case(&self, s: &str) -> bool {
        let mut i = self.pos;
        for ch in s.chars() {
            match self.input.get(i) {
                Some(c) if c.eq_ignore_ascii_case(&ch) => i += 1,
                _ => return false,
            }
        }
        true
    }

    fn advance(&mut self) {
        if let Some(&ch) = self.input.get(self.pos) {
            if ch == '\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, span: Span) {
        let text: String = self.input[start..self.pos].iter().collect();
        self.tokens.push(Token {
            kind,
            text,
            span,
            trivia: std::mem::take(&mut self.trivia),
        });
    }

    fn error(&mut self, kind: LexErrorKind, span: Span) {
        tracing::debug!(%kind, line = span.line, column = span.column, "lexical error");
        self.errors.push(LexError { kind, span });
    }

    fn at_open_tag(&self) -> bool {
        if self.starts_with_ignore_case("<?php") {
            return self
                .peek_at(5)
                .is_none_or(|c| c.is_whitespace());
        }
        if self.starts_with("<?=") {
            return true;
        }
        self.options.short_open_tag && self.starts_with("<?") && !self.starts_with_ignore_case("<?xml")
    }

    fn scan_html(&mut self) {
        let start = self.pos;
        let span = self.span();

        if self.at_open_tag() {
            let (len, kind) = if self.starts_with("<?=") {
                (3, TokenKind::OpenTagWithEcho)
            } else if self.starts_with_ignore_case("<?php") {
                (5, TokenKind::OpenTag)
            } else {
                (2, TokenKind::OpenTag)
            };
            self.advance_by(len);
            self.push(kind, start, span);
            self.in_php = true;
            return;
        }

        while self.pos < self.input.len() && !self.at_open_tag() {
            self.advance();
        }
        self.push(TokenKind::InlineHtml, start, span);
    }

    fn scan_php(&mut self) {
        let ch = self.input[self.pos];
        let next = self.peek_at(1);
        match ch {
            c if c.is_whitespace() => self.advance(),
            '?' if next == Some('>') => self.read_close_tag(),
            '#' if next == Some('[') => self.read_punctuator(),
            '#' => self.read_line_comment(),
            '/' if next == Some('/') => self.read_line_comment(),
            '/' if next == Some('*') => self.read_block_comment(),
            '$' if next.is_some_and(is_name_start) => self.read_variable(),
            c if is_name_start(c) => self.read_name(),
            '\\' if next.is_some_and(is_name_start) => self.read_name(),
            c if c.is_ascii_digit() => self.read_number(),
            '.' if next.is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            '\'' => self.read_single_quoted(),
            '"' => self.read_double_quoted(),
            '`' => self.read_backtick(),
            '<' if self.starts_with("<<<") && self.heredoc_label_follows() => self.read_heredoc(),
            '(' if self.cast_length().is_some() => self.read_cast(),
            _ => self.read_punctuator(),
        }
    }

    fn read_close_tag(&mut self) {
        let start = self.pos;
        let span = self.span();
        self.advance_by(2);
        self.push(TokenKind::CloseTag, start, span);
        // a single newline directly after `?>` belongs to the tag
        if self.peek() == Some('\r') && self.peek_at(1) == Some('\n') {
            self.advance_by(2);
        } else if self.peek() == Some('\n') {
            self.advance();
        }
        self.in_php = false;
    }

    fn read_line_comment(&mut self) {
        let start = self.pos;
        let span = self.span();
        while let Some(c) = self.peek() {
            if c == '\n' || self.starts_with("?>") {
                break;
            }
            self.advance();
        }
        let text = self.input[start..self.pos].iter().collect();
        self.trivia.push(Comment { text, span });
    }

    fn read_block_comment(&mut self) {
        let start = self.pos;
        let span = self.span();
        self.advance_by(2);
        loop {
            if self.pos >= self.input.len() {
                self.error(LexErrorKind::UnterminatedComment, span);
                break;
            }
            if self.starts_with("*/") {
                self.advance_by(2);
                break;
            }
            self.advance();
        }
        let text = self.input[start..self.pos].iter().collect();
        self.trivia.push(Comment { text, span });
    }

    fn read_variable(&mut self) {
        let start = self.pos;
        let span = self.span();
        self.advance(); // skip $
        while self.peek().is_some_and(is_name_char) {
            self.advance();
        }
        self.push(TokenKind::Variable, start, span);
    }

    fn read_name(&mut self) {
        let start = self.pos;
        let span = self.span();
        if self.peek() == Some('\\') {
            self.advance();
        }
        loop {
            while self.peek().is_some_and(is_name_char) {
                self.advance();
            }
            // `\` continues the name only when another segment follows
            if self.peek() == Some('\\') && self.peek_at(1).is_some_and(is_name_start) {
                self.advance();
            } else {
                break;
            }
        }
        self.push(TokenKind::Identifier, start, span);
    }

    fn read_number(&mut self) {
        let start = self.pos;
        let span = self.span();
        let mut kind = TokenKind::Integer;

        let radix_digits: Option<fn(char) -> bool> = match (self.peek(), self.peek_at(1)) {
            (Some('0'), Some('x' | 'X')) => Some(is_hex_digit),
            (Some('0'), Some('b' | 'B')) => Some(is_binary_digit),
            (Some('0'), Some('o' | 'O')) => Some(is_octal_digit),
            _ => None,
        };

        if let Some(is_digit) = radix_digits {
            self.advance_by(2);
            while self.peek().is_some_and(|c| is_digit(c) || c == '_') {
                self.advance();
            }
            self.push(kind, start, span);
            return;
        }

        self.read_digits();
        if self.peek() == Some('.') && self.peek_at(1) != Some('.') {
            kind = TokenKind::Float;
            self.advance();
            self.read_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let digit_at = if matches!(self.peek_at(1), Some('+' | '-')) {
                2
            } else {
                1
            };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                kind = TokenKind::Float;
                self.advance_by(digit_at);
                self.read_digits();
            }
        }
        self.push(kind, start, span);
    }

    fn read_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.advance();
        }
    }

    fn read_single_quoted(&mut self) {
        let start = self.pos;
        let span = self.span();
        self.advance(); // skip opening quote
        loop {
            match self.peek() {
                None => {
                    self.error(LexErrorKind::UnterminatedString, span);
                    break;
                }
                Some('\\') => self.advance_by(2),
                Some('\'') => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
            }
        }
        self.push(TokenKind::SingleQuotedString, start, span);
    }

    fn read_double_quoted(&mut self) {
        let start = self.pos;
        let span = self.span();
        self.advance(); // skip opening quote
        let expandable = self.read_interpolated_body('"', span);
        let kind = if expandable {
            TokenKind::ExpandableString
        } else {
            TokenKind::DoubleQuotedString
        };
        self.push(kind, start, span);
    }

    fn read_backtick(&mut self) {
        let start = self.pos;
        let span = self.span();
        self.advance();
        self.read_interpolated_body('`', span);
        self.push(TokenKind::ShellCommand, start, span);
    }

    /// Scan up to and including `close`; returns whether any
    /// interpolation was seen.
    fn read_interpolated_body(&mut self, close: char, span: Span) -> bool {
        let mut expandable = false;
        loop {
            match self.peek() {
                None => {
                    self.error(LexErrorKind::UnterminatedString, span);
                    break;
                }
                Some('\\') => self.advance_by(2),
                Some('$') if self.peek_at(1).is_some_and(is_name_start) => {
                    expandable = true;
                    self.advance();
                }
                Some('$') if self.peek_at(1) == Some('{') => {
                    expandable = true;
                    self.advance();
                    self.skip_braced();
                }
                Some('{') if self.peek_at(1) == Some('$') => {
                    expandable = true;
                    self.skip_braced();
                }
                Some(c) if c == close => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
            }
        }
        expandable
    }

    /// Skip a `{ ... }` interpolation, honouring nesting.
    fn skip_braced(&mut self) {
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            self.advance();
            match c {
                '{' => depth += 1,
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    /// `<<<` followed by an optional quote and a label, then a newline.
    fn heredoc_label_follows(&self) -> bool {
        self.heredoc_header().is_some()
    }

    /// Parse the heredoc header at the cursor without consuming it.
    /// Returns (label, is nowdoc, header length up to and including
    /// the newline).
    fn heredoc_header(&self) -> Option<(String, bool, usize)> {
        let mut i = self.pos + 3;
        while matches!(self.input.get(i), Some(' ' | '\t')) {
            i += 1;
        }
        let quote = match self.input.get(i) {
            Some(&q @ ('\'' | '"')) => {
                i += 1;
                Some(q)
            }
            _ => None,
        };
        let label_start = i;
        if !self.input.get(i).copied().is_some_and(is_name_start) {
            return None;
        }
        while self.input.get(i).copied().is_some_and(is_name_char) {
            i += 1;
        }
        let label: String = self.input[label_start..i].iter().collect();
        if let Some(q) = quote {
            if self.input.get(i) != Some(&q) {
                return None;
            }
            i += 1;
        }
        if self.input.get(i) == Some(&'\r') {
            i += 1;
        }
        if self.input.get(i) != Some(&'\n') {
            return None;
        }
        Some((label, quote == Some('\''), i + 1 - self.pos))
    }

    fn read_heredoc(&mut self) {
        let start = self.pos;
        let span = self.span();
        let Some((label, nowdoc, header_len)) = self.heredoc_header() else {
            self.read_punctuator();
            return;
        };
        self.advance_by(header_len);

        loop {
            if self.pos >= self.input.len() {
                self.error(LexErrorKind::UnterminatedHeredoc { label }, span);
                break;
            }
            // closing label may be indented
            let mut i = self.pos;
            while matches!(self.input.get(i), Some(' ' | '\t')) {
                i += 1;
            }
            let label_len = label.chars().count();
            let closes = self.input[i..].iter().take(label_len).copied().eq(label.chars())
                && !self
                    .input
                    .get(i + label_len)
                    .copied()
                    .is_some_and(is_name_char);
            if closes {
                self.advance_by(i - self.pos + label_len);
                break;
            }
            while let Some(c) = self.peek() {
                self.advance();
                if c == '\n' {
                    break;
                }
            }
        }

        let kind = if nowdoc {
            TokenKind::Nowdoc
        } else {
            TokenKind::Heredoc
        };
        self.push(kind, start, span);
    }

    /// Length of a cast operator such as `( int )` at the cursor.
    fn cast_length(&self) -> Option<usize> {
        let mut i = self.pos + 1;
        while matches!(self.input.get(i), Some(' ' | '\t')) {
            i += 1;
        }
        let word_start = i;
        while self.input.get(i).is_some_and(char::is_ascii_alphabetic) {
            i += 1;
        }
        let word: String = self.input[word_start..i].iter().collect();
        while matches!(self.input.get(i), Some(' ' | '\t')) {
            i += 1;
        }
        if self.input.get(i) != Some(&')') {
            return None;
        }
        let word = word.to_ascii_lowercase();
        CAST_TYPES
            .contains(&word.as_str())
            .then_some(i + 1 - self.pos)
    }

    fn read_cast(&mut self) {
        let start = self.pos;
        let span = self.span();
        if let Some(len) = self.cast_length() {
            self.advance_by(len);
        }
        self.push(TokenKind::Cast, start, span);
    }

    fn read_punctuator(&mut self) {
        let start = self.pos;
        let span = self.span();
        let matched = Punctuator::ALL
            .iter()
            .find(|p| self.starts_with(p.value()));
        if let Some(p) = matched {
            self.advance_by(p.value().chars().count());
            self.push(TokenKind::Punctuator, start, span);
        } else {
            let ch = self.input[self.pos];
            self.error(LexErrorKind::UnexpectedCharacter(ch), span);
            self.advance();
        }
    }
}

const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c as u32 >= 0x80
}

const fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit()
}

const fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

const fn is_binary_digit(c: char) -> bool {
    matches!(c, '0' | '1')
}

const fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).tokens.iter().map(|t| t.kind).collect()
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input)
            .tokens
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn html_then_php() {
        assert_eq!(
            kinds("<p>\n<?php $a;"),
            vec![
                TokenKind::InlineHtml,
                TokenKind::OpenTag,
                TokenKind::Variable,
                TokenKind::Punctuator,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn longest_punctuator_wins() {
        assert_eq!(texts("<?php $a **= 2 ?->"), vec![
            "<?php", "$a", "**=", "2", "?->", ""
        ]);
    }

    #[test]
    fn qualified_names_are_single_tokens() {
        assert_eq!(texts("<?php \\A\\B ns\\{"), vec![
            "<?php", "\\A\\B", "ns", "\\", "{", ""
        ]);
    }

    #[test]
    fn numbers() {
        let lexed = tokenize("<?php 0x1F 1_000 1.5 .5 1e3 0b101");
        let kinds: Vec<_> = lexed.tokens[1..7].iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![
            TokenKind::Integer,
            TokenKind::Integer,
            TokenKind::Float,
            TokenKind::Float,
            TokenKind::Float,
            TokenKind::Integer,
        ]);
    }

    #[test]
    fn strings() {
        let lexed = tokenize(r#"<?php 'a\'b' "x" "$y" "{$z['k']}" `ls`"#);
        let kinds: Vec<_> = lexed.tokens[1..6].iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![
            TokenKind::SingleQuotedString,
            TokenKind::DoubleQuotedString,
            TokenKind::ExpandableString,
            TokenKind::ExpandableString,
            TokenKind::ShellCommand,
        ]);
        assert_eq!(lexed.tokens[1].text, r"'a\'b'");
        assert!(lexed.is_ok());
    }

    #[test]
    fn casts() {
        let lexed = tokenize("<?php (int) $a; ( string )$b; ($c)");
        assert_eq!(lexed.tokens[1].kind, TokenKind::Cast);
        assert_eq!(lexed.tokens[4].text, "( string )");
        assert_eq!(lexed.tokens[7].kind, TokenKind::Punctuator);
    }

    #[test]
    fn heredoc_and_nowdoc() {
        let lexed = tokenize("<?php $a = <<<EOT\nhello $b\n  EOT;\n$c = <<<'N'\nraw\nN;\n");
        assert!(lexed.is_ok());
        assert_eq!(lexed.tokens[3].kind, TokenKind::Heredoc);
        assert_eq!(lexed.tokens[3].text, "<<<EOT\nhello $b\n  EOT");
        assert_eq!(lexed.tokens[4].text, ";");
        assert_eq!(lexed.tokens[7].kind, TokenKind::Nowdoc);
    }

    #[test]
    fn comments_become_trivia() {
        let lexed = tokenize("<?php // one\n/* two */ $a; # three\n");
        let var = &lexed.tokens[1];
        assert_eq!(var.text, "$a");
        assert_eq!(var.trivia.len(), 2);
        assert_eq!(var.trivia[0].text, "// one");
        assert_eq!(lexed.tokens[3].kind, TokenKind::Eof);
        assert_eq!(lexed.tokens[3].trivia[0].text, "# three");
    }

    #[test]
    fn line_comment_stops_at_close_tag() {
        let lexed = tokenize("<?php // c ?>after");
        assert_eq!(lexed.tokens[1].kind, TokenKind::CloseTag);
        assert_eq!(lexed.tokens[2].text, "after");
    }

    #[test]
    fn close_tag_swallows_one_newline() {
        let lexed = tokenize("<?php ?>\n\nx");
        assert_eq!(lexed.tokens[2].text, "\nx");
        assert_eq!(lexed.tokens[2].span, Span::new(2, 0));
    }

    #[test]
    fn unterminated_string_recovers() {
        let lexed = tokenize("<?php $a = 'oops;\n");
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedString);
        assert_eq!(lexed.tokens[3].text, "'oops;\n");
        assert_eq!(lexed.tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn unterminated_comment_is_reported() {
        let lexed = tokenize("<?php /* never closed");
        assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedComment);
    }

    #[test]
    fn unexpected_character_is_skipped() {
        let lexed = tokenize("<?php $a \u{0} $b");
        assert_eq!(lexed.errors[0].kind, LexErrorKind::UnexpectedCharacter('\u{0}'));
        assert_eq!(lexed.tokens[2].text, "$b");
    }

    #[test]
    fn short_open_tag_option() {
        let plain = tokenize("<? $a ?>");
        assert_eq!(plain.tokens[0].kind, TokenKind::InlineHtml);

        let options = LexerOptions {
            short_open_tag: true,
        };
        let short = tokenize_with("<? $a ?>", &options);
        assert_eq!(short.tokens[0].kind, TokenKind::OpenTag);
        assert_eq!(short.tokens[1].text, "$a");
    }

    #[test]
    fn span_tracking() {
        let lexed = tokenize("<?php\n  $a =\n\t1;");
        assert_eq!(lexed.tokens[1].span, Span::new(2, 2));
        assert_eq!(lexed.tokens[2].span, Span::new(2, 5));
        assert_eq!(lexed.tokens[3].span, Span::new(3, 1));
    }

    #[test]
    fn bom_stripping() {
        let lexed = tokenize("\u{FEFF}<?php $a;");
        assert_eq!(lexed.tokens[0].kind, TokenKind::OpenTag);
        assert_eq!(lexed.tokens[0].span, Span::new(1, 0));
    }
}
