//! Parser for PCRE-style patterns.
//!
//! Syntax errors are collected rather than returned: the parser keeps
//! going so that one result carries every error it can find. Analyses
//! only look at trees whose error list is empty.

use std::ops::Range;

use tracing::trace;

use super::ast::{
    BackReference, Boundary, BoundaryKind, Character, CharacterClass, ClassElement,
    ClassIntersection, ClassRange, ClassUnion, Condition, Conditional, Disjunction, Dot,
    EscapedClass, Greediness, Group, GroupKind, PosixClass, Quantifier, RegexTree, Repetition,
    Sequence,
};
use super::chars::SourceChar;
use super::flags::{FlagChange, FlagSet};
use super::source::RegexSource;

/// A syntax error with the raw pattern range it was found at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {}..{}", range.start, range.end)]
pub struct RegexSyntaxError {
    pub message: String,
    pub range: Range<usize>,
}

/// A parsed pattern and the syntax errors met on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexParseResult {
    pub result: RegexTree,
    pub errors: Vec<RegexSyntaxError>,
    /// Flags in effect at the start of the pattern.
    pub flags: FlagSet,
}

impl RegexParseResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse the pattern of a [`RegexSource`] with its modifiers' flags.
#[must_use]
pub fn parse_regex(source: &RegexSource) -> RegexParseResult {
    parse_characters(source.characters(), source.flags())
}

/// Parse pattern text that needs no string decoding.
///
/// ```
/// use php_frontend_rs::regex::{FlagSet, RegexTree, parse_pattern};
///
/// let parsed = parse_pattern("a|b", FlagSet::empty());
/// assert!(matches!(parsed.result, RegexTree::Disjunction(_)));
/// ```
#[must_use]
pub fn parse_pattern(pattern: &str, flags: FlagSet) -> RegexParseResult {
    let chars = pattern
        .chars()
        .enumerate()
        .map(|(i, ch)| SourceChar { ch, range: i..i + 1 })
        .collect();
    parse_characters(chars, flags)
}

/// Parse decoded pattern characters.
#[must_use]
pub fn parse_characters(chars: Vec<SourceChar>, flags: FlagSet) -> RegexParseResult {
    let mut parser = RegexParser::new(chars, flags);
    let result = parser.disjunction();
    if parser.peek().is_some() {
        let range = parser.current_range();
        parser.error("Unmatched ')'", range);
    }
    trace!(errors = parser.errors.len(), "parsed regex");
    RegexParseResult {
        result,
        errors: parser.errors,
        flags,
    }
}

/// Escapes allowed both inside and outside character classes that stand
/// for a set of characters.
const fn is_class_escape(letter: char) -> bool {
    matches!(
        letter,
        'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'h' | 'H' | 'v' | 'V' | 'p' | 'P'
    )
}

struct RegexParser {
    chars: Vec<SourceChar>,
    pos: usize,
    flags: FlagSet,
    groups: usize,
    errors: Vec<RegexSyntaxError>,
    last_end: usize,
}

impl RegexParser {
    const fn new(chars: Vec<SourceChar>, flags: FlagSet) -> Self {
        Self {
            chars,
            pos: 0,
            flags,
            groups: 0,
            errors: Vec::new(),
            last_end: 0,
        }
    }

    // --- cursor

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).map(|c| c.ch)
    }

    fn at(&self, ch: char) -> bool {
        self.peek() == Some(ch)
    }

    fn end(&self) -> usize {
        self.chars.last().map_or(0, |c| c.range.end)
    }

    /// Raw offset of the next character, or of the end of the pattern.
    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map_or_else(|| self.end(), |c| c.range.start)
    }

    fn current_range(&self) -> Range<usize> {
        self.chars.get(self.pos).map_or_else(
            || {
                let end = self.end();
                end..end
            },
            |c| c.range.clone(),
        )
    }

    fn range_from(&self, start: usize) -> Range<usize> {
        start..self.last_end.max(start)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos)?;
        self.last_end = c.range.end;
        self.pos += 1;
        Some(c.ch)
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.at(ch) {
            self.bump();
            return true;
        }
        false
    }

    // --- errors

    fn error(&mut self, message: impl Into<String>, range: Range<usize>) {
        self.errors.push(RegexSyntaxError {
            message: message.into(),
            range,
        });
    }

    fn expected(&mut self, what: &str) {
        let found = match self.peek() {
            Some(c) => format!("'{c}'"),
            None => "the end of the regex".to_string(),
        };
        let range = self.current_range();
        self.error(format!("Expected {what}, but found {found}"), range);
    }

    fn expect(&mut self, ch: char) -> bool {
        if self.eat(ch) {
            return true;
        }
        self.expected(&format!("'{ch}'"));
        false
    }

    fn skip_extended(&mut self) {
        if !self.flags.contains(FlagSet::EXTENDED) {
            return;
        }
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    // --- sequences

    fn disjunction(&mut self) -> RegexTree {
        let start = self.offset();
        let mut alternatives = vec![self.sequence()];
        while self.eat('|') {
            alternatives.push(self.sequence());
        }
        if alternatives.len() == 1 {
            return alternatives.remove(0);
        }
        RegexTree::Disjunction(Disjunction {
            alternatives,
            range: self.range_from(start),
        })
    }

    fn sequence(&mut self) -> RegexTree {
        let start = self.offset();
        let mut items = Vec::new();
        loop {
            self.skip_extended();
            match self.peek() {
                None | Some('|' | ')') => break,
                Some('\\') if self.peek_at(1) == Some('Q') => {
                    let mut quoted = self.quoted();
                    if let Some(last) = quoted.pop() {
                        items.extend(quoted.into_iter().map(RegexTree::Character));
                        items.push(self.quantified(RegexTree::Character(last)));
                    }
                }
                Some(_) => {
                    if let Some(atom) = self.atom() {
                        items.push(self.quantified(atom));
                    }
                }
            }
        }
        if items.len() == 1 {
            return items.remove(0);
        }
        RegexTree::Sequence(Sequence {
            items,
            range: self.range_from(start),
        })
    }

    /// Characters between `\Q` and `\E` (or the end), taken literally.
    fn quoted(&mut self) -> Vec<Character> {
        self.bump_n(2);
        let mut out = Vec::new();
        while let Some(ch) = self.peek() {
            if ch == '\\' && self.peek_at(1) == Some('E') {
                self.bump_n(2);
                break;
            }
            out.push(self.plain_character(ch));
        }
        out
    }

    fn plain_character(&mut self, ch: char) -> Character {
        let range = self.current_range();
        self.bump();
        Character {
            code_point: u32::from(ch),
            range,
        }
    }

    // --- quantifiers

    fn quantified(&mut self, atom: RegexTree) -> RegexTree {
        self.skip_extended();
        let start = atom.range().start;
        match self.quantifier() {
            Some(quantifier) => RegexTree::Repetition(Repetition {
                element: Box::new(atom),
                quantifier,
                range: self.range_from(start),
            }),
            None => atom,
        }
    }

    fn quantifier(&mut self) -> Option<Quantifier> {
        let (min, max) = match self.peek()? {
            '{' => self.bounds()?,
            c @ ('*' | '+' | '?') => {
                self.bump();
                match c {
                    '*' => (0, None),
                    '+' => (1, None),
                    _ => (0, Some(1)),
                }
            }
            _ => return None,
        };
        let greediness = if self.eat('?') {
            Greediness::Lazy
        } else if self.eat('+') {
            Greediness::Possessive
        } else {
            Greediness::Greedy
        };
        Some(Quantifier {
            min,
            max,
            greediness,
        })
    }

    /// Consume `{n}`, `{n,}` or `{n,m}`. Anything else leaves `{` literal.
    fn bounds(&mut self) -> Option<(u32, Option<u32>)> {
        let start = self.offset();
        let (min, max, len) = self.lookahead_bounds()?;
        self.bump_n(len);
        if max.is_some_and(|max| max < min) {
            self.error("Illegal repetition range", self.range_from(start));
        }
        Some((min, max))
    }

    fn lookahead_bounds(&self) -> Option<(u32, Option<u32>, usize)> {
        let mut i = 1;
        let min = self.number_at(&mut i)?;
        match self.peek_at(i)? {
            '}' => Some((min, Some(min), i + 1)),
            ',' => {
                i += 1;
                if self.peek_at(i)? == '}' {
                    return Some((min, None, i + 1));
                }
                let max = self.number_at(&mut i)?;
                (self.peek_at(i)? == '}').then_some((min, Some(max), i + 1))
            }
            _ => None,
        }
    }

    fn number_at(&self, i: &mut usize) -> Option<u32> {
        let begin = *i;
        let mut value: u32 = 0;
        while let Some(digit) = self.peek_at(*i).and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(digit);
            *i += 1;
        }
        (*i > begin).then_some(value)
    }

    // --- atoms

    fn atom(&mut self) -> Option<RegexTree> {
        let start = self.offset();
        let c = self.peek()?;
        match c {
            '*' | '+' | '?' => {
                let range = self.current_range();
                self.bump();
                self.error(format!("Unexpected quantifier '{c}'"), range);
                None
            }
            '{' if self.lookahead_bounds().is_some() => {
                self.bounds();
                self.error("Unexpected quantifier '{'", self.range_from(start));
                None
            }
            '(' => self.group(),
            '[' => Some(RegexTree::CharacterClass(self.class())),
            '.' => {
                self.bump();
                Some(RegexTree::Dot(Dot {
                    range: self.range_from(start),
                }))
            }
            '^' | '$' => {
                self.bump();
                let kind = if c == '^' {
                    BoundaryKind::LineStart
                } else {
                    BoundaryKind::LineEnd
                };
                Some(RegexTree::Boundary(Boundary {
                    kind,
                    range: self.range_from(start),
                }))
            }
            '\\' => self.escape(),
            _ => Some(RegexTree::Character(self.plain_character(c))),
        }
    }

    fn escape(&mut self) -> Option<RegexTree> {
        let start = self.offset();
        self.bump();
        let Some(letter) = self.peek() else {
            self.expected("escaped character");
            return None;
        };
        if is_class_escape(letter) || matches!(letter, 'R' | 'X' | 'N') {
            return Some(RegexTree::EscapedClass(self.escaped_class(start, letter)));
        }
        let boundary = match letter {
            'b' => Some(BoundaryKind::Word),
            'B' => Some(BoundaryKind::NonWord),
            'A' => Some(BoundaryKind::InputStart),
            'z' => Some(BoundaryKind::InputEnd),
            'Z' => Some(BoundaryKind::InputEndFinalTerminator),
            'G' => Some(BoundaryKind::PreviousMatchEnd),
            'K' => Some(BoundaryKind::MatchStartReset),
            _ => None,
        };
        if let Some(kind) = boundary {
            self.bump();
            return Some(RegexTree::Boundary(Boundary {
                kind,
                range: self.range_from(start),
            }));
        }
        match letter {
            '1'..='9' => {
                let mut reference = String::new();
                while let Some(d) = self.peek().filter(char::is_ascii_digit) {
                    reference.push(d);
                    self.bump();
                }
                Some(RegexTree::BackReference(BackReference {
                    reference,
                    range: self.range_from(start),
                }))
            }
            'g' | 'k' => self.named_back_reference(start, letter),
            'E' => {
                self.bump();
                None
            }
            _ => self.character_escape(start).map(RegexTree::Character),
        }
    }

    fn escaped_class(&mut self, start: usize, letter: char) -> EscapedClass {
        self.bump();
        let property = if matches!(letter, 'p' | 'P') {
            self.property()
        } else {
            None
        };
        EscapedClass {
            letter,
            property,
            range: self.range_from(start),
        }
    }

    fn property(&mut self) -> Option<String> {
        if !self.eat('{') {
            let name = self.bump();
            if name.is_none() {
                self.expected("property name");
            }
            return name.map(String::from);
        }
        let mut name = String::new();
        loop {
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Some(name);
                }
                Some(c) => {
                    name.push(c);
                    self.bump();
                }
                None => {
                    self.expected("'}'");
                    return Some(name);
                }
            }
        }
    }

    /// `\g{1}`, `\g-1`, `\g<name>`, `\k<name>`, `\k'name'`, `\k{name}`.
    fn named_back_reference(&mut self, start: usize, letter: char) -> Option<RegexTree> {
        self.bump();
        let close = match self.peek() {
            Some('{') => '}',
            Some('<') => '>',
            Some('\'') => '\'',
            Some(c) if letter == 'g' && (c.is_ascii_digit() || c == '-' || c == '+') => {
                let mut reference = String::from(c);
                self.bump();
                while let Some(d) = self.peek().filter(char::is_ascii_digit) {
                    reference.push(d);
                    self.bump();
                }
                return Some(RegexTree::BackReference(BackReference {
                    reference,
                    range: self.range_from(start),
                }));
            }
            _ => {
                self.expected("group reference");
                return None;
            }
        };
        self.bump();
        let mut reference = String::new();
        loop {
            match self.peek() {
                Some(c) if c == close => {
                    self.bump();
                    break;
                }
                Some(c) if c.is_alphanumeric() || matches!(c, '_' | '-' | '+') => {
                    reference.push(c);
                    self.bump();
                }
                _ => {
                    self.expected(&format!("'{close}'"));
                    return None;
                }
            }
        }
        Some(RegexTree::BackReference(BackReference {
            reference,
            range: self.range_from(start),
        }))
    }

    /// A single-character escape; the cursor is on the character after `\`.
    fn character_escape(&mut self, start: usize) -> Option<Character> {
        let letter = self.bump()?;
        let code_point = match letter {
            't' => 0x09,
            'n' => 0x0A,
            'r' => 0x0D,
            'f' => 0x0C,
            'e' => 0x1B,
            'a' => 0x07,
            '0' => self.digits(8, 2).0,
            'x' => self.hex_escape()?,
            'u' => self.unicode_escape()?,
            'c' => match self.bump() {
                Some(c) if c.is_ascii() => u32::from(c.to_ascii_uppercase()) ^ 0x40,
                _ => {
                    self.error("Expected control character", self.range_from(start));
                    return None;
                }
            },
            c if !c.is_ascii_alphanumeric() => u32::from(c),
            c => {
                self.error(format!("Invalid escape sequence '\\{c}'"), self.range_from(start));
                return None;
            }
        };
        Some(Character {
            code_point,
            range: self.range_from(start),
        })
    }

    /// Up to `max` digits of `radix`; returns the value and digit count.
    fn digits(&mut self, radix: u32, max: usize) -> (u32, usize) {
        let mut value: u32 = 0;
        let mut count = 0;
        while count < max {
            let Some(digit) = self.peek().and_then(|c| c.to_digit(radix)) else {
                break;
            };
            value = value.saturating_mul(radix).saturating_add(digit);
            self.bump();
            count += 1;
        }
        (value, count)
    }

    /// `\xHH` or `\x{H...}`; the cursor is after `x`.
    fn hex_escape(&mut self) -> Option<u32> {
        if !self.eat('{') {
            return Some(self.digits(16, 2).0);
        }
        let (value, count) = self.digits(16, usize::MAX);
        if count == 0 {
            self.expected("hexadecimal digit");
            return None;
        }
        self.expect('}').then_some(value)
    }

    /// `\uHHHH`, combining a surrogate pair written as two escapes.
    fn unicode_escape(&mut self) -> Option<u32> {
        let mut value = 0;
        for _ in 0..4 {
            let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) else {
                self.expected("hexadecimal digit");
                return None;
            };
            value = value * 16 + digit;
            self.bump();
        }
        if (0xD800..0xDC00).contains(&value) && self.at('\\') && self.peek_at(1) == Some('u') {
            if let Some(low @ 0xDC00..=0xDFFF) = self.hex4_at(2) {
                self.bump_n(6);
                return Some(0x10000 + ((value - 0xD800) << 10) + (low - 0xDC00));
            }
        }
        Some(value)
    }

    fn hex4_at(&self, at: usize) -> Option<u32> {
        (0..4).try_fold(0, |acc, i| {
            Some(acc * 16 + self.peek_at(at + i)?.to_digit(16)?)
        })
    }

    // --- groups

    fn group(&mut self) -> Option<RegexTree> {
        let start = self.offset();
        self.bump();
        if !self.eat('?') {
            self.groups += 1;
            let kind = GroupKind::Capturing {
                index: self.groups,
                name: None,
            };
            return Some(self.group_body(start, kind));
        }
        match self.peek() {
            Some(':') => {
                self.bump();
                Some(self.group_body(start, GroupKind::NonCapturing { flags: None }))
            }
            Some('>') => {
                self.bump();
                Some(self.group_body(start, GroupKind::Atomic))
            }
            Some(c @ ('=' | '!')) => {
                self.bump();
                let kind = GroupKind::Lookaround {
                    behind: false,
                    negated: c == '!',
                };
                Some(self.group_body(start, kind))
            }
            Some('<') if matches!(self.peek_at(1), Some('=' | '!')) => {
                self.bump();
                let negated = self.bump() == Some('!');
                let kind = GroupKind::Lookaround {
                    behind: true,
                    negated,
                };
                Some(self.group_body(start, kind))
            }
            Some('<') => {
                self.bump();
                self.named_group(start, '>')
            }
            Some('\'') => {
                self.bump();
                self.named_group(start, '\'')
            }
            Some('P') => self.python_group(start),
            Some('#') => {
                self.comment();
                None
            }
            Some('(') => Some(self.conditional(start)),
            Some(c) if c == 'R' || c == '&' || c.is_ascii_digit() => Some(self.recursion(start)),
            Some('+' | '-') if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) => {
                Some(self.recursion(start))
            }
            _ => self.flag_group(start),
        }
    }

    /// Group content up to and including `)`; flags changed inside do not
    /// leak out.
    fn group_body(&mut self, start: usize, kind: GroupKind) -> RegexTree {
        let saved = self.flags;
        let element = self.disjunction();
        self.flags = saved;
        self.expect(')');
        RegexTree::Group(Group {
            kind,
            element: Some(Box::new(element)),
            range: self.range_from(start),
        })
    }

    fn named_group(&mut self, start: usize, close: char) -> Option<RegexTree> {
        let name = self.group_name(close)?;
        self.groups += 1;
        let kind = GroupKind::Capturing {
            index: self.groups,
            name: Some(name),
        };
        Some(self.group_body(start, kind))
    }

    fn group_name(&mut self, close: char) -> Option<String> {
        let mut name = String::new();
        while let Some(c) = self.peek().filter(|c| c.is_alphanumeric() || *c == '_') {
            name.push(c);
            self.bump();
        }
        if name.is_empty() {
            self.expected("group name");
            return None;
        }
        self.expect(close).then_some(name)
    }

    /// `(?P<name>...)`, `(?P=name)` and `(?P>name)`.
    fn python_group(&mut self, start: usize) -> Option<RegexTree> {
        self.bump();
        match self.bump() {
            Some('<') => self.named_group(start, '>'),
            Some('=') => {
                let reference = self.group_name(')')?;
                Some(RegexTree::BackReference(BackReference {
                    reference,
                    range: self.range_from(start),
                }))
            }
            Some('>') => {
                self.group_name(')')?;
                Some(RegexTree::Group(Group {
                    kind: GroupKind::NonCapturing { flags: None },
                    element: None,
                    range: self.range_from(start),
                }))
            }
            _ => {
                self.error("Expected '<', '=' or '>' after '(?P'", self.range_from(start));
                None
            }
        }
    }

    fn comment(&mut self) {
        while let Some(c) = self.bump() {
            if c == ')' {
                return;
            }
        }
        self.expected("')'");
    }

    /// `(?R)`, `(?1)`, `(?-1)`, `(?&name)`: kept as element-less groups.
    fn recursion(&mut self, start: usize) -> RegexTree {
        while self.peek().is_some_and(|c| c != ')') {
            self.bump();
        }
        self.expect(')');
        RegexTree::Group(Group {
            kind: GroupKind::NonCapturing { flags: None },
            element: None,
            range: self.range_from(start),
        })
    }

    /// `(?i)` changes the flags for the rest of the enclosing group,
    /// `(?i:...)` only inside its own.
    fn flag_group(&mut self, start: usize) -> Option<RegexTree> {
        let change = self.flag_change();
        if self.eat(')') {
            self.flags = change.apply(self.flags);
            return Some(RegexTree::Group(Group {
                kind: GroupKind::NonCapturing {
                    flags: Some(change),
                },
                element: None,
                range: self.range_from(start),
            }));
        }
        if !self.at(':') {
            self.expected("flag, ':' or ')'");
            return None;
        }
        self.bump();
        let saved = self.flags;
        self.flags = change.apply(saved);
        let element = self.disjunction();
        self.flags = saved;
        self.expect(')');
        Some(RegexTree::Group(Group {
            kind: GroupKind::NonCapturing {
                flags: Some(change),
            },
            element: Some(Box::new(element)),
            range: self.range_from(start),
        }))
    }

    fn flag_change(&mut self) -> FlagChange {
        let mut change = FlagChange::default();
        let mut disabling = false;
        loop {
            match self.peek() {
                Some('-') if !disabling => {
                    disabling = true;
                    self.bump();
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    match FlagSet::from_inline(c) {
                        Some(flag) if disabling => change.disabled |= flag,
                        Some(flag) => change.enabled |= flag,
                        None => {
                            let range = self.current_range();
                            self.error(format!("Unknown flag '{c}'"), range);
                        }
                    }
                    self.bump();
                }
                _ => return change,
            }
        }
    }

    /// `(?(condition)yes|no)`; the cursor is on the condition's `(`.
    fn conditional(&mut self, start: usize) -> RegexTree {
        let condition = if self.peek_at(1) == Some('?') {
            let at = self.offset();
            match self.group() {
                Some(RegexTree::Group(group))
                    if matches!(group.kind, GroupKind::Lookaround { .. }) =>
                {
                    Condition::Assertion(Box::new(group))
                }
                _ => {
                    self.error("Expected lookaround as condition", self.range_from(at));
                    Condition::Reference(String::new())
                }
            }
        } else {
            self.bump();
            let mut reference = String::new();
            while let Some(c) = self.peek().filter(|c| *c != ')') {
                reference.push(c);
                self.bump();
            }
            self.expect(')');
            Condition::Reference(reference)
        };
        let saved = self.flags;
        let body = self.disjunction();
        self.flags = saved;
        let (yes, no) = match body {
            RegexTree::Disjunction(disjunction) => {
                if disjunction.alternatives.len() > 2 {
                    self.error(
                        "Conditional group has more than two alternatives",
                        disjunction.range.clone(),
                    );
                }
                let at = disjunction.range.start;
                let mut alternatives = disjunction.alternatives.into_iter();
                let yes = alternatives.next().unwrap_or_else(|| empty_sequence(at));
                (yes, alternatives.next().map(Box::new))
            }
            other => (other, None),
        };
        self.expect(')');
        RegexTree::Conditional(Conditional {
            condition,
            yes: Box::new(yes),
            no,
            range: self.range_from(start),
        })
    }

    // --- character classes

    fn class(&mut self) -> CharacterClass {
        let start = self.offset();
        self.bump();
        let negated = self.eat('^');
        let union_start = self.offset();
        let mut operand_start = union_start;
        let mut operands = Vec::new();
        let mut elements = Vec::new();
        if self.at(']') {
            elements.push(ClassElement::Character(self.plain_character(']')));
        }
        let union_end = loop {
            if self.flags.contains(FlagSet::EXTENDED) {
                while self.peek().is_some_and(char::is_whitespace) {
                    self.bump();
                }
            }
            match self.peek() {
                None => {
                    self.expected("']'");
                    break self.offset();
                }
                Some(']') => {
                    let end = self.offset();
                    self.bump();
                    break end;
                }
                Some('&') if self.peek_at(1) == Some('&') => {
                    let end = self.offset();
                    self.bump_n(2);
                    operands.push(ClassUnion {
                        elements: std::mem::take(&mut elements),
                        flags: self.flags,
                        range: operand_start..end,
                    });
                    operand_start = self.offset();
                }
                Some('[') => elements.push(self.nested_or_posix()),
                Some('\\') if self.peek_at(1) == Some('Q') => {
                    elements.extend(self.quoted().into_iter().map(ClassElement::Character));
                }
                Some('\\') if self.peek_at(1) == Some('E') => self.bump_n(2),
                Some(_) => {
                    if let Some(element) = self.class_range() {
                        elements.push(element);
                    }
                }
            }
        };
        let elements = if operands.is_empty() {
            elements
        } else {
            operands.push(ClassUnion {
                elements,
                flags: self.flags,
                range: operand_start..union_end,
            });
            vec![ClassElement::Intersection(ClassIntersection {
                operands,
                range: union_start..union_end,
            })]
        };
        CharacterClass {
            negated,
            union: ClassUnion {
                elements,
                flags: self.flags,
                range: union_start..union_end,
            },
            range: self.range_from(start),
        }
    }

    fn nested_or_posix(&mut self) -> ClassElement {
        match self.posix_class() {
            Some(posix) => ClassElement::Posix(posix),
            None => ClassElement::Nested(self.class()),
        }
    }

    /// `[:name:]` or `[:^name:]`, if that is what follows.
    fn posix_class(&mut self) -> Option<PosixClass> {
        if self.peek_at(1) != Some(':') {
            return None;
        }
        let negated = self.peek_at(2) == Some('^');
        let name_start = if negated { 3 } else { 2 };
        let mut i = name_start;
        while self.peek_at(i).is_some_and(|c| c.is_ascii_alphabetic()) {
            i += 1;
        }
        if i == name_start || self.peek_at(i) != Some(':') || self.peek_at(i + 1) != Some(']') {
            return None;
        }
        let start = self.offset();
        let name: String = (name_start..i).filter_map(|k| self.peek_at(k)).collect();
        self.bump_n(i + 2);
        Some(PosixClass {
            name,
            negated,
            range: self.range_from(start),
        })
    }

    /// A class atom, extended to a range when `-` and a character follow.
    fn class_range(&mut self) -> Option<ClassElement> {
        let from = match self.class_atom()? {
            ClassElement::Character(from) => from,
            other => return Some(other),
        };
        let forms_range = self.at('-')
            && match (self.peek_at(1), self.peek_at(2)) {
                (None | Some(']' | '['), _) => false,
                (Some('\\'), Some(c)) => !is_class_escape(c) && !matches!(c, 'Q' | 'E'),
                _ => true,
            };
        if !forms_range {
            return Some(ClassElement::Character(from));
        }
        self.bump();
        match self.class_atom() {
            Some(ClassElement::Character(to)) => {
                let range = from.range.start..to.range.end;
                Some(ClassElement::Range(ClassRange { from, to, range }))
            }
            _ => Some(ClassElement::Character(from)),
        }
    }

    fn class_atom(&mut self) -> Option<ClassElement> {
        let start = self.offset();
        let c = self.peek()?;
        if c != '\\' {
            return Some(ClassElement::Character(self.plain_character(c)));
        }
        self.bump();
        let Some(letter) = self.peek() else {
            self.expected("escaped character");
            return None;
        };
        if is_class_escape(letter) {
            return Some(ClassElement::EscapedClass(self.escaped_class(start, letter)));
        }
        let code_point = match letter {
            'b' => {
                self.bump();
                0x08
            }
            '1'..='7' => self.digits(8, 3).0,
            _ => return self.character_escape(start).map(ClassElement::Character),
        };
        Some(ClassElement::Character(Character {
            code_point,
            range: self.range_from(start),
        }))
    }
}

fn empty_sequence(at: usize) -> RegexTree {
    RegexTree::Sequence(Sequence {
        items: Vec::new(),
        range: at..at,
    })
}
