//! Tree of a parsed regular expression.
//!
//! Every node records the raw range of the pattern text it was parsed
//! from; [`RegexSource::location_in_file_for`] turns such a range into a
//! file location.
//!
//! [`RegexSource::location_in_file_for`]: super::source::RegexSource::location_in_file_for

use std::ops::Range;

use super::flags::{FlagChange, FlagSet};

/// Any regex term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexTree {
    Sequence(Sequence),
    Disjunction(Disjunction),
    Group(Group),
    Conditional(Conditional),
    Repetition(Repetition),
    Character(Character),
    Dot(Dot),
    Boundary(Boundary),
    BackReference(BackReference),
    EscapedClass(EscapedClass),
    CharacterClass(CharacterClass),
}

impl RegexTree {
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        match self {
            Self::Sequence(t) => t.range.clone(),
            Self::Disjunction(t) => t.range.clone(),
            Self::Group(t) => t.range.clone(),
            Self::Conditional(t) => t.range.clone(),
            Self::Repetition(t) => t.range.clone(),
            Self::Character(t) => t.range.clone(),
            Self::Dot(t) => t.range.clone(),
            Self::Boundary(t) => t.range.clone(),
            Self::BackReference(t) => t.range.clone(),
            Self::EscapedClass(t) => t.range.clone(),
            Self::CharacterClass(t) => t.range.clone(),
        }
    }
}

/// Terms matched one after the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub items: Vec<RegexTree>,
    pub range: Range<usize>,
}

/// `a|b|c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disjunction {
    pub alternatives: Vec<RegexTree>,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKind {
    /// `(...)`, `(?<name>...)`, `(?P<name>...)`, `(?'name'...)`.
    Capturing { index: usize, name: Option<String> },
    /// `(?:...)`, `(?i:...)`, a bare `(?i)` without element, and
    /// recursion such as `(?R)`, also without element.
    NonCapturing { flags: Option<FlagChange> },
    /// `(?>...)`.
    Atomic,
    /// `(?=...)`, `(?!...)`, `(?<=...)`, `(?<!...)`.
    Lookaround { behind: bool, negated: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: GroupKind,
    pub element: Option<Box<RegexTree>>,
    pub range: Range<usize>,
}

/// What a conditional group tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// A group number or name, `R`, `R1`, `R&name` or `DEFINE`.
    Reference(String),
    /// A lookaround assertion.
    Assertion(Box<Group>),
}

/// `(?(condition)yes|no)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
    pub condition: Condition,
    pub yes: Box<RegexTree>,
    pub no: Option<Box<RegexTree>>,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greediness {
    Greedy,
    /// `*?`
    Lazy,
    /// `*+`
    Possessive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantifier {
    pub min: u32,
    /// `None` for unbounded.
    pub max: Option<u32>,
    pub greediness: Greediness,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repetition {
    pub element: Box<RegexTree>,
    pub quantifier: Quantifier,
    pub range: Range<usize>,
}

/// A single code point, literal or escaped.
///
/// Code points are `u32` because escapes such as `\ud800` may denote
/// unpaired surrogates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub code_point: u32,
    pub range: Range<usize>,
}

impl Character {
    /// The character, unless the code point is a lone surrogate.
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        char::from_u32(self.code_point)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dot {
    pub range: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// `^`
    LineStart,
    /// `$`
    LineEnd,
    /// `\A`
    InputStart,
    /// `\z`
    InputEnd,
    /// `\Z`
    InputEndFinalTerminator,
    /// `\G`
    PreviousMatchEnd,
    /// `\b`
    Word,
    /// `\B`
    NonWord,
    /// `\K`
    MatchStartReset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub kind: BoundaryKind,
    pub range: Range<usize>,
}

/// `\1`, `\g{2}`, `\k<name>`, `(?P=name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackReference {
    pub reference: String,
    pub range: Range<usize>,
}

/// `\d`, `\W`, `\p{L}`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapedClass {
    /// The letter after the backslash.
    pub letter: char,
    /// Property of `\p` and `\P`.
    pub property: Option<String>,
    pub range: Range<usize>,
}

impl EscapedClass {
    /// Whether this is the complement of its lower-case counterpart.
    #[must_use]
    pub const fn is_negation(&self) -> bool {
        self.letter.is_ascii_uppercase()
    }
}

/// `[...]` or `[^...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterClass {
    pub negated: bool,
    pub union: ClassUnion,
    pub range: Range<usize>,
}

/// Members of a character class, with the flags active at the class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassUnion {
    pub elements: Vec<ClassElement>,
    pub flags: FlagSet,
    pub range: Range<usize>,
}

/// One member of a character class union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassElement {
    Character(Character),
    Range(ClassRange),
    EscapedClass(EscapedClass),
    Posix(PosixClass),
    Nested(CharacterClass),
    Intersection(ClassIntersection),
}

impl ClassElement {
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        match self {
            Self::Character(e) => e.range.clone(),
            Self::Range(e) => e.range.clone(),
            Self::EscapedClass(e) => e.range.clone(),
            Self::Posix(e) => e.range.clone(),
            Self::Nested(e) => e.range.clone(),
            Self::Intersection(e) => e.range.clone(),
        }
    }
}

/// `a-z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRange {
    pub from: Character,
    pub to: Character,
    pub range: Range<usize>,
}

/// `[:alpha:]` or `[:^alpha:]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosixClass {
    pub name: String,
    pub negated: bool,
    pub range: Range<usize>,
}

/// `a-z&&[^aeiou]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassIntersection {
    pub operands: Vec<ClassUnion>,
    pub range: Range<usize>,
}
