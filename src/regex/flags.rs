//! Regex matching flags, from pattern modifiers and inline `(?flags)`.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of active regex flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FlagSet(u8);

impl FlagSet {
    pub const CASE_INSENSITIVE: Self = Self(1);
    pub const MULTILINE: Self = Self(1 << 1);
    pub const DOTALL: Self = Self(1 << 2);
    /// Whitespace and `#` comments are ignored.
    pub const EXTENDED: Self = Self(1 << 3);
    /// Case folding applies beyond ASCII.
    pub const UNICODE_CASE: Self = Self(1 << 4);
    /// `\w`, `\d`, `\s` and friends use Unicode semantics.
    pub const UNICODE_CHARACTER_CLASS: Self = Self(1 << 5);

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Flags set by the modifiers following a pattern's closing delimiter.
    ///
    /// Unknown modifiers are ignored.
    #[must_use]
    pub fn from_modifiers(modifiers: &str) -> Self {
        modifiers
            .chars()
            .filter_map(|c| match c {
                'i' => Some(Self::CASE_INSENSITIVE),
                'm' => Some(Self::MULTILINE),
                's' => Some(Self::DOTALL),
                'x' => Some(Self::EXTENDED),
                'u' => Some(Self::UNICODE_CASE),
                _ => None,
            })
            .fold(Self::empty(), Self::union)
    }

    /// Flag set by one inline flag letter, `Some(empty)` for letters that
    /// are accepted but do not affect analysis.
    #[must_use]
    pub const fn from_inline(letter: char) -> Option<Self> {
        match letter {
            'i' => Some(Self::CASE_INSENSITIVE),
            'm' => Some(Self::MULTILINE),
            's' => Some(Self::DOTALL),
            'x' => Some(Self::EXTENDED),
            'u' => Some(Self::UNICODE_CASE),
            'U' => Some(Self(
                Self::UNICODE_CHARACTER_CLASS.0 | Self::UNICODE_CASE.0,
            )),
            'J' | 'n' => Some(Self::empty()),
            _ => None,
        }
    }
}

impl BitOr for FlagSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for FlagSet {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

const LETTERS: [(FlagSet, char); 6] = [
    (FlagSet::CASE_INSENSITIVE, 'i'),
    (FlagSet::MULTILINE, 'm'),
    (FlagSet::DOTALL, 's'),
    (FlagSet::EXTENDED, 'x'),
    (FlagSet::UNICODE_CASE, 'u'),
    (FlagSet::UNICODE_CHARACTER_CLASS, 'U'),
];

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, letter) in LETTERS {
            if self.contains(flag) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

/// Flags switched on and off by an inline flag group such as `(?i-m)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagChange {
    pub enabled: FlagSet,
    pub disabled: FlagSet,
}

impl FlagChange {
    #[must_use]
    pub const fn apply(self, flags: FlagSet) -> FlagSet {
        flags.union(self.enabled).difference(self.disabled)
    }
}
