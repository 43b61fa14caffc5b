//! Character classes flattened into sets of code points.
//!
//! A [`ClassSet`] is a step function over `0..=0x10FFFF`: each key starts
//! a run of code points that either belongs to some class element or to
//! none. Runs remember the element that contributed them so overlaps can
//! be reported against the right source range.
//!
//! Some members cannot be enumerated (`\p{..}`, POSIX classes,
//! intersections, Unicode `\w`). They contribute what is known and mark
//! the set as partially unknown.

use std::collections::BTreeMap;
use std::ops::Range;

use super::ast::{CharacterClass, ClassElement, ClassUnion, EscapedClass};
use super::flags::FlagSet;

pub const MAX_CODE_POINT: u32 = 0x10_FFFF;

const DIGITS: &[(u32, u32)] = &[(0x30, 0x39)];
const WORD: &[(u32, u32)] = &[(0x30, 0x39), (0x41, 0x5A), (0x5F, 0x5F), (0x61, 0x7A)];
const ASCII_SPACE: &[(u32, u32)] = &[(0x09, 0x0D), (0x20, 0x20)];
const UNICODE_SPACE: &[(u32, u32)] = &[
    (0x09, 0x0D),
    (0x20, 0x20),
    (0x85, 0x85),
    (0xA0, 0xA0),
    (0x1680, 0x1680),
    (0x2000, 0x200A),
    (0x2028, 0x2029),
    (0x202F, 0x202F),
    (0x205F, 0x205F),
    (0x3000, 0x3000),
];
const HORIZONTAL_SPACE: &[(u32, u32)] = &[
    (0x09, 0x09),
    (0x20, 0x20),
    (0xA0, 0xA0),
    (0x1680, 0x1680),
    (0x180E, 0x180E),
    (0x2000, 0x200A),
    (0x202F, 0x202F),
    (0x205F, 0x205F),
    (0x3000, 0x3000),
];
const VERTICAL_SPACE: &[(u32, u32)] = &[(0x0A, 0x0D), (0x85, 0x85), (0x2028, 0x2029)];

/// A class element that cannot be turned into a set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassSetError {
    #[error("Illegal character range {from:#X}-{to:#X}")]
    InvertedRange {
        from: u32,
        to: u32,
        range: Range<usize>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ClassSet<'a> {
    steps: BTreeMap<u32, Option<&'a ClassElement>>,
    unknown: bool,
}

impl<'a> ClassSet<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The code points matched by one element of a union, all owned by
    /// that element.
    pub fn of_element(element: &'a ClassElement, flags: FlagSet) -> Result<Self, ClassSetError> {
        let mut set = Self::new();
        set.add_element(element, flags, element)?;
        Ok(set)
    }

    /// Whether some members could not be enumerated.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.unknown
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.values().all(Option::is_none)
    }

    #[must_use]
    pub fn contains(&self, code_point: u32) -> bool {
        self.owner_of(code_point).is_some()
    }

    /// The element that last contributed `code_point`.
    #[must_use]
    pub fn owner_of(&self, code_point: u32) -> Option<&'a ClassElement> {
        self.steps
            .range(..=code_point)
            .next_back()
            .and_then(|(_, owner)| *owner)
    }

    /// Owned runs as inclusive `(from, to, owner)` triples, in order.
    pub fn ranges(&self) -> impl Iterator<Item = (u32, u32, &'a ClassElement)> + '_ {
        let mut steps = self.steps.iter().peekable();
        std::iter::from_fn(move || {
            loop {
                let (&from, &owner) = steps.next()?;
                let to = steps.peek().map_or(MAX_CODE_POINT, |next| *next.0 - 1);
                if let Some(owner) = owner {
                    return Some((from, to, owner));
                }
            }
        })
    }

    /// Elements of this set that share code points with `other`, ordered
    /// by the first shared code point, each listed once.
    #[must_use]
    pub fn intersections(&self, other: &ClassSet<'_>) -> Vec<&'a ClassElement> {
        let mut found: Vec<&'a ClassElement> = Vec::new();
        for (from, to, owner) in self.ranges() {
            if other.intersects(from, to) && !found.iter().any(|f| std::ptr::eq(*f, owner)) {
                found.push(owner);
            }
        }
        found
    }

    fn intersects(&self, from: u32, to: u32) -> bool {
        self.owner_of(from).is_some() || self.steps.range(from..=to).any(|(_, o)| o.is_some())
    }

    /// Add every run of `other`, keeping its owners.
    pub fn add_set(&mut self, other: &ClassSet<'a>) {
        for (from, to, owner) in other.ranges() {
            self.add_exact_range(from, to, owner);
        }
        self.unknown |= other.unknown;
    }

    /// Add `from..=to` without case folding; the new owner wins.
    pub fn add_exact_range(&mut self, from: u32, to: u32, owner: &'a ClassElement) {
        let after = (to < MAX_CODE_POINT).then(|| self.owner_of(to + 1));
        let covered: Vec<u32> = self.steps.range(from..=to).map(|(k, _)| *k).collect();
        for key in covered {
            self.steps.remove(&key);
        }
        if let Some(after) = after {
            self.steps.insert(to + 1, after);
        }
        self.steps.insert(from, Some(owner));
    }

    fn add_ranges(&mut self, ranges: &[(u32, u32)], owner: &'a ClassElement) {
        for &(from, to) in ranges {
            self.add_exact_range(from, to, owner);
        }
    }

    /// Add everything not in `other`.
    fn add_complement(&mut self, other: &ClassSet<'_>, owner: &'a ClassElement) {
        let mut next = 0;
        for (from, to, _) in other.ranges() {
            if from > next {
                self.add_exact_range(next, from - 1, owner);
            }
            next = to + 1;
        }
        if next <= MAX_CODE_POINT {
            self.add_exact_range(next, MAX_CODE_POINT, owner);
        }
    }

    fn add_complement_of(&mut self, ranges: &[(u32, u32)], owner: &'a ClassElement) {
        let mut positive = ClassSet::new();
        positive.add_ranges(ranges, owner);
        self.add_complement(&positive, owner);
    }

    /// Add what `element` matches under `flags`, attributed to `owner`.
    pub fn add_element(
        &mut self,
        element: &ClassElement,
        flags: FlagSet,
        owner: &'a ClassElement,
    ) -> Result<(), ClassSetError> {
        match element {
            ClassElement::Character(c) => self.add_character(c.code_point, flags, owner),
            ClassElement::Range(r) => {
                let (from, to) = (r.from.code_point, r.to.code_point);
                if from > to {
                    return Err(ClassSetError::InvertedRange {
                        from,
                        to,
                        range: r.range.clone(),
                    });
                }
                self.add_range(from, to, flags, owner);
            }
            ClassElement::EscapedClass(class) => self.add_escaped_class(class, flags, owner),
            ClassElement::Nested(class) => self.add_nested(class, owner)?,
            ClassElement::Posix(_) | ClassElement::Intersection(_) => self.unknown = true,
        }
        Ok(())
    }

    fn add_union(&mut self, union: &ClassUnion, owner: &'a ClassElement) -> Result<(), ClassSetError> {
        for element in &union.elements {
            self.add_element(element, union.flags, owner)?;
        }
        Ok(())
    }

    fn add_nested(&mut self, class: &CharacterClass, owner: &'a ClassElement) -> Result<(), ClassSetError> {
        let mut inner = ClassSet::new();
        inner.add_union(&class.union, owner)?;
        if !class.negated {
            self.add_set(&inner);
        } else if inner.unknown {
            self.unknown = true;
        } else {
            self.add_complement(&inner, owner);
        }
        Ok(())
    }

    fn add_character(&mut self, code_point: u32, flags: FlagSet, owner: &'a ClassElement) {
        self.add_exact_range(code_point, code_point, owner);
        let Some(c) = char::from_u32(code_point).filter(|c| folds(flags, c.is_ascii())) else {
            return;
        };
        let (lower, upper) = fold(c);
        self.add_exact_range(u32::from(lower), u32::from(lower), owner);
        self.add_exact_range(u32::from(upper), u32::from(upper), owner);
    }

    fn add_range(&mut self, from: u32, to: u32, flags: FlagSet, owner: &'a ClassElement) {
        let letters = char::from_u32(from)
            .zip(char::from_u32(to))
            .filter(|(a, b)| a.is_alphabetic() && b.is_alphabetic())
            .filter(|(a, b)| folds(flags, a.is_ascii() && b.is_ascii()));
        let Some((a, b)) = letters else {
            self.add_exact_range(from, to, owner);
            return;
        };
        let ((lower_a, upper_a), (lower_b, upper_b)) = (fold(a), fold(b));
        let mut added = false;
        for (x, y) in [(lower_a, lower_b), (upper_a, upper_b)] {
            if x <= y {
                self.add_exact_range(u32::from(x), u32::from(y), owner);
                added = true;
            }
        }
        if !added {
            self.add_exact_range(from, to, owner);
        }
    }

    fn add_escaped_class(&mut self, class: &EscapedClass, flags: FlagSet, owner: &'a ClassElement) {
        let unicode = flags.contains(FlagSet::UNICODE_CHARACTER_CLASS);
        let space = if unicode { UNICODE_SPACE } else { ASCII_SPACE };
        match class.letter {
            'd' | 'w' => {
                self.add_ranges(if class.letter == 'd' { DIGITS } else { WORD }, owner);
                self.unknown |= unicode;
            }
            'D' | 'W' if unicode => self.unknown = true,
            'D' => self.add_complement_of(DIGITS, owner),
            'W' => self.add_complement_of(WORD, owner),
            's' => self.add_ranges(space, owner),
            'S' => self.add_complement_of(space, owner),
            'h' => self.add_ranges(HORIZONTAL_SPACE, owner),
            'H' => self.add_complement_of(HORIZONTAL_SPACE, owner),
            'v' => self.add_ranges(VERTICAL_SPACE, owner),
            'V' => self.add_complement_of(VERTICAL_SPACE, owner),
            _ => self.unknown = true,
        }
    }
}

/// Whether case folding applies to a character under `flags`.
const fn folds(flags: FlagSet, ascii: bool) -> bool {
    flags.contains(FlagSet::CASE_INSENSITIVE) && (ascii || flags.contains(FlagSet::UNICODE_CASE))
}

/// Simple lower and upper case; multi-character mappings keep `c`.
fn fold(c: char) -> (char, char) {
    (single(c.to_lowercase(), c), single(c.to_uppercase(), c))
}

fn single(mut mapped: impl Iterator<Item = char>, c: char) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(m), None) => m,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::ast::{Character, ClassRange, RegexTree, Sequence};
    use crate::regex::parser::parse_pattern;

    fn class_of(tree: &RegexTree) -> &CharacterClass {
        match tree {
            RegexTree::CharacterClass(class) => class,
            RegexTree::Sequence(Sequence { items, .. }) => items
                .iter()
                .find_map(|item| match item {
                    RegexTree::CharacterClass(class) => Some(class),
                    _ => None,
                })
                .expect("a class"),
            other => panic!("no class in {other:?}"),
        }
    }

    fn union_set(pattern: &str, check: impl FnOnce(&ClassSet<'_>)) {
        let parsed = parse_pattern(pattern, FlagSet::empty());
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let union = &class_of(&parsed.result).union;
        let mut set = ClassSet::new();
        for element in &union.elements {
            set.add_set(&ClassSet::of_element(element, union.flags).expect("valid"));
        }
        check(&set);
    }

    #[test]
    fn ranges_and_characters() {
        union_set("[a-cx]", |set| {
            assert!(set.contains(u32::from('b')));
            assert!(set.contains(u32::from('x')));
            assert!(!set.contains(u32::from('d')));
            assert_eq!(set.ranges().count(), 2);
        });
    }

    #[test]
    fn later_owner_wins() {
        union_set("[a-ec]", |set| {
            let owners: Vec<(u32, u32)> = set.ranges().map(|(f, t, _)| (f, t)).collect();
            assert_eq!(owners, vec![(0x61, 0x62), (0x63, 0x63), (0x64, 0x65)]);
        });
    }

    #[test]
    fn negated_nested_class_is_complemented() {
        union_set("[[^a]]", |set| {
            assert!(!set.contains(u32::from('a')));
            assert!(set.contains(0));
            assert!(set.contains(MAX_CODE_POINT));
        });
    }

    #[test]
    fn case_folding() {
        union_set("(?i)[k]", |set| {
            assert!(set.contains(u32::from('K')));
        });
        union_set("(?i)[é]", |set| {
            assert!(!set.contains(u32::from('É')));
        });
        union_set("(?iu)[é]", |set| {
            assert!(set.contains(u32::from('É')));
        });
        union_set("(?i)[A-z]", |set| {
            assert!(!set.contains(u32::from('_')));
            assert!(set.contains(u32::from('q')));
        });
    }

    #[test]
    fn unicode_classes_are_partially_unknown() {
        union_set("(?U)[\\w]", |set| {
            assert!(set.is_unknown());
            assert!(set.contains(u32::from('a')));
        });
        union_set("(?U)[\\W]", |set| {
            assert!(set.is_unknown());
            assert!(set.is_empty());
        });
        union_set("[\\p{L}]", |set| assert!(set.is_unknown()));
    }

    #[test]
    fn whitespace_classes() {
        union_set("[\\s]", |set| {
            assert!(set.contains(0x0B));
            assert!(!set.contains(0xA0));
        });
        union_set("(?U)[\\S]", |set| {
            assert!(!set.contains(0x2028));
            assert!(set.contains(u32::from('x')));
        });
    }

    #[test]
    fn inverted_range_is_an_error() {
        let parsed = parse_pattern("[z-a]", FlagSet::empty());
        let union = &class_of(&parsed.result).union;
        let err = ClassSet::of_element(&union.elements[0], union.flags).expect_err("inverted");
        assert_eq!(err.to_string(), "Illegal character range 0x7A-0x61");
    }

    #[test]
    fn intersections_in_code_point_order() {
        let parsed = parse_pattern("[xa-c]", FlagSet::empty());
        let union = &class_of(&parsed.result).union;
        let mut accumulated = ClassSet::new();
        for element in &union.elements {
            accumulated.add_set(&ClassSet::of_element(element, union.flags).expect("valid"));
        }
        let probe = ClassElement::Range(ClassRange {
            from: Character {
                code_point: u32::from('a'),
                range: 0..1,
            },
            to: Character {
                code_point: u32::from('z'),
                range: 2..3,
            },
            range: 0..3,
        });
        let other = ClassSet::of_element(&probe, FlagSet::empty()).expect("valid");
        let found = accumulated.intersections(&other);
        assert_eq!(found.len(), 2);
        assert!(std::ptr::eq(found[0], &union.elements[1]));
        assert!(std::ptr::eq(found[1], &union.elements[0]));
    }
}
