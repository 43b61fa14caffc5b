//! Syntactic equivalence of trees.
//!
//! Two trees are equivalent when they have the same shape and the same
//! token text, regardless of layout and comments. No normalization is
//! applied here; strip parentheses first with
//! [`skip_parentheses`](crate::tree::skip_parentheses) if that is wanted.

use std::ptr;

use crate::tree::Tree;

/// Whether `a` and `b` are syntactically equivalent.
///
/// Nodes of different kinds are never equivalent; leaves compare by token
/// text; interior nodes compare slot by slot, absent slots included.
#[must_use]
pub fn equivalent(a: &Tree, b: &Tree) -> bool {
    if ptr::eq(a, b) {
        return true;
    }
    if a.kind() != b.kind() {
        return false;
    }
    match (a.token(), b.token()) {
        (Some(left), Some(right)) => left.text == right.text,
        (None, None) => equivalent_sequences(a.children(), b.children()),
        _ => false,
    }
}

/// Equivalence of optional trees: two absent trees are equivalent.
#[must_use]
pub fn equivalent_opt(a: Option<&Tree>, b: Option<&Tree>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => equivalent(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Pairwise equivalence of two sequences of the same length.
///
/// Useful for argument lists or statement blocks that do not share a
/// parent node.
pub fn equivalent_sequences<'a, 'b>(
    a: impl IntoIterator<Item = Option<&'a Tree>>,
    b: impl IntoIterator<Item = Option<&'b Tree>>,
) -> bool {
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    loop {
        match (a.next(), b.next()) {
            (None, None) => return true,
            (Some(left), Some(right)) => {
                if !equivalent_opt(left, right) {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use crate::tree::{Kind, skip_parentheses};

    fn expr(source: &str) -> Tree {
        let input = format!("<?php {source};");
        let unit = parse(&tokenize(&input).tokens).expect("should parse");
        unit.child(1)
            .and_then(|s| s.child(0))
            .cloned()
            .expect("expression")
    }

    #[test]
    fn same_tree_is_equivalent() {
        let tree = expr("f($a, 1)");
        assert!(equivalent(&tree, &tree));
    }

    #[test]
    fn layout_does_not_matter() {
        assert!(equivalent(&expr("f($a,1)"), &expr("f( $a , /* x */ 1 )")));
    }

    #[test]
    fn literal_text_matters() {
        assert!(!equivalent(&expr("f($a, 1)"), &expr("f($a, 2)")));
        assert!(!equivalent(&expr("'a'"), &expr("\"a\"")));
    }

    #[test]
    fn kinds_must_match() {
        assert!(!equivalent(&expr("$a + $b"), &expr("$a - $b")));
    }

    #[test]
    fn absent_slots_must_match() {
        assert!(!equivalent(&expr("$a ? $b : $c"), &expr("$a ?: $c")));
    }

    #[test]
    fn parentheses_are_not_normalized() {
        let wrapped = expr("($a)");
        let bare = expr("$a");
        assert!(!equivalent(&wrapped, &bare));
        assert!(equivalent(skip_parentheses(&wrapped), &bare));
    }

    #[test]
    fn sequences_of_different_length() {
        let a = expr("f($a, $b)");
        let b = expr("f($a)");
        let args = |t: &Tree| t.child(1).and_then(|a| a.child(1)).cloned().expect("args");
        let (left, right) = (args(&a), args(&b));
        assert!(!equivalent_sequences(left.children(), right.children()));
        assert!(equivalent_sequences(
            left.children().take(1),
            right.children().take(1)
        ));
        assert!(left.is(Kind::SeparatedList));
    }

    #[test]
    fn optional_comparison() {
        let a = expr("$a");
        assert!(equivalent_opt(None, None));
        assert!(!equivalent_opt(Some(&a), None));
    }
}
