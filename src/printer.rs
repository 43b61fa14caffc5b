//! Source reconstruction and debug outlines of a [`Tree`].

use std::fmt::Write;

use crate::token::{Span, end_of};
use crate::tree::Tree;

/// Rebuild source text by laying out every token and comment at its
/// recorded position.
///
/// Whitespace between tokens is rendered as newlines and spaces, so the
/// output re-lexes to the same tokens at the same positions.
#[must_use]
pub fn to_source(tree: &Tree) -> String {
    let mut out = String::new();
    let mut cursor = Span::new(1, 0);
    for token in tree.tokens() {
        for comment in &token.trivia {
            place(&mut out, &mut cursor, &comment.text, comment.span);
        }
        place(&mut out, &mut cursor, &token.text, token.span);
    }
    out
}

fn place(out: &mut String, cursor: &mut Span, text: &str, at: Span) {
    if at.line > cursor.line {
        for _ in cursor.line..at.line {
            out.push('\n');
        }
        cursor.column = 0;
    }
    for _ in cursor.column..at.column {
        out.push(' ');
    }
    out.push_str(text);
    *cursor = end_of(text, at);
}

/// Indented outline of kinds, with leaf text and absent slots.
///
/// ```
/// use php_frontend_rs::{parse_str, printer::dump};
///
/// let tree = parse_str("<?php $a ** 2;").unwrap();
/// assert!(dump(&tree).contains("Power\n"));
/// ```
#[must_use]
pub fn dump(tree: &Tree) -> String {
    let mut out = String::new();
    dump_into(&mut out, Some(tree), 0);
    out
}

fn dump_into(out: &mut String, tree: Option<&Tree>, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    let Some(tree) = tree else {
        out.push_str("-\n");
        return;
    };
    match tree.token() {
        Some(token) => {
            let _ = writeln!(out, "{:?} {:?}", tree.kind(), token.text);
        }
        None => {
            let _ = writeln!(out, "{:?}", tree.kind());
            for child in tree.children() {
                dump_into(out, child, depth + 1);
            }
        }
    }
}
