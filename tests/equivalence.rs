//! Syntactic equivalence of parsed expressions and statements.

mod common;

use common::{expr, parse_ok};
use php_frontend_rs::{Kind, Tree, equivalent, equivalent_opt, equivalent_sequences, skip_parentheses};

fn assert_equivalent(a: &str, b: &str) {
    assert!(equivalent(&expr(a), &expr(b)), "{a} should be equivalent to {b}");
}

fn assert_different(a: &str, b: &str) {
    assert!(!equivalent(&expr(a), &expr(b)), "{a} should differ from {b}");
}

// -----------------------------------------------------------
// Equivalence
// -----------------------------------------------------------

#[test]
fn layout_and_comments_do_not_matter() {
    assert_equivalent("$a + $b", "$a/* sum */+\n  $b");
    assert_equivalent("foo( 1 , 2 )", "foo(1,2)");
    assert_equivalent("[1, 2]", "[1,\n 2]");
}

#[test]
fn token_text_matters() {
    assert_different("$a + $b", "$a + $c");
    assert_different("$a + $b", "$a - $b");
    assert_different("'a'", "\"a\"");
    assert_different("1", "01");
}

#[test]
fn shape_matters() {
    assert_different("$a + $b * $c", "($a + $b) * $c");
    assert_different("foo(1)", "foo(1, 2)");
    assert_different("$a", "$a[0]");
}

#[test]
fn trailing_comma_is_a_difference() {
    assert_different("foo(1)", "foo(1,)");
}

#[test]
fn parentheses_are_kept_unless_skipped() {
    let wrapped = expr("(($a))");
    let plain = expr("$a");
    assert!(wrapped.is(Kind::ParenthesisedExpression));
    assert!(!equivalent(&wrapped, &plain));
    assert!(equivalent(skip_parentheses(&wrapped), &plain));
}

#[test]
fn optional_and_sequence_forms() {
    let a = expr("$x");
    let b = expr("$x");
    assert!(equivalent_opt(None, None));
    assert!(equivalent_opt(Some(&a), Some(&b)));
    assert!(!equivalent_opt(Some(&a), None));

    let left = parse_ok("<?php f($a, null);");
    let right = parse_ok("<?php g($a, null);");
    let args = |tree: &Tree| {
        tree.descendants()
            .find(|t| t.is(Kind::Arguments))
            .cloned()
            .expect("arguments")
    };
    let (l, r) = (args(&left), args(&right));
    assert!(equivalent_sequences(l.children(), r.children()));
    assert!(!equivalent_sequences(l.children(), r.children().take(1)));
}

#[test]
fn whole_statements() {
    let a = parse_ok("<?php if ($a) { return 1; } else { return 2; }");
    let b = parse_ok("<?php\nif ($a) {\n    return 1;\n} else {\n    return 2;\n}\n");
    let c = parse_ok("<?php if ($a) { return 1; } else { return 3; }");
    assert!(equivalent(&a, &b));
    assert!(!equivalent(&a, &c));
}

#[test]
fn calls_compare_argument_by_argument() {
    assert_equivalent("f($a, $b)", "f($a, $b)");
    assert_different("f($a, $b)", "f($a, $c)");
    assert_different("f($a, $b)", "g($a, $b)");
}
