//! Property-based tests with proptest.
//!
//! Generate random expressions and patterns and check properties that
//! must hold for any input: printing round-trips, layout never changes
//! equivalence, token spacing follows the source, and the regex parser
//! stays inside its input.

mod common;

use common::{expr, parse_ok, roundtrip};
use php_frontend_rs::printer::to_source;
use php_frontend_rs::regex::{FlagSet, RegexSource, parse_pattern};
use php_frontend_rs::{Token, Tree, equivalent, is_on_same_line, spacing_between, tokenize};
use proptest::prelude::*;

// -- Strategies --

fn variable() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_map(|name| format!("${name}"))
}

fn literal() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..10_000).prop_map(|n| n.to_string()),
        "[a-zA-Z0-9 ]{0,12}".prop_map(|s| format!("'{s}'")),
        Just("null".to_string()),
        Just("true".to_string()),
    ]
}

fn operator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "+", "-", "*", "/", "%", ".", "**", "==", "===", "!=", "<", ">=", "&&", "||", "??", "&",
        "|", "^", "<<", ">>", "<=>",
    ])
}

/// Expressions as token lists, so the same expression can be laid out
/// in different ways.
fn expression() -> impl Strategy<Value = Vec<String>> {
    let leaf = prop_oneof![variable(), literal()].prop_map(|t| vec![t]);
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), operator(), inner.clone()).prop_map(|(mut l, op, r)| {
                l.push(op.to_string());
                l.extend(r);
                l
            }),
            inner.clone().prop_map(|e| {
                let mut out = vec!["(".to_string()];
                out.extend(e);
                out.push(")".to_string());
                out
            }),
            ("f_[a-z]{0,6}", prop::collection::vec(inner, 0..3)).prop_map(|(name, args)| {
                let mut out = vec![name, "(".to_string()];
                for (i, arg) in args.into_iter().enumerate() {
                    if i > 0 {
                        out.push(",".to_string());
                    }
                    out.extend(arg);
                }
                out.push(")".to_string());
                out
            }),
        ]
    })
}

fn layout() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(vec![" ", "  ", "\n", " /* c */ "]), 64)
}

fn join(tokens: &[String], gaps: &[&str]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push_str(gaps[i % gaps.len()]);
        }
        out.push_str(token);
    }
    out
}

/// Pattern characters, biased towards regex syntax.
fn pattern() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "a", "z", "0", "9", "-", "[", "]", "^", "(", ")", "?", ":", "*", "+", "{", "}", ",",
            "|", "\\", "d", "w", "Q", "E", "x", "u", "p", "<", ">", "=", "!", "&", "#", " ", "P",
        ]),
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

// -- Properties --

proptest! {
    #[test]
    fn printed_expressions_round_trip(tokens in expression()) {
        roundtrip(&format!("<?php {};\n", tokens.join(" ")));
    }

    #[test]
    fn layout_keeps_equivalence(tokens in expression(), gaps in layout()) {
        let compact = expr(&tokens.join(" "));
        let spread = expr(&join(&tokens, &gaps));
        prop_assert!(equivalent(&compact, &spread));
    }

    #[test]
    fn reprinting_is_stable(tokens in expression(), gaps in layout()) {
        let tree = parse_ok(&format!("<?php\n{};", join(&tokens, &gaps)));
        let printed = to_source(&tree);
        prop_assert_eq!(to_source(&parse_ok(&printed)), printed);
    }

    #[test]
    fn equivalence_is_reflexive_and_symmetric(a in expression(), b in expression()) {
        let (a, b) = (expr(&a.join(" ")), expr(&b.join(" ")));
        prop_assert!(equivalent(&a, &a));
        prop_assert_eq!(equivalent(&a, &b), equivalent(&b, &a));
    }

    #[test]
    fn spacing_grows_with_inserted_spaces(spaces in 0usize..40) {
        let tree = parse_ok(&format!("<?php $a{}+ $b;", " ".repeat(spaces)));
        let tokens: Vec<&Token> = tree.tokens().collect();
        let (a, plus) = (tokens[1], tokens[2]);
        prop_assert!(is_on_same_line(&[a, plus]));
        prop_assert_eq!(spacing_between(a, plus), isize::try_from(spaces).unwrap_or(isize::MAX));
    }

    #[test]
    fn same_line_follows_line_breaks(breaks in prop::collection::vec(any::<bool>(), 1..8)) {
        let mut source = String::from("<?php $v0");
        for (i, newline) in breaks.iter().enumerate() {
            source.push_str(if *newline { "\n+ " } else { " + " });
            source.push_str(&format!("$v{}", i + 1));
        }
        source.push(';');
        let tree = parse_ok(&source);
        let variables: Vec<&Token> = tree.tokens().filter(|t| t.text.starts_with('$')).collect();
        prop_assert!(is_on_same_line(&variables[..1]));
        prop_assert_eq!(is_on_same_line(&variables), !breaks.contains(&true));
    }

    #[test]
    fn regex_errors_stay_inside_the_pattern(pattern in pattern()) {
        let len = pattern.chars().count();
        let parsed = parse_pattern(&pattern, FlagSet::empty());
        prop_assert!(parsed.result.range().end <= len);
        for error in &parsed.errors {
            prop_assert!(error.range.start <= error.range.end);
            prop_assert!(error.range.end <= len, "{} in {:?}", error, pattern);
        }
    }

    #[test]
    fn extended_patterns_never_panic(pattern in pattern()) {
        let flags = FlagSet::EXTENDED | FlagSet::CASE_INSENSITIVE | FlagSet::UNICODE_CASE;
        let _ = parse_pattern(&pattern, flags);
    }

    #[test]
    fn lexer_always_ends_with_eof(input in "\\PC{0,40}") {
        let lexed = tokenize(&format!("<?php {input}"));
        prop_assert_eq!(
            lexed.tokens.last().map(|t| t.kind),
            Some(php_frontend_rs::TokenKind::Eof)
        );
    }
}

#[test]
fn trees_and_sources_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Tree>();
    assert_send_sync::<RegexSource>();
    assert_send_sync::<php_frontend_rs::Error>();
}
