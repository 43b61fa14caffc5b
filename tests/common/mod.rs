#![allow(dead_code)]

use php_frontend_rs::printer::to_source;
use php_frontend_rs::regex::{RegexSource, RegexSourceError, duplicates_in_character_class};
use php_frontend_rs::{Finding, Kind, Tree, parse_str};

pub fn parse_ok(input: &str) -> Tree {
    parse_str(input).unwrap_or_else(|e| panic!("failed to parse: {e}\n--- input ---\n{input}"))
}

pub fn roundtrip(input: &str) {
    let tree = parse_ok(input);
    let output = to_source(&tree);
    assert_eq!(
        output, input,
        "round-trip mismatch:\n--- expected ---\n{input}\n--- got ---\n{output}"
    );
}

/// The expression of the first expression statement in `code`, which is
/// wrapped in `<?php ... ;`.
pub fn expr(code: &str) -> Tree {
    let tree = parse_ok(&format!("<?php {code};"));
    tree.descendants()
        .find(|t| t.is(Kind::ExpressionStatement))
        .and_then(|s| s.child(0))
        .cloned()
        .unwrap_or_else(|| panic!("no expression statement in {code}"))
}

/// `literal` read as a pattern, placed at line 3, column 0.
pub fn try_regex_source(literal: &str) -> Result<RegexSource, RegexSourceError> {
    let tree = parse_ok(&format!("<?php\n\n{literal};"));
    let literal_tree = tree
        .descendants()
        .find(|t| t.is(Kind::ExpressionStatement))
        .and_then(|s| s.child(0))
        .unwrap_or_else(|| panic!("no expression statement for {literal}"));
    RegexSource::from_string_literal(literal_tree)
}

pub fn regex_source(literal: &str) -> RegexSource {
    try_regex_source(literal).unwrap_or_else(|e| panic!("{literal} is not a pattern: {e}"))
}

/// Findings of the duplicate check for `preg_match({literal}, $s)`.
pub fn duplicate_findings(literal: &str) -> Vec<Finding> {
    let tree = parse_ok(&format!("<?php preg_match({literal}, $s);"));
    duplicates_in_character_class(&tree)
}
