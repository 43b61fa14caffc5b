//! Duplicate members in character classes of `preg_*` patterns.
//!
//! Each case is the PHP pattern literal exactly as it would appear in a
//! source file; it is checked as the first argument of `preg_match`.

mod common;

use common::{duplicate_findings, parse_ok};
use php_frontend_rs::regex::duplicates::{MESSAGE, SECONDARY_MESSAGE};
use php_frontend_rs::regex::{DuplicatesInCharacterClass, analyze_regexes};

fn assert_reported(literal: &str) {
    let findings = duplicate_findings(literal);
    assert_eq!(findings.len(), 1, "expected one finding for {literal}: {findings:?}");
    assert_eq!(findings[0].message, MESSAGE);
}

fn assert_clean(literal: &str) {
    let findings = duplicate_findings(literal);
    assert!(findings.is_empty(), "unexpected finding for {literal}: {findings:?}");
}

// -----------------------------------------------------------
// Reported
// -----------------------------------------------------------

#[test]
fn overlapping_digit_ranges() {
    for literal in [
        r#""/[0-99]/""#,
        r#""/[90-9]/""#,
        r#""/[0-73-9]/""#,
        r#""/[0-93-57]/""#,
        r#""/[4-92-68]/""#,
        r#""/[0-33-9]/""#,
        r#""/[0-70-9]/""#,
        r#""/[3-90-7]/""#,
        r#""/[3-50-9]/""#,
    ] {
        assert_reported(literal);
    }
}

#[test]
fn repeated_characters() {
    for literal in [
        r#""/[xxx]/""#,
        r#""/[A-z_]/""#,
        r#""/[  ]/""#,
        r#""/(?i)[  ]/""#,
        r#""/(?iu)[  ]/""#,
        r#""/[\"\".]/""#,
        r#""/[\x{F600}-\x{F637}\x{F608}]/""#,
        r#""/[\Qxx\E]/""#,
    ] {
        assert_reported(literal);
    }
}

#[test]
fn case_insensitive_overlaps() {
    for literal in [
        r#""/(?i)[A-Za-z]/""#,
        r#""/(?i)[A-_d]/""#,
        r#""/(?iu)[Ä-Üä]/""#,
        r#""/(?iu)[a-Öö]/""#,
        r#""/(?i)[A-_D]/""#,
        r#""/(?iu)[A-_D]/""#,
        r#""/(?i)[xX]/""#,
        r#""/(?iu)[äÄ]/""#,
        r#""/(?iU)[äÄ]/""#,
        r#""/(?iu)[xX]/""#,
        r#""/[A-Za-z]/i""#,
    ] {
        assert_reported(literal);
    }
}

#[test]
fn nested_classes() {
    for literal in [
        r#""/[[a][a]]/""#,
        r#""/[[abc][b]]/""#,
        r#""/[[^a]b]/""#,
        r#""/[[^a]z]/""#,
        r#""/[a[^z]]/""#,
        r#""/[z[^a]]/""#,
    ] {
        assert_reported(literal);
    }
}

#[test]
fn escaped_classes() {
    for literal in [
        r#""/[\s\Sx]/""#,
        r#""/(?U)[\s\Sx]/""#,
        r#""/[\w\d]/""#,
        r#""/[\wa]/""#,
        r#""/[\d1]/""#,
        r#""/[\d1-3]/""#,
        r#""/(?U)[\wa]/""#,
        r#""/[0-9\d]/""#,
        r#""/[0-9\\d]/""#,
        r#""/[0-9\\\\\d]/""#,
    ] {
        assert_reported(literal);
    }
}

// -----------------------------------------------------------
// Not reported
// -----------------------------------------------------------

#[test]
fn distinct_members() {
    for literal in [
        r#""/a-z\d/""#,
        r#""/[0-9][0-9]?/""#,
        r#""/[xX]/""#,
        r#""/[ab-z]/""#,
        r#""/[[a][b]]/""#,
        r#""/[[^a]a]/""#,
        r#""/[\\\\abc]/""#,
        r#""/[0-9\\\d]/""#,
        r#""/[[:alnum:]alnum]/""#,
    ] {
        assert_clean(literal);
    }
}

#[test]
fn complementary_escapes() {
    for literal in [
        r#""/[\s\S]/""#,
        r#""/[[^\s\S]x]/""#,
        r#""/(?U)[\s\S]/""#,
        r#""/(?U)[\S\u0085\u2028\u2029]/""#,
        r#""/[\d\D]/""#,
        r#""/(?U)[\d\D]/""#,
        r#""/[\w\W]/""#,
        r#""/(?U)[\w\W]/""#,
        r#""/[\wä]/""#,
    ] {
        assert_clean(literal);
    }
}

#[test]
fn case_folding_needs_its_flags() {
    for literal in [
        r#""/(?i)[äÄ]/""#,
        r#""/(?i)[Ä-Üä]/""#,
        r#""/(?u)[äÄ]/""#,
        r#""/(?u)[xX]/""#,
        r#""/(?i)[a-Öö]/""#,
    ] {
        assert_clean(literal);
    }
}

#[test]
fn quoted_and_escaped_members() {
    for literal in [
        r#""/[0-9\Q.-_\E]/""#,
        r#""/[A-Z\Q-_.\E]/""#,
        r#""/[\x00\x01]]/""#,
        r#""/[\x00-\x01\x02-\x03]]/""#,
        r#"'/[ \s \' " \: \{ \} \[ \] , & \* \# \?]/x'"#,
    ] {
        assert_clean(literal);
    }
}

#[test]
fn broken_patterns_are_left_alone() {
    assert_clean(r#""/[z-a9-0]/""#);
    assert_clean(r#""/[aa/""#);
}

#[test]
fn members_outside_known_sets() {
    for literal in [
        r#""/(?U)[\wä]/""#,
        r#""/(?U)[[^\W]a]/""#,
        r#""/[[a-z&&b-e]c]/""#,
        r#""/(?i)[A-_d-{]/""#,
        r#""/(?i)[A-z_]/""#,
        r#""/[\p{Armenian}x]/""#,
    ] {
        assert_clean(literal);
    }
}

#[test]
fn astral_characters() {
    assert_clean("\"/[\u{1F602}\u{1F60A}]/\"");
    assert_clean(r#""/[^\ud800\udc00-\udbff\udfff]/""#);
}

// -----------------------------------------------------------
// Locations
// -----------------------------------------------------------

#[test]
fn primary_and_secondary_locations() {
    let findings = duplicate_findings(r#""/[0-93-57]/""#);
    let finding = &findings[0];
    // `<?php preg_match("/[` puts the first member at column 20.
    assert_eq!(finding.primary.start.column, 20);
    assert_eq!(finding.primary.end.column, 23);
    let secondaries: Vec<_> = finding
        .secondaries
        .iter()
        .map(|s| (s.location.start.column, s.location.end.column))
        .collect();
    assert_eq!(secondaries, vec![(23, 26), (26, 27)]);
    assert!(
        finding
            .secondaries
            .iter()
            .all(|s| s.message.as_deref() == Some(SECONDARY_MESSAGE))
    );
}

#[test]
fn locations_account_for_escapes() {
    let findings = duplicate_findings(r#""/[0-9\\\\\d]/""#);
    let finding = &findings[0];
    assert_eq!(
        (finding.primary.start.column, finding.primary.end.column),
        (20, 23)
    );
    // `\\\\` is one escaped backslash; `\d` follows it.
    assert_eq!(finding.secondaries.len(), 1);
    let secondary = &finding.secondaries[0].location;
    assert_eq!((secondary.start.column, secondary.end.column), (27, 29));
}

#[test]
fn findings_across_a_file() {
    let tree = parse_ok(
        "<?php\n\nfunction f($input)\n{\n    preg_match(\"/[xx]/\", $input);\n    preg_replace('/ok/', '', $input);\n    preg_split('/[0-99]/', $input);\n}\n",
    );
    let mut check = DuplicatesInCharacterClass::new();
    assert_eq!(analyze_regexes(&tree, &mut check), 3);
    let lines: Vec<_> = check
        .findings()
        .iter()
        .map(|f| f.primary.start.line)
        .collect();
    assert_eq!(lines, vec![5, 7]);
}
