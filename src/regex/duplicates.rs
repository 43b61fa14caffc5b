//! Character classes that list the same character more than once.
//!
//! `[0-99]`, `(?i)[xX]` and `[\w\d]` each match no more than a class
//! without the repeated member, which is usually a mistake.

use tracing::debug;

use super::ast::{ClassElement, ClassUnion};
use super::calls::{RegexAnalyzer, analyze_regexes};
use super::class_set::{ClassSet, ClassSetError};
use super::parser::RegexParseResult;
use super::source::RegexSource;
use super::visitor::{RegexVisitor, walk_class_union};
use crate::ast::FunctionCall;
use crate::issue::Finding;
use crate::tree::Tree;

pub const MESSAGE: &str = "Remove duplicates in this character class.";
pub const SECONDARY_MESSAGE: &str = "Additional duplicate";

/// Collects one finding per character class union with duplicates.
#[derive(Debug, Default)]
pub struct DuplicatesInCharacterClass {
    findings: Vec<Finding>,
}

impl DuplicatesInCharacterClass {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    #[must_use]
    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    /// Check one parsed pattern.
    pub fn check(&mut self, source: &RegexSource, result: &RegexParseResult) {
        let mut finder = DuplicateFinder {
            source,
            findings: &mut self.findings,
        };
        finder.visit_parse_result(result);
    }
}

impl RegexAnalyzer for DuplicatesInCharacterClass {
    fn analyze(&mut self, source: &RegexSource, result: &RegexParseResult, _call: FunctionCall<'_>) {
        self.check(source, result);
    }
}

/// Findings for every regex function call of a file.
///
/// ```
/// use php_frontend_rs::{parse_str, regex::duplicates_in_character_class};
///
/// let tree = parse_str("<?php preg_match('/[0-99]/', $s);").unwrap();
/// let findings = duplicates_in_character_class(&tree);
/// assert_eq!(findings.len(), 1);
/// assert_eq!(findings[0].message, "Remove duplicates in this character class.");
/// ```
#[must_use]
pub fn duplicates_in_character_class(tree: &Tree) -> Vec<Finding> {
    let mut check = DuplicatesInCharacterClass::new();
    analyze_regexes(tree, &mut check);
    check.into_findings()
}

struct DuplicateFinder<'s> {
    source: &'s RegexSource,
    findings: &'s mut Vec<Finding>,
}

impl DuplicateFinder<'_> {
    fn report(&mut self, duplicates: &[&ClassElement]) {
        let Some((first, rest)) = duplicates.split_first() else {
            return;
        };
        let primary = self.source.location_in_file_for(first.range());
        let finding = rest.iter().fold(Finding::new(primary, MESSAGE), |finding, duplicate| {
            finding.with_secondary(
                self.source.location_in_file_for(duplicate.range()),
                Some(SECONDARY_MESSAGE),
            )
        });
        self.findings.push(finding);
    }
}

impl RegexVisitor for DuplicateFinder<'_> {
    fn visit_class_union(&mut self, union: &ClassUnion) {
        let duplicates = match duplicates(union) {
            Ok(duplicates) => duplicates,
            Err(err) => {
                debug!(%err, "character class left unchecked");
                return;
            }
        };
        self.report(&duplicates);
        walk_class_union(self, union);
    }
}

/// Elements of `union` overlapping an earlier element, together with the
/// earlier elements they overlap, in order of discovery.
fn duplicates(union: &ClassUnion) -> Result<Vec<&ClassElement>, ClassSetError> {
    let mut seen = ClassSet::new();
    let mut duplicates: Vec<&ClassElement> = Vec::new();
    for element in &union.elements {
        let set = ClassSet::of_element(element, union.flags)?;
        let overlapping = seen.intersections(&set);
        if !overlapping.is_empty() {
            for duplicate in overlapping.into_iter().chain(std::iter::once(element)) {
                if !duplicates.iter().any(|d| std::ptr::eq(*d, duplicate)) {
                    duplicates.push(duplicate);
                }
            }
        }
        seen.add_set(&set);
    }
    Ok(duplicates)
}
