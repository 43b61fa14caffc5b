//! Regex patterns passed to the `preg_*` functions.

use tracing::{debug, trace, trace_span};

use super::parser::RegexParseResult;
use super::source::RegexSource;
use crate::argument::ArgumentMatcher;
use crate::ast::FunctionCall;
use crate::tree::{Tree, skip_parentheses};

/// Functions whose first parameter, `$pattern`, is a regex.
pub const REGEX_FUNCTIONS: [&str; 7] = [
    "preg_match",
    "preg_match_all",
    "preg_replace",
    "preg_replace_callback",
    "preg_split",
    "preg_grep",
    "preg_filter",
];

/// Whether `name` is one of [`REGEX_FUNCTIONS`], ignoring case.
#[must_use]
pub fn is_regex_function(name: &str) -> bool {
    REGEX_FUNCTIONS
        .iter()
        .any(|function| function.eq_ignore_ascii_case(name))
}

/// Matcher for the `$pattern` parameter.
#[must_use]
pub fn pattern_argument() -> ArgumentMatcher {
    ArgumentMatcher::new(0, Some("pattern"))
}

/// `expr`, unwrapped from parentheses, if it is a string literal that
/// reads as a delimited pattern.
#[must_use]
pub fn regex_literal(expr: &Tree) -> Option<&Tree> {
    let literal = skip_parentheses(expr);
    RegexSource::from_string_literal(literal)
        .is_ok()
        .then_some(literal)
}

/// An analysis run on every well-formed pattern of a file.
pub trait RegexAnalyzer {
    fn analyze(&mut self, source: &RegexSource, result: &RegexParseResult, call: FunctionCall<'_>);
}

/// Parse the pattern literal of every regex function call in `tree` and
/// hand the ones without syntax errors to `analyzer`.
///
/// Returns the number of patterns analysed.
pub fn analyze_regexes(tree: &Tree, analyzer: &mut impl RegexAnalyzer) -> usize {
    let matcher = pattern_argument();
    let mut analysed = 0;
    for call in tree.descendants().filter_map(FunctionCall::cast) {
        let Some(name) = call.function_name().filter(|name| is_regex_function(name)) else {
            continue;
        };
        let Some(pattern) = matcher.matched_value(call).map(skip_parentheses) else {
            trace!(function = name, "no pattern argument");
            continue;
        };
        let source = match RegexSource::from_string_literal(pattern) {
            Ok(source) => source,
            Err(err) => {
                debug!(function = name, %err, "pattern skipped");
                continue;
            }
        };
        let _span = trace_span!("regex", function = name, pattern = source.text()).entered();
        let result = source.parse();
        if result.has_errors() {
            debug!(errors = result.errors.len(), "pattern has syntax errors");
            continue;
        }
        analyzer.analyze(&source, &result, call);
        analysed += 1;
    }
    analysed
}
