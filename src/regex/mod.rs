//! Regular expressions written as PHP string literals.
//!
//! [`RegexSource`] reads a literal such as `'/[a-z]+/i'` as a delimited
//! pattern, [`parse_regex`] turns the pattern into a [`RegexTree`], and
//! [`RegexVisitor`] walks it. Every tree node keeps the raw range of the
//! literal text it came from, so findings point into the PHP file.
//!
//! [`analyze_regexes`] runs a [`RegexAnalyzer`] over the pattern of every
//! `preg_*` call in a file; [`duplicates_in_character_class`] is the
//! analysis shipped with this crate.

pub mod ast;
pub mod calls;
pub mod chars;
pub mod class_set;
pub mod duplicates;
pub mod flags;
pub mod parser;
pub mod source;
pub mod visitor;

pub use ast::{CharacterClass, ClassElement, ClassUnion, RegexTree};
pub use calls::{REGEX_FUNCTIONS, RegexAnalyzer, analyze_regexes, is_regex_function, regex_literal};
pub use chars::{Quote, SourceChar};
pub use class_set::{ClassSet, ClassSetError};
pub use duplicates::{DuplicatesInCharacterClass, duplicates_in_character_class};
pub use flags::{FlagChange, FlagSet};
pub use parser::{RegexParseResult, RegexSyntaxError, parse_characters, parse_pattern, parse_regex};
pub use source::{RegexSource, RegexSourceError};
pub use visitor::RegexVisitor;
