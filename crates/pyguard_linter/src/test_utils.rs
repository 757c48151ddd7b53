//! Test-only parsing helpers for rule unit tests, mirroring
//! `fortitude_linter::test::test_contents`'s role: give rule tests a
//! one-line way to get from source text to a parsed tree without
//! repeating `.unwrap()` at every call site.

use crate::parser::{self, ParsedModule, SyntaxError};

/// Parses `source`, panicking with the [`SyntaxError`] on failure. Used by
/// rule tests that expect clean input.
pub fn parse_ok(source: &str) -> ParsedModule {
    parser::parse(source).unwrap_or_else(|err| panic!("expected valid source, got {err:?}"))
}

/// Parses `source`, panicking if it unexpectedly parses. Used by parser and
/// fixer tests that exercise malformed input.
pub fn parse_err(source: &str) -> SyntaxError {
    match parser::parse(source) {
        Ok(parsed) => panic!("expected a syntax error, parsed: {:?}", parsed.module),
        Err(err) => err,
    }
}
