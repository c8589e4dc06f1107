//! Cached regex patterns for EXTH decoding.
//!
//! Uses LazyLock to compile patterns once on first use.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Matches an author already in sort form: `Last, First`.
///
/// Exactly one comma, followed by whitespace. Group 1 is the surname, group 2
/// the given names.
pub static AUTHOR_SORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^,]+?)\s*,\s+([^,]+?)\s*$").expect("author sort pattern is valid")
});
