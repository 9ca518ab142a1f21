// ABOUTME: Shared utility functions for setkit
// ABOUTME: Case-insensitive ordering used when listing settings

use std::cmp::Ordering;

/// Fold a character the way a case-insensitive comparison sees it:
/// upper-case first, then back to lower-case. Only one-to-one mappings
/// apply, so `ß` stays `ß` rather than becoming `ss`.
fn fold_char(c: char) -> char {
    let upper = single_char(c.to_uppercase()).unwrap_or(c);
    single_char(upper.to_lowercase()).unwrap_or(upper)
}

fn single_char(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Compare two strings character by character, ignoring case.
/// A string that is a prefix of the other sorts first.
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    compare_chars_ignore_case(a.chars(), b.chars())
}

/// Same as [`compare_ignore_case`] for text that is not materialized as a `str`
pub fn compare_chars_ignore_case(
    a: impl Iterator<Item = char>,
    b: impl Iterator<Item = char>,
) -> Ordering {
    a.map(fold_char).cmp(b.map(fold_char))
}
