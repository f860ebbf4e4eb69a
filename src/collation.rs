//! Locale-aware string comparison for sorting titles
//!
//! Follows the usual multi-level collation: base letters first, then accents,
//! then case. Good enough for Latin-script titles without pulling in full
//! locale tables.

use std::cmp::Ordering;

use unicode_general_category::GeneralCategory;
use unicode_general_category::get_general_category;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compare two strings the way people expect them sorted
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    primary(a)
        .cmp(primary(b))
        .then_with(|| secondary(a).cmp(secondary(b)))
        .then_with(|| tertiary(a).cmp(tertiary(b)))
        .then_with(|| a.cmp(b))
}

/// Base characters: no accents, no case, grouped by character class
fn primary(value: &str) -> impl Iterator<Item = (u8, char)> + '_ {
    value
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .map(|ch| (class(ch), ch))
}

/// Accents count, case does not
fn secondary(value: &str) -> impl Iterator<Item = char> + '_ {
    value.nfd().flat_map(char::to_lowercase)
}

/// Lowercase sorts before uppercase
fn tertiary(value: &str) -> impl Iterator<Item = bool> + '_ {
    value
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .map(char::is_uppercase)
}

/// Whitespace, punctuation, symbols, digits, letters
fn class(ch: char) -> u8 {
    if ch.is_whitespace() {
        return 0;
    }

    match get_general_category(ch) {
        GeneralCategory::ConnectorPunctuation
        | GeneralCategory::DashPunctuation
        | GeneralCategory::OpenPunctuation
        | GeneralCategory::ClosePunctuation
        | GeneralCategory::InitialPunctuation
        | GeneralCategory::FinalPunctuation
        | GeneralCategory::OtherPunctuation => 1,
        GeneralCategory::DecimalNumber
        | GeneralCategory::LetterNumber
        | GeneralCategory::OtherNumber => 3,
        _ if ch.is_alphabetic() => 4,
        _ => 2,
    }
}
