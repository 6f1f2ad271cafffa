//! Lexical features computed on the raw URL string.

use once_cell::sync::Lazy;
use regex::Regex;

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// Runs of URL punctuation (ASCII punctuation except the backslash).
static PUNCTUATION_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x21-\x2F\x3A-\x40\x5B\x5D-\x60\x7B-\x7E]+").expect("Invalid punctuation pattern")
});

/// Unicode decimal digits.
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("Invalid digit pattern"));

/// Returns true for characters counted as punctuation.
///
/// This is the ASCII punctuation set without `\`, matching the character
/// class the trained artifacts were produced with.
pub fn is_url_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() && c != '\\'
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_lowercase() && !VOWELS.contains(&c)
}

/// Fraction of characters in the lowercased string matching `pred`.
/// Empty input yields 0.0.
fn char_fraction(s: &str, pred: impl Fn(char) -> bool) -> f64 {
    let lowered = s.to_lowercase();
    let total = lowered.chars().count();
    if total == 0 {
        return 0.0;
    }
    let hits = lowered.chars().filter(|&c| pred(c)).count();
    hits as f64 / total as f64
}

/// Fraction of vowels (`aeiou`, case-insensitive).
pub fn vowels_pct(s: &str) -> f64 {
    char_fraction(s, |c| VOWELS.contains(&c))
}

/// Fraction of ASCII consonants (case-insensitive).
pub fn consonants_pct(s: &str) -> f64 {
    char_fraction(s, is_consonant)
}

/// Length in characters.
pub fn url_length(s: &str) -> usize {
    s.chars().count()
}

pub fn count_dots(s: &str) -> usize {
    s.matches('.').count()
}

pub fn count_slash(s: &str) -> usize {
    s.matches('/').count()
}

/// Number of Unicode decimal digits.
pub fn count_digits(s: &str) -> usize {
    DIGIT.find_iter(s).count()
}

pub fn count_punctuation(s: &str) -> usize {
    s.chars().filter(|&c| is_url_punctuation(c)).count()
}

/// Builds the document handed to the text vectorizer: the URL split on
/// punctuation runs and re-joined with single spaces.
pub fn extract_doc(s: &str) -> String {
    PUNCTUATION_RUN.split(s).collect::<Vec<_>>().join(" ")
}
