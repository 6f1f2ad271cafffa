//! Feature extraction for URL classification.
//!
//! Pure, stateless functions over the raw URL string ([`lexical`]) and over
//! its parsed components ([`structural`]). Every extractor is total: empty
//! or unparseable input yields zeros, never a panic.

pub mod lexical;
pub mod structural;

use serde::{Deserialize, Serialize};

pub use lexical::{
    consonants_pct, count_digits, count_dots, count_punctuation, count_slash, extract_doc,
    url_length, vowels_pct,
};
pub use structural::{
    contains_port, contains_username, hostname_length, is_ip, path_length, query_length,
};

use crate::url_parts::{self, UrlParts};

/// Number of unscaled scalar features placed after the text row.
pub const SCALAR_BLOCK_WIDTH: usize = 5;

/// Number of count features passed through the scaler.
pub const NUMERIC_BLOCK_WIDTH: usize = 8;

/// All scalar features for a single URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlFeatures {
    pub vowels_pct: f64,
    pub consonants_pct: f64,
    pub is_ip: bool,
    pub has_port: bool,
    pub has_username: bool,
    pub url_length: usize,
    pub dot_count: usize,
    pub slash_count: usize,
    pub digit_count: usize,
    pub punctuation_count: usize,
    pub hostname_length: usize,
    pub path_length: usize,
    pub query_length: usize,
}

impl UrlFeatures {
    /// Parses `url` and extracts every scalar feature.
    pub fn extract(url: &str) -> Self {
        let parts = url_parts::parse(url);
        Self::from_parts(url, parts.as_ref())
    }

    /// Extracts features from a URL that has already been parsed.
    pub fn from_parts(url: &str, parts: Option<&UrlParts>) -> Self {
        Self {
            vowels_pct: vowels_pct(url),
            consonants_pct: consonants_pct(url),
            is_ip: is_ip(parts),
            has_port: contains_port(parts),
            has_username: contains_username(parts),
            url_length: url_length(url),
            dot_count: count_dots(url),
            slash_count: count_slash(url),
            digit_count: count_digits(url),
            punctuation_count: count_punctuation(url),
            hostname_length: hostname_length(parts),
            path_length: path_length(parts),
            query_length: query_length(parts),
        }
    }

    /// The unscaled scalar block: percentages followed by 0/1 flags.
    pub fn scalar_block(&self) -> [f64; SCALAR_BLOCK_WIDTH] {
        [
            self.vowels_pct,
            self.consonants_pct,
            flag(self.is_ip),
            flag(self.has_port),
            flag(self.has_username),
        ]
    }

    /// The raw count block, in the order the scaler was fit on.
    pub fn numeric_block(&self) -> [f64; NUMERIC_BLOCK_WIDTH] {
        [
            self.url_length as f64,
            self.dot_count as f64,
            self.slash_count as f64,
            self.digit_count as f64,
            self.punctuation_count as f64,
            self.hostname_length as f64,
            self.path_length as f64,
            self.query_length as f64,
        ]
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// The raw count block for `url`, ready for the scaler.
pub fn numeric_block(url: &str, parts: Option<&UrlParts>) -> [f64; NUMERIC_BLOCK_WIDTH] {
    UrlFeatures::from_parts(url, parts).numeric_block()
}
