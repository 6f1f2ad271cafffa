//! Lenient structural URL parser.
//!
//! Splits a URL into schema, credentials, host, port, path and query with a
//! single anchored pattern. This is not a standards-compliant URL parser: it
//! accepts almost anything and only exists to feed the feature extractors.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Composite pattern; every group is lazy so later groups claim as much as
/// they can.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^",
        r"((?P<schema>.+?)://)?",
        r"((?P<user>.+?)(:(?P<password>.*?))?@)?",
        r"(?P<host>.*?)",
        r"(:(?P<port>\d+?))?",
        r"(?P<path>/.*?)?",
        r"(?P<query>[?].*?)?",
        r"\n?$",
    ))
    .expect("Invalid URL pattern")
});

/// Structural components of a URL.
///
/// Components that did not participate in the match, or matched the empty
/// string, are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlParts {
    pub schema: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub path: Option<String>,
    pub query: Option<String>,
}

impl UrlParts {
    fn from_captures(caps: &Captures<'_>) -> Self {
        Self {
            schema: group(caps, "schema"),
            user: group(caps, "user"),
            password: group(caps, "password"),
            host: group(caps, "host"),
            port: group(caps, "port"),
            path: group(caps, "path"),
            query: group(caps, "query"),
        }
    }

    /// Returns true if no component was captured.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn group(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parses a URL into its structural components.
///
/// A single trailing newline is ignored. Returns `None` when the string does
/// not match at all (for example when it contains an interior line break).
/// Never panics on arbitrary input.
pub fn parse(url: &str) -> Option<UrlParts> {
    URL_PATTERN
        .captures(url)
        .map(|caps| UrlParts::from_captures(&caps))
}
