//! Structural features computed on parsed URL components.
//!
//! Every function takes `Option<&UrlParts>`; an unparsed URL yields
//! `false` / `0`.

use crate::url_parts::UrlParts;

fn char_len(s: Option<&str>) -> usize {
    s.map_or(0, |s| s.chars().count())
}

/// True if the host is a dotted number such as `192.168.0.1`.
///
/// Dots and slashes are stripped; the rest must be non-empty and numeric.
pub fn is_ip(parts: Option<&UrlParts>) -> bool {
    let Some(host) = parts.and_then(|p| p.host.as_deref()) else {
        return false;
    };
    let mut digits = host.chars().filter(|c| !matches!(c, '.' | '/')).peekable();
    digits.peek().is_some() && digits.all(char::is_numeric)
}

pub fn contains_port(parts: Option<&UrlParts>) -> bool {
    parts
        .and_then(|p| p.port.as_deref())
        .is_some_and(|s| !s.is_empty())
}

pub fn contains_username(parts: Option<&UrlParts>) -> bool {
    parts
        .and_then(|p| p.user.as_deref())
        .is_some_and(|s| !s.is_empty())
}

pub fn hostname_length(parts: Option<&UrlParts>) -> usize {
    char_len(parts.and_then(|p| p.host.as_deref()))
}

pub fn path_length(parts: Option<&UrlParts>) -> usize {
    char_len(parts.and_then(|p| p.path.as_deref()))
}

pub fn query_length(parts: Option<&UrlParts>) -> usize {
    char_len(parts.and_then(|p| p.query.as_deref()))
}
