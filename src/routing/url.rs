//! URL utilities for the router.
//!
//! # Responsibilities
//! - Normalize pathnames (collapse slashes, drop trailing slash)
//! - Turn a bracketed path pattern into an anchored matcher source
//! - Split a URL into pathname, search and hash
//! - Decode the query string into a key/value map
//!
//! # Design Decisions
//! - Pure functions, no state
//! - Missing search/hash parts are empty strings, never `None`
//! - Parameter values are restricted to ASCII word characters and `-`

use std::collections::HashMap;

use crate::routing::RouteError;

/// Capture group substituted for every `[name]` segment.
pub const PARAM_GROUP: &str = r"([A-Za-z0-9_\-]+)";

/// Collapse runs of `/` and strip a single trailing `/` from paths longer than two characters.
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !last_slash {
                out.push(c);
            }
            last_slash = true;
        } else {
            out.push(c);
            last_slash = false;
        }
    }

    if out.chars().count() > 2 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// A compiled-ready matcher: the regex source plus the parameter names in capture order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherSource {
    pub source: String,
    pub params: Vec<String>,
}

/// Build the anchored matcher source for a path pattern.
///
/// Each `[name]` becomes [`PARAM_GROUP`]; everything else is matched literally.
/// Unbalanced brackets, empty names and repeated names are rejected.
pub fn to_matcher(pattern: &str) -> Result<MatcherSource, RouteError> {
    let mut source = String::from("^");
    let mut params: Vec<String> = Vec::new();
    let mut rest = pattern;

    while let Some(open) = rest.find(['[', ']']) {
        if rest[open..].starts_with(']') {
            return Err(RouteError::UnexpectedBracket {
                pattern: pattern.to_string(),
            });
        }

        source.push_str(&regex::escape(&rest[..open]));
        let after = &rest[open + 1..];
        let close = after
            .find(['[', ']', '/'])
            .filter(|&i| after[i..].starts_with(']'))
            .ok_or_else(|| RouteError::UnclosedParameter {
                pattern: pattern.to_string(),
            })?;

        let name = &after[..close];
        if name.is_empty() {
            return Err(RouteError::EmptyParameter {
                pattern: pattern.to_string(),
            });
        }
        if params.iter().any(|p| p == name) {
            return Err(RouteError::DuplicateParameter {
                pattern: pattern.to_string(),
                name: name.to_string(),
            });
        }

        params.push(name.to_string());
        source.push_str(PARAM_GROUP);
        rest = &after[close + 1..];
    }

    source.push_str(&regex::escape(rest));
    source.push('$');
    Ok(MatcherSource { source, params })
}

/// Split a URL into `(pathname, search, hash)`.
///
/// The fragment is cut first, then the query is cut from what remains.
pub fn split(url: &str) -> (String, String, String) {
    let (rest, hash) = match url.find('#') {
        Some(i) => (&url[..i], &url[i..]),
        None => (url, ""),
    };
    let (pathname, search) = match rest.find('?') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    (pathname.to_string(), search.to_string(), hash.to_string())
}

/// Decode a search string (with or without its leading `?`). Later keys overwrite earlier ones.
pub fn queries(search: &str) -> HashMap<String, String> {
    let search = search.strip_prefix('?').unwrap_or(search);
    url::form_urlencoded::parse(search.as_bytes())
        .into_owned()
        .collect()
}
