//! Path pattern compilation and matching.
//!
//! A pattern containing `*` or `?` is a shell glob matched against the whole
//! path. Anything else is an unanchored regular expression, falling back to a
//! plain substring test when it does not compile.

use regex::Regex;
use tracing::debug;

/// Compiled path pattern. The matching mode is decided once, at compile time.
#[derive(Debug, Clone)]
pub enum PathMatcher {
    Glob(Regex),
    Regex(Regex),
    Literal(String),
}

impl PathMatcher {
    /// Compile a user supplied pattern. Never fails.
    pub fn compile(pattern: &str) -> Self {
        if pattern.contains(['*', '?']) {
            if let Ok(regex) = Regex::new(&glob_to_regex(pattern)) {
                return PathMatcher::Glob(regex);
            }
            debug!("glob {:?} did not translate, matching literally", pattern);
            return PathMatcher::Literal(pattern.to_string());
        }

        match Regex::new(pattern) {
            Ok(regex) => PathMatcher::Regex(regex),
            Err(e) => {
                debug!("path pattern {:?} is not a regex ({}), matching literally", pattern, e);
                PathMatcher::Literal(pattern.to_string())
            }
        }
    }

    /// Match against the path component of a request URI.
    pub fn matches_uri(&self, uri: &str) -> bool {
        self.matches_path(uri_path(uri))
    }

    pub fn matches_path(&self, path: &str) -> bool {
        match self {
            PathMatcher::Glob(regex) | PathMatcher::Regex(regex) => regex.is_match(path),
            PathMatcher::Literal(literal) => path.contains(literal.as_str()),
        }
    }
}

/// Path component of a URI: no scheme, authority, query or fragment.
pub fn uri_path(uri: &str) -> &str {
    let rest = match uri.find("://") {
        Some(idx) => {
            let after_scheme = &uri[idx + 3..];
            match after_scheme.find(['/', '?', '#']) {
                Some(slash) => &after_scheme[slash..],
                None => "",
            }
        }
        None => uri,
    };

    match rest.find(['?', '#']) {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Translate shell-glob syntax into an anchored regex.
///
/// `*` matches any run of characters (including `/`), `?` one character,
/// `[...]` a class with `!` for negation. An unterminated `[` is literal.
fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() * 2 + 8);
    out.push_str("(?s)^");

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push('[');
                    let mut j = i + 1;
                    if chars[j] == '!' {
                        out.push('^');
                        j += 1;
                    } else if chars[j] == '^' {
                        out.push_str("\\^");
                        j += 1;
                    }
                    for &c in &chars[j..end] {
                        match c {
                            '\\' | '[' | ']' | '&' | '~' => {
                                out.push('\\');
                                out.push(c);
                            }
                            _ => out.push(c),
                        }
                    }
                    out.push(']');
                    i = end;
                }
                None => out.push_str("\\["),
            },
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Index of the `]` closing a class opened at `start`, if any.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    // A leading `]` is part of the class.
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() {
        if chars[j] == ']' {
            return Some(j);
        }
        j += 1;
    }
    None
}
