//! Glob and regular-expression filter patterns.
//!
//! A glob always has a regex equivalent ([`glob_to_regex`] is total). The
//! reverse ([`regex_to_glob`]) only succeeds for regexes built from literals,
//! `.`, `.*`, `.?`, `\.` and `|`; anything else yields `None` rather than an
//! approximation.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::core::{FileListingError, Result};

/// Flags applied when a pattern does not carry its own.
pub const DEFAULT_FLAGS: &str = "i";

/// Pattern matching every name.
pub const MATCH_ALL: &str = "^.*$";

const KNOWN_FLAGS: &str = "dgimsuvy";

// Characters a glob keeps literal by escaping them in the regex.
const GLOB_ESCAPED: &str = "\\.+^$()[]{}|";

/// A compiled filter pattern with its source text and flags.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    flags: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` with `/.../flags`-style flag letters.
    ///
    /// `i`, `m` and `s` change matching; `d`, `g`, `u`, `v` and `y` are
    /// accepted and kept for display only.
    pub fn new(source: &str, flags: &str) -> Result<Self> {
        let mut seen = String::new();
        for flag in flags.chars() {
            if !KNOWN_FLAGS.contains(flag) {
                return Err(FileListingError::pattern(
                    source,
                    format!("unknown flag '{flag}'"),
                ));
            }
            if seen.contains(flag) {
                return Err(FileListingError::pattern(
                    source,
                    format!("duplicate flag '{flag}'"),
                ));
            }
            seen.push(flag);
        }
        let regex = RegexBuilder::new(source)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .build()
            .map_err(|e| FileListingError::pattern(source, e.to_string()))?;
        Ok(Self {
            source: source.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    /// Compile a glob such as `*.txt, *.md`.
    pub fn from_glob(glob: &str, flags: &str) -> Result<Self> {
        Self::new(&glob_to_regex(glob), flags)
    }

    /// Pattern matching every name, case-insensitively.
    pub fn match_all() -> Self {
        Self {
            source: MATCH_ALL.to_string(),
            flags: DEFAULT_FLAGS.to_string(),
            regex: match_all_regex(),
        }
    }

    /// Regex source without the `/.../` wrapper.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Flag letters.
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Whether the pattern ignores case.
    pub fn is_case_insensitive(&self) -> bool {
        self.flags.contains('i')
    }

    /// Unanchored search of `name`; anchoring is up to the pattern.
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Equivalent glob, when one exists.
    pub fn to_glob(&self) -> Option<String> {
        regex_body_to_glob(&self.source)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

fn match_all_regex() -> Regex {
    // Literal source; building cannot fail.
    RegexBuilder::new(MATCH_ALL)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|_| unreachable!("match-all pattern is valid"))
}

/// Translate a glob into an anchored regex source.
///
/// `*` becomes `.*`, `?` becomes `.`, commas separate alternatives (spaces
/// around each alternative are dropped) and every other regex metacharacter
/// is escaped.
pub fn glob_to_regex(glob: &str) -> String {
    let mut body = String::with_capacity(glob.len() * 2);
    for (i, alternative) in glob.trim().split(',').enumerate() {
        if i > 0 {
            body.push('|');
        }
        for ch in alternative.trim().chars() {
            match ch {
                '*' => body.push_str(".*"),
                '?' => body.push('.'),
                _ if GLOB_ESCAPED.contains(ch) => {
                    body.push('\\');
                    body.push(ch);
                }
                _ => body.push(ch),
            }
        }
    }
    format!("^(?:{body})$")
}

/// Translate a regex (optionally `/wrapped/flags`) back into a glob.
///
/// Returns the glob, or `None` when the regex uses constructs with no glob
/// equivalent, together with the flags: the wrapper's when present, else
/// `default_flags`.
pub fn regex_to_glob(input: &str, default_flags: &str) -> (Option<String>, String) {
    let (body, flags) = match split_wrapper(input.trim()) {
        Some((body, flags)) => (body, flags.to_string()),
        None => (input.trim(), default_flags.to_string()),
    };
    (regex_body_to_glob(body), flags)
}

/// Parse user input into a [`Pattern`].
///
/// Strings are trimmed; a `/pattern/flags` wrapper supplies its own flags,
/// otherwise `default_flags` apply. Compiled patterns pass through unchanged.
pub fn parse_pattern(input: impl IntoPattern, default_flags: &str) -> Result<Pattern> {
    input.into_pattern(default_flags)
}

/// Inputs accepted by [`parse_pattern`].
pub trait IntoPattern {
    /// Convert into a compiled pattern.
    fn into_pattern(self, default_flags: &str) -> Result<Pattern>;
}

impl IntoPattern for Pattern {
    fn into_pattern(self, _default_flags: &str) -> Result<Pattern> {
        Ok(self)
    }
}

impl IntoPattern for &str {
    fn into_pattern(self, default_flags: &str) -> Result<Pattern> {
        let input = self.trim();
        match split_wrapper(input) {
            Some((body, flags)) => Pattern::new(body, flags),
            None => Pattern::new(input, default_flags),
        }
    }
}

impl IntoPattern for &String {
    fn into_pattern(self, default_flags: &str) -> Result<Pattern> {
        self.as_str().into_pattern(default_flags)
    }
}

impl IntoPattern for String {
    fn into_pattern(self, default_flags: &str) -> Result<Pattern> {
        self.as_str().into_pattern(default_flags)
    }
}

/// Split `/body/flags` into its parts.
fn split_wrapper(input: &str) -> Option<(&str, &str)> {
    let rest = input.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (body, flags) = (&rest[..close], &rest[close + 1..]);
    flags
        .chars()
        .all(|c| KNOWN_FLAGS.contains(c))
        .then_some((body, flags))
}

fn regex_body_to_glob(body: &str) -> Option<String> {
    let mut body = body.strip_prefix('^').unwrap_or(body);
    if body.ends_with('$') && !ends_with_escape(&body[..body.len() - 1]) {
        body = &body[..body.len() - 1];
    }
    if let Some(inner) = body.strip_prefix("(?:")
        && group_spans_all(body)
    {
        body = &inner[..inner.len() - 1];
    }

    let mut glob = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(escaped) if GLOB_ESCAPED.contains(escaped) => glob.push(escaped),
                _ => return None,
            },
            '.' => match chars.peek() {
                Some('*') | Some('?') => {
                    chars.next();
                    glob.push('*');
                }
                _ => glob.push('?'),
            },
            '|' => glob.push_str(", "),
            '*' | '+' | '?' | '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | ',' => {
                return None;
            }
            _ => glob.push(ch),
        }
    }
    Some(glob)
}

/// Whether the trailing char of `s` is an unescaped backslash.
fn ends_with_escape(s: &str) -> bool {
    s.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Whether the group opening at byte 0 closes at the last byte.
fn group_spans_all(body: &str) -> bool {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, ch) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == body.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}
