//! IRC case-mapping functions.
//!
//! IRC uses a special case-insensitive comparison where some characters
//! are considered equivalent (e.g., `[` and `{`). This implements the
//! `rfc1459` case mapping which is the most common.
//!
//! [`IrcName`] wraps a nickname or channel name so it can be used as a map
//! key that compares with this mapping while still remembering the spelling
//! the server last used.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

#[inline]
fn fold(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        'A'..='Z' => c.to_ascii_lowercase(),
        _ => c,
    }
}

/// Convert a string to IRC lowercase using RFC 1459 case mapping.
///
/// In addition to ASCII lowercase conversion, this maps:
/// - `[` → `{`
/// - `]` → `}`
/// - `\` → `|`
/// - `~` → `^`
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(fold).collect()
}

/// Compare two strings using IRC case-insensitive comparison.
///
/// Uses the RFC 1459 case mapping where certain characters are equivalent.
pub fn irc_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.chars().zip(b.chars()).all(|(ca, cb)| fold(ca) == fold(cb))
}

/// A nickname or channel name compared with RFC 1459 case mapping.
#[derive(Clone, Debug, Default)]
pub struct IrcName(String);

impl IrcName {
    /// Wrap a name, keeping its original spelling.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as it was spelled when stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the original spelling.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl PartialEq for IrcName {
    fn eq(&self, other: &Self) -> bool {
        irc_eq(&self.0, &other.0)
    }
}

impl Eq for IrcName {}

impl PartialEq<str> for IrcName {
    fn eq(&self, other: &str) -> bool {
        irc_eq(&self.0, other)
    }
}

impl PartialEq<&str> for IrcName {
    fn eq(&self, other: &&str) -> bool {
        irc_eq(&self.0, other)
    }
}

impl Hash for IrcName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.0.chars() {
            state.write_u32(fold(c) as u32);
        }
        state.write_u8(0xff);
    }
}

impl Ord for IrcName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.chars().map(fold).cmp(other.0.chars().map(fold))
    }
}

impl PartialOrd for IrcName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for IrcName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IrcName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IrcName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for IrcName {
    fn from(s: String) -> Self {
        Self(s)
    }
}
