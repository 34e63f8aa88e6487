//! The `nick!user@host` source of a relayed command.

use std::fmt;

/// Who performed an action.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Actor {
    pub nickname: String,
    pub username: String,
    pub hostname: String,
}

impl Actor {
    pub fn new(
        nickname: impl Into<String>,
        username: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            username: username.into(),
            hostname: hostname.into(),
        }
    }

    /// Parse `nick!user@host`, with or without a leading `:`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.strip_prefix(':').unwrap_or(s);
        let (nickname, rest) = s.split_once('!')?;
        let (username, hostname) = rest.split_once('@')?;
        if nickname.is_empty() || username.is_empty() || hostname.is_empty() {
            return None;
        }
        Some(Self::new(nickname, username, hostname))
    }

    /// Ban mask matching any user from this host.
    pub fn host_mask(&self) -> String {
        host_mask(&self.hostname)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}@{}", self.nickname, self.username, self.hostname)
    }
}

/// `*!*@host`
pub fn host_mask(hostname: &str) -> String {
    format!("*!*@{}", hostname)
}

/// True if `target` already looks like a ban mask rather than a nickname.
#[inline]
pub fn is_mask(target: &str) -> bool {
    target.contains(['!', '@'])
}

/// The nickname part of `nick!user@host`; the whole input otherwise.
pub fn nickname_of(source: &str) -> &str {
    let source = source.strip_prefix(':').unwrap_or(source);
    source.split_once('!').map_or(source, |(nick, _)| nick)
}
