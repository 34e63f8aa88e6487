//! Server identity and per-connection parameters.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use encoding::Encoding;
use url::Url;

use super::ChannelSettings;
use crate::error::{EngineError, Result};

/// Port used for plain-text connections when none is given.
pub const DEFAULT_PORT: u16 = 6667;
/// Port used for TLS connections when none is given.
pub const DEFAULT_TLS_PORT: u16 = 9998;
/// How often the heartbeat checks on a connection.
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(16);

/// Which server a connection talks to.
///
/// Two identities are equal when they name the same host
/// (case-insensitively), the same effective port and the same TLS flag.
#[derive(Clone, Debug)]
pub struct ConnectionIdentity {
    pub hostname: String,
    pub port: Option<u16>,
    pub tls: bool,
}

impl ConnectionIdentity {
    pub fn new(hostname: impl Into<String>, port: Option<u16>, tls: bool) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            tls,
        }
    }

    /// The port to dial, filling in the default for the TLS flag.
    pub fn effective_port(&self) -> u16 {
        self.port
            .unwrap_or(if self.tls { DEFAULT_TLS_PORT } else { DEFAULT_PORT })
    }

    /// Parse an `irc://` or `ircs://` URL.
    ///
    /// Returns the identity and, when the URL has a path or fragment, the
    /// channel it names with a `#` prefix.
    pub fn parse_url(input: &str) -> Result<(Self, Option<String>)> {
        let invalid = |reason: &str| EngineError::InvalidUrl {
            url: input.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(input).map_err(|e| invalid(&e.to_string()))?;
        let tls = match url.scheme() {
            "irc" => false,
            "ircs" => true,
            _ => return Err(invalid("scheme must be irc or ircs")),
        };
        let hostname = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host"))?;

        let identity = Self::new(hostname, url.port(), tls);
        Ok((identity, channel_of(&url)))
    }

    /// `irc[s]://host:port`
    pub fn to_url(&self) -> String {
        let scheme = if self.tls { "ircs" } else { "irc" };
        match self.port {
            Some(port) => format!("{}://{}:{}", scheme, self.hostname, port),
            None => format!("{}://{}", scheme, self.hostname),
        }
    }
}

fn channel_of(url: &Url) -> Option<String> {
    let path = url.path().trim_start_matches('/');
    let name = if path.is_empty() {
        url.fragment().unwrap_or("")
    } else {
        path
    };
    let name = name.trim_start_matches('#');
    (!name.is_empty()).then(|| format!("#{}", name))
}

impl PartialEq for ConnectionIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.hostname.eq_ignore_ascii_case(&other.hostname)
            && self.effective_port() == other.effective_port()
            && self.tls == other.tls
    }
}

impl Eq for ConnectionIdentity {}

impl Hash for ConnectionIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hostname.to_ascii_lowercase().hash(state);
        self.effective_port().hash(state);
        self.tls.hash(state);
    }
}

impl fmt::Display for ConnectionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

/// How we introduce ourselves during registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserIdentity {
    pub nickname: String,
    pub username: String,
    pub realname: String,
    pub userhost: String,
}

/// Everything a session needs to register and behave.
#[derive(Clone, Debug)]
pub struct ConnectParameters {
    pub identity: ConnectionIdentity,
    pub user: UserIdentity,
    pub password: Option<String>,
    pub encoding: &'static Encoding,
    pub channels: Vec<ChannelSettings>,
    pub auto_reconnect: bool,
    pub heartbeat: Duration,
}

impl ConnectParameters {
    /// Parameters with defaults for everything but the server and user.
    pub fn new(identity: ConnectionIdentity, user: UserIdentity) -> Self {
        Self {
            identity,
            user,
            password: None,
            encoding: encoding::UTF_8,
            channels: Vec::new(),
            auto_reconnect: true,
            heartbeat: DEFAULT_HEARTBEAT,
        }
    }

    /// Channels joined after registration.
    pub fn auto_join(&self) -> impl Iterator<Item = &str> {
        self.channels
            .iter()
            .filter(|c| c.auto_join)
            .map(|c| c.name.as_str())
    }

    /// Whether to rejoin `channel` after being kicked from it.
    pub fn auto_rejoin(&self, channel: &str) -> bool {
        self.channels
            .iter()
            .find(|c| crate::casemap::irc_eq(&c.name, channel))
            .map_or(true, |c| c.auto_rejoin)
    }
}
