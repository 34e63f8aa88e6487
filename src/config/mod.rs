//! Connection settings.
//!
//! Settings are plain serde structs loaded from TOML. Every optional server
//! field falls back to the `[defaults]` table and then to a built-in value,
//! so an empty file is a valid configuration.
//!
//! ```toml
//! [defaults]
//! nickname = "ferris"
//!
//! [[server]]
//! url = "ircs://irc.example.net"
//! channels = [{ name = "#rust", auto_join = true }]
//! ```

mod identity;

use serde::{Deserialize, Serialize};

pub use self::identity::{
    ConnectParameters, ConnectionIdentity, UserIdentity, DEFAULT_HEARTBEAT, DEFAULT_PORT,
    DEFAULT_TLS_PORT,
};

use crate::error::{EngineError, Result};

const DEFAULT_NICKNAME: &str = "Guest";
const DEFAULT_USERNAME: &str = "slirc";
const DEFAULT_REALNAME: &str = "*";
const DEFAULT_USERHOST: &str = "*";

/// Root settings document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fallbacks for every server.
    pub defaults: ServerSettings,
    #[serde(rename = "server")]
    pub servers: Vec<ServerSettings>,
}

/// Per-server settings; unset fields inherit from [`Settings::defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub name: Option<String>,
    /// `irc://host[:port]`, `ircs://...`, or a bare hostname.
    pub url: Option<String>,
    pub nickname: Option<String>,
    pub username: Option<String>,
    pub realname: Option<String>,
    pub userhost: Option<String>,
    pub password: Option<String>,
    pub auto_connect: Option<bool>,
    pub auto_reconnect: Option<bool>,
    /// WHATWG encoding label, e.g. `utf-8` or `windows-1252`.
    pub encoding: Option<String>,
    /// Seconds between heartbeat checks.
    pub heartbeat_secs: Option<u64>,
    pub channels: Vec<ChannelSettings>,
}

/// Per-channel join policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSettings {
    pub name: String,
    #[serde(default)]
    pub auto_join: bool,
    #[serde(default = "default_true")]
    pub auto_rejoin: bool,
}

impl ChannelSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auto_join: true,
            auto_rejoin: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl ServerSettings {
    /// The server this entry points at, if it has a URL.
    pub fn identity(&self) -> Option<Result<ConnectionIdentity>> {
        let url = self.url.as_deref()?;
        let parsed = if url.contains("://") {
            ConnectionIdentity::parse_url(url)
        } else {
            ConnectionIdentity::parse_url(&format!("irc://{}", url))
        };
        Some(parsed.map(|(identity, _)| identity))
    }
}

impl Settings {
    /// Decode settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The server entry for `identity`, if one is configured.
    pub fn server_for(&self, identity: &ConnectionIdentity) -> Option<&ServerSettings> {
        self.servers
            .iter()
            .find(|s| matches!(s.identity(), Some(Ok(ref id)) if id == identity))
    }

    /// Identities of servers marked `auto_connect`.
    pub fn auto_connect(&self) -> Result<Vec<ConnectionIdentity>> {
        let default = self.defaults.auto_connect.unwrap_or(false);
        self.servers
            .iter()
            .filter(|s| s.auto_connect.unwrap_or(default))
            .filter_map(ServerSettings::identity)
            .collect()
    }

    /// Resolve the effective parameters for `identity`.
    pub fn connect_parameters(&self, identity: &ConnectionIdentity) -> Result<ConnectParameters> {
        let server = self.server_for(identity);
        let defaults = &self.defaults;

        let pick = |field: fn(&ServerSettings) -> &Option<String>, fallback: &str| {
            server
                .and_then(|s| field(s).clone())
                .or_else(|| field(defaults).clone())
                .unwrap_or_else(|| fallback.to_string())
        };

        let user = UserIdentity {
            nickname: pick(|s| &s.nickname, DEFAULT_NICKNAME),
            username: pick(|s| &s.username, DEFAULT_USERNAME),
            realname: pick(|s| &s.realname, DEFAULT_REALNAME),
            userhost: pick(|s| &s.userhost, DEFAULT_USERHOST),
        };

        let mut params = ConnectParameters::new(identity.clone(), user);
        params.password = server
            .and_then(|s| s.password.clone())
            .or_else(|| defaults.password.clone());
        params.auto_reconnect = server
            .and_then(|s| s.auto_reconnect)
            .or(defaults.auto_reconnect)
            .unwrap_or(true);
        if let Some(secs) = server
            .and_then(|s| s.heartbeat_secs)
            .or(defaults.heartbeat_secs)
        {
            params.heartbeat = std::time::Duration::from_secs(secs.max(1));
        }
        if let Some(label) = server
            .and_then(|s| s.encoding.as_deref())
            .or(defaults.encoding.as_deref())
        {
            params.encoding = encoding::Encoding::for_label(label.as_bytes())
                .ok_or_else(|| EngineError::UnknownEncoding(label.to_string()))?;
        }
        params.channels = match server {
            Some(s) if !s.channels.is_empty() => s.channels.clone(),
            _ => defaults.channels.clone(),
        };

        Ok(params)
    }
}
