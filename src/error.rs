//! Error types for the IRC engine.
//!
//! This module defines errors for the public API ([`EngineError`]),
//! per-line dispatch failures ([`LineError`]), and mode string parsing
//! ([`ModeParseError`]). Application-level numeric errors sent by the server
//! live in [`crate::response::NumericError`].

use thiserror::Error;

/// Convenience type alias for Results using [`EngineError`].
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Errors returned by the connection and registry APIs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// I/O error while talking to the server.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A connection URL could not be understood.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A URL was expected to name a channel but did not.
    #[error("expected a url with a channel: {0}")]
    MissingChannel(String),

    /// No session exists for the requested server.
    #[error("not connected to {0}")]
    NotConnected(String),

    /// A bare channel name was given but no connection is selected.
    #[error("no connection selected")]
    NoSelectedConnection,

    /// The connection was disposed and accepts no further commands.
    #[error("connection has been disposed")]
    Disposed,

    /// Settings could not be decoded.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The configured text encoding label is not known.
    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),
}

/// Errors raised while handling a single received line.
///
/// These never abort the read loop; they are reported to listeners
/// together with the raw line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LineError {
    /// A required parameter was absent.
    #[error("missing {0} parameter")]
    MissingParameter(&'static str),

    /// A MODE parameter string could not be parsed.
    #[error("invalid mode string: {string}")]
    InvalidModeString {
        /// The raw mode string.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: ModeParseError,
    },

    /// A line grew past the framing limit and was discarded.
    #[error("line exceeds {limit} bytes")]
    TooLong {
        /// The limit in bytes.
        limit: usize,
        /// The start of the discarded line.
        head: String,
    },
}

/// Errors encountered when parsing mode strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModeParseError {
    /// A mode that takes a parameter had no token left to consume.
    #[error("mode {sign}{mode} requires a parameter but none was provided")]
    MissingParameter {
        /// `+` or `-`.
        sign: char,
        /// The mode character.
        mode: char,
    },

    /// A known mode character appeared before any `+` or `-`.
    #[error("missing mode modifier before '{mode}'")]
    MissingModeModifier {
        /// The mode character.
        mode: char,
    },
}
