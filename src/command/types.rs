//! IRC command types.
//!
//! This module provides type-safe representations of the commands a client
//! session sends. Anything else can be sent through [`Command::Raw`].
//!
//! # Reference
//! - RFC 1459: Internet Relay Chat Protocol

use crate::mode::ModeChange;

/// CTCP VERSION answer sent in a NOTICE.
pub const VERSION_REPLY: &str = concat!(
    "\u{1}VERSION slirc-engine ",
    env!("CARGO_PKG_VERSION"),
    "\u{1}"
);

/// IRC command with its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    // === Connection Registration ===
    /// `PASS password`
    PASS(String),
    /// `NICK nickname`
    NICK(String),
    /// `USER ident host host :realname`
    ///
    /// Fields are ident, host and realname; the host is sent in both the
    /// hostname and servername positions.
    USER(String, String, String),
    /// `QUIT [:message]`
    QUIT(Option<String>),
    /// `PING token`
    PING(String),
    /// `PONG[ token]`, echoing the received token verbatim.
    PONG(String),

    // === Channel Operations ===
    /// `JOIN channel`
    JOIN(String),
    /// `PART channel`
    PART(String),
    /// `TOPIC channel [:topic]`
    TOPIC(String, Option<String>),
    /// `KICK channel nickname [:comment]`
    KICK(String, String, Option<String>),
    /// `MODE channel ±mode [param]`
    MODE(String, ModeChange),

    // === Messaging ===
    /// `PRIVMSG target :text`
    PRIVMSG(String, String),
    /// `NOTICE target :text`
    NOTICE(String, String),

    // === User Queries ===
    /// `WHOIS nickname`
    WHOIS(String),
    /// `WHOWAS nickname`
    WHOWAS(String),

    /// A line sent exactly as given.
    Raw(String),
}

impl Command {
    /// The command word, for logging.
    pub fn verb(&self) -> &str {
        match self {
            Command::PASS(_) => "PASS",
            Command::NICK(_) => "NICK",
            Command::USER(..) => "USER",
            Command::QUIT(_) => "QUIT",
            Command::PING(_) => "PING",
            Command::PONG(_) => "PONG",
            Command::JOIN(_) => "JOIN",
            Command::PART(_) => "PART",
            Command::TOPIC(..) => "TOPIC",
            Command::KICK(..) => "KICK",
            Command::MODE(..) => "MODE",
            Command::PRIVMSG(..) => "PRIVMSG",
            Command::NOTICE(..) => "NOTICE",
            Command::WHOIS(_) => "WHOIS",
            Command::WHOWAS(_) => "WHOWAS",
            Command::Raw(line) => line.split(' ').next().unwrap_or(""),
        }
    }
}
