//! # slirc-engine
//!
//! A client-side IRC protocol engine: one live session per server, with
//! registration, nickname fallback, channel rosters, mode tracking and
//! automatic reconnection.
//!
//! ## Features
//!
//! - Line classification for PING, numeric replies and user actions
//! - Channel rosters with privilege sigils, kept current from NAMES, JOIN,
//!   PART, KICK, QUIT, NICK and MODE
//! - Ban-by-nickname with deferred hostname lookup through WHOIS
//! - Typed errors for the 401-436 numeric replies
//! - Per-server settings loaded from TOML
//! - Optional Tokio runtime: connections with heartbeat, auto-reconnect and
//!   TLS, plus a registry that routes `irc://` URLs to them
//!
//! The protocol logic lives in [`session::Session`], which performs no I/O.
//! With the `tokio` feature, [`Connection`] drives a session over a socket.

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use slirc_engine::{ConnectionIdentity, EventListener, Registry, Settings};
//!
//! struct Printer;
//!
//! impl EventListener for Printer {
//!     fn on_privmsg(&self, _: &ConnectionIdentity, from: &slirc_engine::Actor, target: &str, text: &str) {
//!         println!("{} -> {}: {}", from.nickname, target, text);
//!     }
//! }
//!
//! # async fn run() -> slirc_engine::Result<()> {
//! let registry = Registry::new(Settings::default());
//! registry.add_listener(Arc::new(Printer));
//! registry.join("irc://irc.libera.chat/rust")?;
//! # Ok(())
//! # }
//! ```

pub mod casemap;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod line;
pub mod message;
pub mod mode;
pub mod prefix;
pub mod response;
pub mod roster;
pub mod session;

#[cfg(feature = "tokio")]
pub mod connection;
#[cfg(feature = "tokio")]
pub mod registry;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::casemap::{irc_eq, irc_to_lower, IrcName};
pub use self::command::Command;
pub use self::config::{ConnectParameters, ConnectionIdentity, Settings, UserIdentity};
pub use self::error::{EngineError, LineError, ModeParseError, Result};
pub use self::event::{EventListener, ListenerSet};
pub use self::line::{LineCodec, LineFramer, MAX_LINE_LEN};
pub use self::message::Line;
pub use self::mode::{ModeChange, ModeChangeSet};
pub use self::prefix::Actor;
pub use self::response::{NumericError, Response};
pub use self::roster::{Member, Sigil};
pub use self::session::{ConnectionState, Session};

#[cfg(feature = "tokio")]
pub use self::connection::Connection;
#[cfg(feature = "tokio")]
pub use self::registry::Registry;
#[cfg(feature = "tokio")]
pub use self::transport::{Connector, TcpConnector};
