//! Sans-IO client session.
//!
//! A [`Session`] holds everything about one server connection except the
//! socket: registration state, nicknames, the roster and the listener set.
//! Received lines go in through [`Session::handle_line`]; commands to send
//! accumulate in an outbox that the owner drains with
//! [`Session::take_outbox`] and writes to the wire.
//!
//! ```
//! use slirc_engine::config::{ConnectParameters, ConnectionIdentity, UserIdentity};
//! use slirc_engine::event::ListenerSet;
//! use slirc_engine::session::{ConnectionState, Session};
//!
//! let user = UserIdentity {
//!     nickname: "ferris".into(),
//!     username: "crab".into(),
//!     realname: "Ferris".into(),
//!     userhost: "*".into(),
//! };
//! let identity = ConnectionIdentity::new("irc.example.net", None, false);
//! let mut session = Session::new(ConnectParameters::new(identity, user), ListenerSet::new());
//!
//! session.begin_connect();
//! session.connected();
//! let lines: Vec<String> = session.take_outbox().iter().map(ToString::to_string).collect();
//! assert_eq!(lines, ["USER crab * * :Ferris", "NICK ferris"]);
//!
//! session.handle_line(":irc.example.net 001 ferris :Welcome");
//! assert_eq!(session.state(), ConnectionState::Registered);
//! ```

mod numeric;
mod verbs;

use std::io;

use tracing::{debug, trace, warn};

use crate::casemap::{irc_eq, IrcName};
use crate::command::Command;
use crate::config::{ConnectParameters, ConnectionIdentity};
use crate::error::LineError;
use crate::event::{EventListener, ListenerSet};
use crate::message::Line;
use crate::mode::{ModeChange, ModeChangeSet};
use crate::prefix::{host_mask, is_mask};
use crate::roster::{Member, Roster};

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No socket.
    #[default]
    Disconnected,
    /// Dialing the server.
    Connecting,
    /// Socket open, registration sent, waiting for 001.
    AwaitingWelcome,
    /// 001 received.
    Registered,
}

impl ConnectionState {
    /// True once the socket is open.
    #[inline]
    pub fn is_connected(self) -> bool {
        matches!(
            self,
            ConnectionState::AwaitingWelcome | ConnectionState::Registered
        )
    }
}

/// Protocol state for one server connection.
pub struct Session {
    params: ConnectParameters,
    listeners: ListenerSet,
    state: ConnectionState,
    target_nickname: String,
    last_tried_nickname: String,
    actual_nickname: Option<String>,
    server_ident: Option<String>,
    target_channels: Vec<IrcName>,
    roster: Roster,
    outbox: Vec<Command>,
}

impl Session {
    pub fn new(params: ConnectParameters, listeners: ListenerSet) -> Self {
        let target_nickname = params.user.nickname.clone();
        let target_channels = params.auto_join().map(IrcName::from).collect();
        Self {
            last_tried_nickname: target_nickname.clone(),
            target_nickname,
            target_channels,
            params,
            listeners,
            state: ConnectionState::Disconnected,
            actual_nickname: None,
            server_ident: None,
            roster: Roster::new(),
            outbox: Vec::new(),
        }
    }

    pub fn identity(&self) -> &ConnectionIdentity {
        &self.params.identity
    }

    pub fn params(&self) -> &ConnectParameters {
        &self.params
    }

    pub fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The nickname the server has confirmed, once known.
    pub fn actual_nickname(&self) -> Option<&str> {
        self.actual_nickname.as_deref()
    }

    /// The nickname we want.
    pub fn target_nickname(&self) -> &str {
        &self.target_nickname
    }

    /// The nickname most recently sent during registration.
    pub fn last_tried_nickname(&self) -> &str {
        &self.last_tried_nickname
    }

    /// Prefix of the first server line since connecting; used for PING.
    pub fn server_ident(&self) -> Option<&str> {
        self.server_ident.as_deref()
    }

    /// Channels joined on registration and kept across reconnects.
    pub fn target_channels(&self) -> impl Iterator<Item = &str> {
        self.target_channels.iter().map(IrcName::as_str)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Members of `channel` with their sigils.
    pub fn whos_in(&self, channel: &str) -> Vec<Member> {
        self.roster.whos_in(channel)
    }

    /// Commands queued since the last call.
    pub fn take_outbox(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    // === Lifecycle ===

    /// A new socket is being opened. Per-connection state is forgotten.
    pub fn begin_connect(&mut self) {
        debug!(server = %self.params.identity, "connecting");
        self.state = ConnectionState::Connecting;
        self.roster.clear_channels();
        self.actual_nickname = None;
        self.server_ident = None;
        self.outbox.clear();
    }

    /// The socket is open; queue registration.
    pub fn connected(&mut self) {
        debug!(server = %self.params.identity, nickname = %self.target_nickname, "registering");
        self.state = ConnectionState::AwaitingWelcome;
        self.last_tried_nickname = self.target_nickname.clone();

        if let Some(password) = self.params.password.clone() {
            self.send(Command::PASS(password));
        }
        let user = &self.params.user;
        let register = Command::USER(
            user.username.clone(),
            user.userhost.clone(),
            user.realname.clone(),
        );
        self.send(register);
        self.send(Command::NICK(self.last_tried_nickname.clone()));
    }

    /// The socket is gone.
    pub fn disconnected(&mut self) {
        if self.state != ConnectionState::Disconnected {
            debug!(server = %self.params.identity, "disconnected");
        }
        self.state = ConnectionState::Disconnected;
        self.outbox.clear();
    }

    /// Periodic keepalive.
    pub fn heartbeat(&mut self) {
        if !self.state.is_connected() {
            return;
        }
        if let Some(ident) = self.server_ident.clone() {
            self.send(Command::PING(ident));
        }
    }

    /// Say goodbye before the socket is closed.
    pub fn quit(&mut self, message: Option<&str>) {
        self.send(Command::QUIT(message.map(str::to_string)));
    }

    // === Commands ===

    /// Queue a command. Dropped while no socket is open.
    pub fn send(&mut self, command: Command) {
        if !self.state.is_connected() {
            trace!(command = command.verb(), state = ?self.state, "not connected, dropping command");
            return;
        }
        self.outbox.push(command);
    }

    /// Queue a raw protocol line.
    pub fn send_raw(&mut self, line: &str) {
        self.send(Command::Raw(line.to_string()));
    }

    pub fn privmsg(&mut self, target: &str, text: &str) {
        self.send(Command::PRIVMSG(target.to_string(), text.to_string()));
    }

    pub fn notice(&mut self, target: &str, text: &str) {
        self.send(Command::NOTICE(target.to_string(), text.to_string()));
    }

    /// Join now if registered; either way, join on every registration.
    pub fn join(&mut self, channel: &str) {
        if self.state == ConnectionState::Registered {
            self.send(Command::JOIN(channel.to_string()));
        }
        let name = IrcName::from(channel);
        if !self.target_channels.contains(&name) {
            self.target_channels.push(name);
        }
    }

    /// Leave now if registered and stop rejoining.
    pub fn part(&mut self, channel: &str) {
        if self.state == ConnectionState::Registered {
            self.send(Command::PART(channel.to_string()));
        }
        self.target_channels.retain(|c| c != &channel);
    }

    /// Request a new nickname; it becomes the one we reclaim.
    pub fn nick(&mut self, nickname: &str) {
        self.target_nickname = nickname.to_string();
        self.send(Command::NICK(nickname.to_string()));
    }

    /// Query the topic, or set it when `text` is given.
    pub fn topic(&mut self, channel: &str, text: Option<&str>) {
        self.send(Command::TOPIC(channel.to_string(), text.map(str::to_string)));
    }

    /// An empty message is the same as none.
    pub fn kick(&mut self, channel: &str, target: &str, message: Option<&str>) {
        self.send(kick_command(channel, target, message));
    }

    pub fn ban(&mut self, channel: &str, target: &str) {
        self.kick_ban(channel, target, None);
    }

    /// Ban `target` and kick them if `message` is given.
    ///
    /// A nickname is turned into `*!*@host`. When the host is not yet
    /// known a WHOIS is sent and the ban runs once the reply arrives.
    pub fn kick_ban(&mut self, channel: &str, target: &str, message: Option<&str>) {
        if is_mask(target) {
            self.send(Command::MODE(
                channel.to_string(),
                ModeChange::plus('b', Some(target)),
            ));
            return;
        }

        let channel = channel.to_string();
        let target = target.to_string();
        let message = message.filter(|m| !m.is_empty()).map(str::to_string);
        self.with_host(&target.clone(), move |host| {
            let mut commands = vec![Command::MODE(
                channel.clone(),
                ModeChange::plus('b', Some(&host_mask(host))),
            )];
            if let Some(message) = message {
                commands.push(Command::KICK(channel, target, Some(message)));
            }
            commands
        });
    }

    /// Lift a ban, resolving a nickname to `*!*@host` like [`Session::kick_ban`].
    pub fn unban(&mut self, channel: &str, target: &str) {
        if is_mask(target) {
            self.send(Command::MODE(
                channel.to_string(),
                ModeChange::minus('b', Some(target)),
            ));
            return;
        }

        let channel = channel.to_string();
        self.with_host(target, move |host| {
            vec![Command::MODE(
                channel,
                ModeChange::minus('b', Some(&host_mask(host))),
            )]
        });
    }

    /// One MODE line per change, following [`ModeChangeSet::all`]: a set
    /// built as `+o -v +b` goes out in that order, not grouped by sign.
    pub fn change_modes(&mut self, channel: &str, changes: &ModeChangeSet) {
        for change in changes {
            self.send(Command::MODE(channel.to_string(), change.clone()));
        }
    }

    /// Run `then` with `nickname`'s host now, or after a WHOIS resolves it.
    fn with_host<F>(&mut self, nickname: &str, then: F)
    where
        F: FnOnce(&str) -> Vec<Command> + Send + 'static,
    {
        let user = self.roster.user_entry(nickname);
        match user.hostname().map(str::to_string) {
            Some(host) => {
                for command in then(&host) {
                    self.send(command);
                }
            }
            None => {
                user.on_resolved(Box::new(then));
                debug!(nickname, "host unknown, resolving with WHOIS");
                self.send(Command::WHOIS(nickname.to_string()));
            }
        }
    }

    // === Inbound ===

    /// Handle one received line. Failures are reported to listeners and
    /// never propagate.
    pub fn handle_line(&mut self, raw: &str) {
        trace!(line = raw, "recv");
        let line = Line::classify(raw);

        if self.server_ident.is_none() {
            if let Some(sender) = line.server_sender() {
                self.server_ident = Some(sender.to_string());
            }
        }

        let result = match line {
            Line::Ping { token } => {
                self.send(Command::PONG(token.to_string()));
                return;
            }
            Line::Numeric(numeric) => {
                self.emit(|l, id| l.on_raw_line(id, raw));
                self.handle_numeric(&numeric)
            }
            Line::Action(action) => {
                self.emit(|l, id| l.on_raw_line(id, raw));
                self.handle_action(&action)
            }
            Line::Unrecognized { .. } => {
                self.emit(|l, id| l.on_raw_line(id, raw));
                Ok(())
            }
        };

        if let Err(error) = result {
            self.report_line_error(raw, error);
        }
    }

    /// Report a line that could not be handled.
    pub fn report_line_error(&self, raw: &str, error: LineError) {
        warn!(%error, line = raw, "failed to handle line");
        self.emit(|l, id| l.on_parse_error(id, raw, &error));
    }

    /// Surface a transport failure.
    pub fn report_connection_error(&self, error: &io::Error) {
        warn!(%error, server = %self.params.identity, "connection error");
        self.emit(|l, id| l.on_connection_error(id, error));
    }

    fn emit(&self, mut f: impl FnMut(&dyn EventListener, &ConnectionIdentity)) {
        let identity = &self.params.identity;
        self.listeners.emit(|listener| f(listener, identity));
    }

    fn is_me(&self, nickname: &str) -> bool {
        self.actual_nickname
            .as_deref()
            .is_some_and(|me| irc_eq(me, nickname))
    }

    fn send_all(&mut self, commands: Vec<Command>) {
        for command in commands {
            self.send(command);
        }
    }
}

fn kick_command(channel: &str, target: &str, message: Option<&str>) -> Command {
    Command::KICK(
        channel.to_string(),
        target.to_string(),
        message.filter(|m| !m.is_empty()).map(str::to_string),
    )
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("server", &self.params.identity)
            .field("state", &self.state)
            .field("actual_nickname", &self.actual_nickname)
            .field("target_nickname", &self.target_nickname)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
