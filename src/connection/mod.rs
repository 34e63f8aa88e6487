//! A live, self-healing connection to one server.
//!
//! [`Connection`] owns the socket for a [`Session`] and runs three tasks:
//! a reader feeding received lines into the session, a writer draining
//! queued commands onto the socket, and a heartbeat that pings the server
//! and redials dropped connections. All session state sits behind a single
//! lock; reads, writes, heartbeat ticks and API calls each take it briefly.
//!
//! Every (re)connect starts a new generation. Tasks remember the generation
//! they were started for and do nothing once it is stale.

mod tasks;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use encoding::Encoding;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::config::{ConnectParameters, ConnectionIdentity};
use crate::error::{EngineError, Result};
use crate::event::ListenerSet;
use crate::mode::ModeChangeSet;
use crate::roster::Member;
use crate::session::{ConnectionState, Session};
use crate::transport::{is_reset, Connector};

/// Handle to a connection. Clones share the same connection.
///
/// The connection keeps running until [`Connection::dispose`] is called,
/// even if every handle is dropped.
#[derive(Clone)]
pub struct Connection {
    shared: Arc<Shared>,
}

struct Shared {
    identity: ConnectionIdentity,
    encoding: &'static Encoding,
    auto_reconnect: bool,
    heartbeat: Duration,
    connector: Arc<dyn Connector>,
    inner: Mutex<Inner>,
}

struct Inner {
    session: Session,
    generation: u64,
    disposed: bool,
    writer: Option<mpsc::UnboundedSender<String>>,
    reader: Option<JoinHandle<()>>,
    heartbeat: Option<JoinHandle<()>>,
    connecting_since: Option<Instant>,
}

impl Inner {
    /// Hand queued commands to the writer task.
    fn flush(&mut self) {
        let commands = self.session.take_outbox();
        let Some(writer) = &self.writer else {
            return;
        };
        for command in commands {
            let line = command.to_string();
            trace!(line = %line, "send");
            if writer.send(line).is_err() {
                break;
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        !self.disposed && self.generation == generation
    }
}

impl Shared {
    /// Drop the current socket, if any, and dial again.
    fn reconnect(self: &Arc<Self>) {
        let generation = {
            let mut inner = self.inner.lock();
            if inner.disposed {
                return;
            }
            inner.generation += 1;
            inner.writer = None;
            if let Some(reader) = inner.reader.take() {
                reader.abort();
            }
            inner.session.begin_connect();
            inner.connecting_since = Some(Instant::now());
            inner.generation
        };

        let task = tokio::spawn(tasks::run(Arc::clone(self), generation));
        let mut inner = self.inner.lock();
        if inner.is_current(generation) {
            inner.reader = Some(task);
        } else {
            task.abort();
        }
    }

    /// The socket for `generation` failed or closed.
    fn connection_lost(self: &Arc<Self>, generation: u64, error: std::io::Error) {
        let reconnect = {
            let mut inner = self.inner.lock();
            if !inner.is_current(generation) {
                trace!(generation, "ignoring error from stale connection");
                return;
            }
            inner.session.disconnected();
            inner.writer = None;
            inner.connecting_since = None;

            let reconnect = self.auto_reconnect && is_reset(&error);
            if reconnect {
                warn!(server = %self.identity, %error, "connection reset, reconnecting");
            } else {
                inner.session.report_connection_error(&error);
            }
            reconnect
        };

        if reconnect {
            self.reconnect();
        }
    }

    /// One heartbeat tick. Returns `false` once disposed.
    fn beat(self: &Arc<Self>) -> bool {
        let reconnect = {
            let mut inner = self.inner.lock();
            if inner.disposed {
                return false;
            }
            match inner.session.state() {
                ConnectionState::Disconnected => true,
                ConnectionState::Connecting => inner
                    .connecting_since
                    .map_or(true, |since| since.elapsed() >= self.heartbeat),
                ConnectionState::AwaitingWelcome | ConnectionState::Registered => {
                    inner.session.heartbeat();
                    inner.flush();
                    false
                }
            }
        };

        if reconnect {
            debug!(server = %self.identity, "heartbeat found connection down");
            self.reconnect();
        }
        true
    }
}

impl Connection {
    /// Create the connection and start dialing. Must be called from within
    /// a tokio runtime.
    pub fn new(
        params: ConnectParameters,
        listeners: ListenerSet,
        connector: Arc<dyn Connector>,
    ) -> Self {
        let shared = Arc::new(Shared {
            identity: params.identity.clone(),
            encoding: params.encoding,
            auto_reconnect: params.auto_reconnect,
            heartbeat: params.heartbeat,
            connector,
            inner: Mutex::new(Inner {
                session: Session::new(params, listeners),
                generation: 0,
                disposed: false,
                writer: None,
                reader: None,
                heartbeat: None,
                connecting_since: None,
            }),
        });

        let heartbeat = tokio::spawn(tasks::heartbeat(Arc::downgrade(&shared), shared.heartbeat));
        shared.inner.lock().heartbeat = Some(heartbeat);
        shared.reconnect();

        Self { shared }
    }

    pub fn identity(&self) -> &ConnectionIdentity {
        &self.shared.identity
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.inner.lock().session.state()
    }

    pub fn actual_nickname(&self) -> Option<String> {
        self.shared
            .inner
            .lock()
            .session
            .actual_nickname()
            .map(str::to_string)
    }

    pub fn target_nickname(&self) -> String {
        self.shared.inner.lock().session.target_nickname().to_string()
    }

    pub fn target_channels(&self) -> Vec<String> {
        self.shared
            .inner
            .lock()
            .session
            .target_channels()
            .map(str::to_string)
            .collect()
    }

    /// Current members of `channel` with their sigils.
    pub fn whos_in(&self, channel: &str) -> Vec<Member> {
        self.shared.inner.lock().session.whos_in(channel)
    }

    pub fn listeners(&self) -> ListenerSet {
        self.shared.inner.lock().session.listeners().clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.inner.lock().disposed
    }

    /// Run `f` against the session and send whatever it queued.
    fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> Result<R> {
        let mut inner = self.shared.inner.lock();
        if inner.disposed {
            return Err(EngineError::Disposed);
        }
        let result = f(&mut inner.session);
        inner.flush();
        Ok(result)
    }

    pub fn join(&self, channel: &str) -> Result<()> {
        self.with_session(|s| s.join(channel))
    }

    pub fn part(&self, channel: &str) -> Result<()> {
        self.with_session(|s| s.part(channel))
    }

    pub fn nick(&self, nickname: &str) -> Result<()> {
        self.with_session(|s| s.nick(nickname))
    }

    pub fn topic(&self, channel: &str, text: Option<&str>) -> Result<()> {
        self.with_session(|s| s.topic(channel, text))
    }

    pub fn kick(&self, channel: &str, target: &str, message: Option<&str>) -> Result<()> {
        self.with_session(|s| s.kick(channel, target, message))
    }

    pub fn ban(&self, channel: &str, target: &str) -> Result<()> {
        self.with_session(|s| s.ban(channel, target))
    }

    pub fn kick_ban(&self, channel: &str, target: &str, message: Option<&str>) -> Result<()> {
        self.with_session(|s| s.kick_ban(channel, target, message))
    }

    pub fn unban(&self, channel: &str, target: &str) -> Result<()> {
        self.with_session(|s| s.unban(channel, target))
    }

    pub fn change_modes(&self, channel: &str, changes: &ModeChangeSet) -> Result<()> {
        self.with_session(|s| s.change_modes(channel, changes))
    }

    pub fn privmsg(&self, target: &str, text: &str) -> Result<()> {
        self.with_session(|s| s.privmsg(target, text))
    }

    pub fn notice(&self, target: &str, text: &str) -> Result<()> {
        self.with_session(|s| s.notice(target, text))
    }

    /// Send a raw protocol line.
    pub fn send(&self, line: &str) -> Result<()> {
        self.with_session(|s| s.send_raw(line))
    }

    /// Drop the socket and dial again.
    pub fn reconnect(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(EngineError::Disposed);
        }
        self.shared.reconnect();
        Ok(())
    }

    /// Send QUIT, close the socket and stop the heartbeat. Idempotent.
    pub fn dispose(&self) {
        let mut inner = self.shared.inner.lock();
        if inner.disposed {
            return;
        }
        debug!(server = %self.shared.identity, "disposing");

        inner.session.quit(None);
        inner.flush();
        inner.disposed = true;
        inner.writer = None;
        inner.session.disconnected();
        if let Some(reader) = inner.reader.take() {
            reader.abort();
        }
        if let Some(heartbeat) = inner.heartbeat.take() {
            heartbeat.abort();
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("server", &self.shared.identity)
            .field("state", &self.state())
            .finish()
    }
}
