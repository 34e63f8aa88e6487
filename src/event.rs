//! Listener interface for session events.
//!
//! Every method has an empty default body, so a listener implements only
//! what it cares about. Callbacks run synchronously on the thread that
//! received the line, while the connection's state lock is held: a listener
//! must not call back into the same [`Connection`](crate::connection::Connection)
//! before returning. Queue the work elsewhere instead.

use std::io;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::ConnectionIdentity;
use crate::error::LineError;
use crate::mode::ModeChange;
use crate::prefix::Actor;
use crate::response::NumericError;

/// Observer of everything a session reports.
#[allow(unused_variables)]
pub trait EventListener: Send + Sync {
    fn on_join(&self, conn: &ConnectionIdentity, who: &Actor, channel: &str) {}

    fn on_part(&self, conn: &ConnectionIdentity, who: &Actor, channel: &str) {}

    /// Fired once for every tracked channel the user was in.
    fn on_quit(&self, conn: &ConnectionIdentity, who: &Actor, channel: &str, message: &str) {}

    fn on_kick(
        &self,
        conn: &ConnectionIdentity,
        op: &Actor,
        channel: &str,
        target: &str,
        message: &str,
    ) {
    }

    /// Fired once for every tracked channel the user was in.
    fn on_nick(&self, conn: &ConnectionIdentity, who: &Actor, channel: &str, new_nick: &str) {}

    /// A status or list mode (`o h v b e I O`) changed.
    fn on_mode_change(
        &self,
        conn: &ConnectionIdentity,
        op: &Actor,
        channel: &str,
        change: &ModeChange,
    ) {
    }

    /// A channel flag changed.
    fn on_channel_mode_change(
        &self,
        conn: &ConnectionIdentity,
        op: &Actor,
        channel: &str,
        change: &ModeChange,
    ) {
    }

    /// `op` is `None` when the topic came from a 331/332 reply.
    fn on_topic(&self, conn: &ConnectionIdentity, op: Option<&Actor>, channel: &str, topic: &str) {}

    fn on_privmsg(&self, conn: &ConnectionIdentity, who: &Actor, target: &str, message: &str) {}

    fn on_notice(&self, conn: &ConnectionIdentity, who: &Actor, target: &str, message: &str) {}

    fn on_invited(&self, conn: &ConnectionIdentity, nickname: &str, channel: &str) {}

    /// A nickname change after registration was refused.
    fn on_nick_in_use(&self, conn: &ConnectionIdentity, nickname: &str) {}

    fn on_not_channel_op(&self, conn: &ConnectionIdentity, channel: &str, message: &str) {}

    fn on_numeric_error(&self, conn: &ConnectionIdentity, error: &NumericError) {}

    /// Every received line except PING.
    fn on_raw_line(&self, conn: &ConnectionIdentity, line: &str) {}

    fn on_parse_error(&self, conn: &ConnectionIdentity, raw: &str, error: &LineError) {}

    fn on_connection_error(&self, conn: &ConnectionIdentity, error: &io::Error) {}
}

/// A shared, mutable list of listeners.
///
/// Clones share the same list, so a registry and all of its sessions see
/// listeners added at any time.
#[derive(Clone, Default)]
pub struct ListenerSet {
    inner: Arc<RwLock<Vec<Arc<dyn EventListener>>>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Arc<dyn EventListener>) {
        self.inner.write().push(listener);
    }

    /// Remove a listener previously added; compares by pointer.
    pub fn remove(&self, listener: &Arc<dyn EventListener>) -> bool {
        let mut listeners = self.inner.write();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Call `f` for each listener, in the order they were added.
    ///
    /// Iterates a snapshot, so listeners may add or remove listeners.
    pub fn emit(&self, mut f: impl FnMut(&dyn EventListener)) {
        let snapshot = self.inner.read().clone();
        for listener in &snapshot {
            f(listener.as_ref());
        }
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.len())
            .finish()
    }
}
