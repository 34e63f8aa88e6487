//! Per-user host cache and deferred host lookups.

use std::fmt;

use crate::command::Command;

/// Work waiting on a user's hostname; returns the commands to send.
pub type Resolution = Box<dyn FnOnce(&str) -> Vec<Command> + Send>;

/// What we know about a user seen on this connection.
#[derive(Default)]
pub struct User {
    hostname: Option<String>,
    pending: Vec<Resolution>,
}

impl User {
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    /// Remember a hostname seen in passing without running pending work.
    pub fn note_hostname(&mut self, hostname: &str) {
        self.hostname = Some(hostname.to_string());
    }

    /// Queue work to run once the hostname is known.
    pub fn on_resolved(&mut self, resolution: Resolution) {
        self.pending.push(resolution);
    }

    /// Record the hostname and run every pending continuation in the order
    /// they were queued. Each runs exactly once.
    pub fn resolve(&mut self, hostname: &str) -> Vec<Command> {
        self.hostname = Some(hostname.to_string());
        std::mem::take(&mut self.pending)
            .into_iter()
            .flat_map(|resolution| resolution(hostname))
            .collect()
    }

    /// Forget the hostname; pending work stays queued.
    pub fn forget_hostname(&mut self) {
        self.hostname = None;
    }

    /// Fold in the entry of a user who took this nickname. Their hostname
    /// wins; work already queued here runs before theirs.
    pub fn absorb(&mut self, other: User) {
        if other.hostname.is_some() {
            self.hostname = other.hostname;
        }
        self.pending.extend(other.pending);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("hostname", &self.hostname)
            .field("pending", &self.pending.len())
            .finish()
    }
}
