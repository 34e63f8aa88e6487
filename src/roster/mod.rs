//! Per-connection view of joined channels and known users.
//!
//! Channel and user keys compare with IRC case mapping. Channels exist only
//! while we are in them; users are created lazily the first time a host is
//! learned or needed.

mod channel;
mod user;

use std::collections::HashMap;

pub use self::channel::{Channel, Member, Sigil};
pub use self::user::{Resolution, User};

use crate::casemap::IrcName;

#[derive(Debug, Default)]
pub struct Roster {
    channels: HashMap<IrcName, Channel>,
    users: HashMap<IrcName, User>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `name` with no members, replacing any previous state.
    pub fn reset_channel(&mut self, name: &str) -> &mut Channel {
        let channel = self
            .channels
            .entry(IrcName::from(name))
            .or_insert_with(|| Channel::new(name));
        *channel = Channel::new(name);
        channel
    }

    pub fn remove_channel(&mut self, name: &str) -> Option<Channel> {
        self.channels.remove(&IrcName::from(name))
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(&IrcName::from(name))
    }

    pub fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(&IrcName::from(name))
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    /// Forget every channel; users and their hosts survive.
    pub fn clear_channels(&mut self) {
        self.channels.clear();
    }

    /// Names of tracked channels that `nickname` is in, sorted.
    pub fn channels_with(&self, nickname: &str) -> Vec<String> {
        let mut names: Vec<_> = self
            .channels
            .values()
            .filter(|c| c.contains(nickname))
            .map(|c| c.name().to_string())
            .collect();
        names.sort_by(|a, b| IrcName::from(a.as_str()).cmp(&IrcName::from(b.as_str())));
        names
    }

    /// Members of `channel`; empty if it is not tracked.
    pub fn whos_in(&self, channel: &str) -> Vec<Member> {
        self.channel(channel)
            .map(|c| c.members().cloned().collect())
            .unwrap_or_default()
    }

    pub fn user(&self, nickname: &str) -> Option<&User> {
        self.users.get(&IrcName::from(nickname))
    }

    pub fn user_mut(&mut self, nickname: &str) -> Option<&mut User> {
        self.users.get_mut(&IrcName::from(nickname))
    }

    /// The user entry for `nickname`, created if needed.
    pub fn user_entry(&mut self, nickname: &str) -> &mut User {
        self.users.entry(IrcName::from(nickname)).or_default()
    }

    pub fn remove_user(&mut self, nickname: &str) -> Option<User> {
        self.users.remove(&IrcName::from(nickname))
    }

    /// Move a user's cache entry and channel memberships to a new nickname.
    ///
    /// Returns the channels the user was renamed in.
    pub fn rename(&mut self, old: &str, new: &str) -> Vec<String> {
        if let Some(user) = self.users.remove(&IrcName::from(old)) {
            match self.users.get_mut(&IrcName::from(new)) {
                Some(existing) => existing.absorb(user),
                None => {
                    self.users.insert(IrcName::from(new), user);
                }
            }
        }
        let names = self.channels_with(old);
        for name in &names {
            if let Some(channel) = self.channel_mut(name) {
                channel.rename(old, new);
            }
        }
        names
    }
}
