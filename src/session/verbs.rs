//! Handling of commands relayed from users.

use tracing::debug;

use super::Session;
use crate::casemap::irc_eq;
use crate::command::{Command, VERSION_REPLY};
use crate::error::LineError;
use crate::message::{read_param, trim_colon, Action};
use crate::mode::ModeChangeSet;
use crate::prefix::Actor;

const CTCP_VERSION: &str = "\u{1}VERSION\u{1}";

impl Session {
    pub(super) fn handle_action(&mut self, action: &Action<'_>) -> Result<(), LineError> {
        let actor = action.actor();
        let mut params = action.params;

        match action.verb {
            "NICK" => {
                let new_nick = read_param(&mut params, "nickname")?;
                self.nick_changed(&actor, new_nick);
            }
            "JOIN" => {
                let channel = read_param(&mut params, "channel")?;
                self.joined(&actor, channel);
            }
            "PART" => {
                let channel = read_param(&mut params, "channel")?;
                if self.is_me(&actor.nickname) {
                    self.roster.remove_channel(channel);
                } else if let Some(roster) = self.roster.channel_mut(channel) {
                    roster.remove(&actor.nickname);
                }
                self.emit(|l, id| l.on_part(id, &actor, channel));
            }
            "QUIT" => self.quit_seen(&actor, trim_colon(params)),
            "KICK" => {
                let channel = read_param(&mut params, "channel")?;
                let target = read_param(&mut params, "target")?;
                let message = trim_colon(params);
                self.kicked(&actor, channel, target, message);
            }
            "PRIVMSG" => {
                let target = read_param(&mut params, "target")?;
                let message = trim_colon(params);
                if message == CTCP_VERSION && self.is_me(target) {
                    debug!(from = %actor.nickname, "answering CTCP VERSION");
                    self.send(Command::NOTICE(
                        actor.nickname.clone(),
                        VERSION_REPLY.to_string(),
                    ));
                    return Ok(());
                }
                self.emit(|l, id| l.on_privmsg(id, &actor, target, message));
            }
            "NOTICE" => {
                let target = read_param(&mut params, "target")?;
                let message = trim_colon(params);
                self.emit(|l, id| l.on_notice(id, &actor, target, message));
            }
            "MODE" => {
                let channel = read_param(&mut params, "channel")?;
                self.modes_changed(&actor, channel, params)?;
            }
            "TOPIC" => {
                let channel = read_param(&mut params, "channel")?;
                let topic = trim_colon(params);
                self.emit(|l, id| l.on_topic(id, Some(&actor), channel, topic));
            }
            _ => {}
        }
        Ok(())
    }

    fn nick_changed(&mut self, actor: &Actor, new_nick: &str) {
        let old = actor.nickname.as_str();
        if self.is_me(old) {
            debug!(old, new = new_nick, "own nickname changed");
            self.actual_nickname = Some(new_nick.to_string());
        }
        for channel in self.roster.rename(old, new_nick) {
            self.emit(|l, id| l.on_nick(id, actor, &channel, new_nick));
        }
    }

    fn joined(&mut self, actor: &Actor, channel: &str) {
        if self.is_me(&actor.nickname) {
            debug!(channel, "joined");
            self.roster.reset_channel(channel);
        }
        if let Some(roster) = self.roster.channel_mut(channel) {
            roster.join(&actor.nickname);
        }
        self.roster
            .user_entry(&actor.nickname)
            .note_hostname(&actor.hostname);
        self.emit(|l, id| l.on_join(id, actor, channel));
    }

    fn quit_seen(&mut self, actor: &Actor, message: &str) {
        let nickname = actor.nickname.as_str();
        for channel in self.roster.channels_with(nickname) {
            if let Some(roster) = self.roster.channel_mut(&channel) {
                roster.remove(nickname);
            }
            self.emit(|l, id| l.on_quit(id, actor, &channel, message));
        }
        if let Some(user) = self.roster.user_mut(nickname) {
            user.forget_hostname();
        }

        if irc_eq(nickname, &self.target_nickname) && !self.is_me(nickname) {
            debug!(nickname, "target nickname released, reclaiming");
            self.send(Command::NICK(self.target_nickname.clone()));
        }
    }

    fn kicked(&mut self, op: &Actor, channel: &str, target: &str, message: &str) {
        if let Some(roster) = self.roster.channel_mut(channel) {
            roster.remove(target);
        }
        if self.is_me(target) {
            self.roster.remove_channel(channel);
            if self.params.auto_rejoin(channel) {
                debug!(channel, "kicked, rejoining");
                self.send(Command::JOIN(channel.to_string()));
            } else {
                self.target_channels.retain(|c| c != &channel);
            }
        }
        self.emit(|l, id| l.on_kick(id, op, channel, target, message));
    }

    fn modes_changed(&mut self, op: &Actor, channel: &str, modes: &str) -> Result<(), LineError> {
        let changes = ModeChangeSet::parse(modes).map_err(|cause| LineError::InvalidModeString {
            string: modes.to_string(),
            cause,
        })?;

        if let Some(roster) = self.roster.channel_mut(channel) {
            for change in &changes {
                roster.apply_mode(change);
            }
        }
        for change in changes.user_modes() {
            self.emit(|l, id| l.on_mode_change(id, op, channel, change));
        }
        for change in changes.channel_modes() {
            self.emit(|l, id| l.on_channel_mode_change(id, op, channel, change));
        }
        Ok(())
    }
}
