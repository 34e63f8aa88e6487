//! Numeric reply handling.

use tracing::debug;

use super::{ConnectionState, Session};
use crate::command::Command;
use crate::error::LineError;
use crate::message::{read_param, trim_colon, Numeric};
use crate::response::{NumericError, Response};
use crate::roster::Sigil;

impl Session {
    pub(super) fn handle_numeric(&mut self, numeric: &Numeric<'_>) -> Result<(), LineError> {
        let Numeric {
            code,
            target,
            params,
            ..
        } = *numeric;

        if target != "*" && code != Response::ERR_NICKNAMEINUSE.code() {
            self.actual_nickname = Some(target.to_string());
        }

        match Response::from_code(code) {
            Some(Response::RPL_WELCOME) => self.welcome(),
            Some(Response::RPL_WHOISUSER | Response::RPL_WHOWASUSER) => self.user_host(params)?,
            Some(Response::RPL_NOTOPIC | Response::RPL_TOPIC) => {
                let mut rest = params;
                let channel = read_param(&mut rest, "channel")?;
                let topic = trim_colon(rest);
                self.emit(|l, id| l.on_topic(id, None, channel, topic));
            }
            Some(Response::RPL_INVITING) => {
                let mut rest = params;
                let nickname = read_param(&mut rest, "nickname")?;
                let channel = read_param(&mut rest, "channel")?;
                self.emit(|l, id| l.on_invited(id, nickname, channel));
            }
            Some(Response::RPL_NAMREPLY) => self.names(params)?,
            Some(Response::ERR_NOSUCHNICK) => {
                let mut rest = params;
                let nickname = read_param(&mut rest, "nickname")?;
                self.send(Command::WHOWAS(nickname.to_string()));
            }
            Some(Response::ERR_WASNOSUCHNICK) => {
                let mut rest = params;
                let nickname = read_param(&mut rest, "nickname")?;
                self.roster.remove_user(nickname);
            }
            Some(Response::ERR_NICKNAMEINUSE) => self.nickname_in_use(),
            Some(Response::ERR_CHANOPRIVSNEEDED) => {
                let mut rest = params;
                let channel = read_param(&mut rest, "channel")?;
                let message = trim_colon(rest);
                self.emit(|l, id| l.on_not_channel_op(id, channel, message));
            }
            _ => {}
        }

        if let Some(error) = NumericError::parse(code, params)? {
            self.emit(|l, id| l.on_numeric_error(id, &error));
        }
        Ok(())
    }

    fn welcome(&mut self) {
        debug!(
            server = %self.params.identity,
            nickname = self.actual_nickname.as_deref().unwrap_or(""),
            "registered"
        );
        self.state = ConnectionState::Registered;
        let channels: Vec<String> = self.target_channels().map(with_channel_prefix).collect();
        for channel in channels {
            self.send(Command::JOIN(channel));
        }
    }

    /// 311/314: `nick user host * :realname`
    fn user_host(&mut self, params: &str) -> Result<(), LineError> {
        let mut rest = params;
        let nickname = read_param(&mut rest, "nickname")?;
        let _username = read_param(&mut rest, "username")?;
        let hostname = read_param(&mut rest, "hostname")?;

        let Some(user) = self.roster.user_mut(nickname) else {
            return Ok(());
        };
        let commands = user.resolve(hostname);
        self.send_all(commands);
        Ok(())
    }

    /// 353: `[=*@] <channel> :[@%+]nick ...`
    fn names(&mut self, params: &str) -> Result<(), LineError> {
        let mut rest = params;
        let mut channel = read_param(&mut rest, "channel")?;
        if channel.len() == 1 && !rest.is_empty() {
            channel = read_param(&mut rest, "channel")?;
        }

        let Some(roster) = self.roster.channel_mut(channel) else {
            debug!(channel, "names for untracked channel");
            return Ok(());
        };
        let mut nicknames = Vec::new();
        for entry in trim_colon(rest).split(' ') {
            let (sigil, nickname) = Sigil::split(entry);
            if nickname.is_empty() {
                continue;
            }
            roster.insert(nickname, sigil);
            nicknames.push(nickname);
        }
        for nickname in nicknames {
            self.roster.user_entry(nickname);
        }
        Ok(())
    }

    fn nickname_in_use(&mut self) {
        if self.actual_nickname.is_none() {
            self.last_tried_nickname.push('_');
            debug!(nickname = %self.last_tried_nickname, "nickname in use, retrying");
            self.send(Command::NICK(self.last_tried_nickname.clone()));
        } else {
            let nickname = self.target_nickname.clone();
            self.emit(|l, id| l.on_nick_in_use(id, &nickname));
        }
    }
}

fn with_channel_prefix(channel: &str) -> String {
    if channel.starts_with(['#', '&', '+', '!']) {
        channel.to_string()
    } else {
        format!("#{}", channel)
    }
}
