use std::fmt::{self, Write};

use super::types::Command;

/// Write a command with arguments directly to a formatter.
/// The last argument is treated as trailing and gets a `:` prefix if needed.
fn write_cmd(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    let Some((trailing, middle)) = args.split_last() else {
        return f.write_str(cmd);
    };

    f.write_str(cmd)?;
    for param in middle {
        f.write_char(' ')?;
        f.write_str(param)?;
    }
    f.write_char(' ')?;

    // Add colon prefix if trailing is empty, contains a space, or starts with ':'
    if trailing.is_empty() || trailing.contains(' ') || trailing.starts_with(':') {
        f.write_char(':')?;
    }
    f.write_str(trailing)
}

/// Write a command with a freeform (always colon-prefixed) trailing argument.
fn write_cmd_freeform(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    match args.split_last() {
        Some((suffix, middle)) => {
            f.write_str(cmd)?;
            for arg in middle {
                f.write_char(' ')?;
                f.write_str(arg)?;
            }
            f.write_str(" :")?;
            f.write_str(suffix)
        }
        None => f.write_str(cmd),
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PASS(password) => write_cmd(f, "PASS", &[password]),
            Command::NICK(nickname) => write_cmd(f, "NICK", &[nickname]),
            Command::USER(ident, host, realname) => {
                write_cmd_freeform(f, "USER", &[ident, host, host, realname])
            }
            Command::QUIT(Some(message)) => write_cmd_freeform(f, "QUIT", &[message]),
            Command::QUIT(None) => f.write_str("QUIT"),
            Command::PING(token) => write_cmd(f, "PING", &[token]),
            Command::PONG(token) if token.is_empty() => f.write_str("PONG"),
            Command::PONG(token) => write!(f, "PONG {}", token),

            Command::JOIN(channel) => write_cmd(f, "JOIN", &[channel]),
            Command::PART(channel) => write_cmd(f, "PART", &[channel]),
            Command::TOPIC(channel, Some(topic)) => {
                write_cmd_freeform(f, "TOPIC", &[channel, topic])
            }
            Command::TOPIC(channel, None) => write_cmd(f, "TOPIC", &[channel]),
            Command::KICK(channel, nickname, Some(comment)) => {
                write_cmd_freeform(f, "KICK", &[channel, nickname, comment])
            }
            Command::KICK(channel, nickname, None) => write_cmd(f, "KICK", &[channel, nickname]),
            Command::MODE(target, change) => write!(f, "MODE {} {}", target, change),

            Command::PRIVMSG(target, text) => write_cmd_freeform(f, "PRIVMSG", &[target, text]),
            Command::NOTICE(target, text) => write_cmd_freeform(f, "NOTICE", &[target, text]),

            Command::WHOIS(nickname) => write_cmd(f, "WHOIS", &[nickname]),
            Command::WHOWAS(nickname) => write_cmd(f, "WHOWAS", &[nickname]),

            Command::Raw(line) => f.write_str(line),
        }
    }
}
