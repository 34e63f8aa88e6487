//! Typed server error numerics (401-436).
//!
//! Each variant carries the identifier the server complained about, where
//! the numeric has one, and the human-readable message that followed it.

use thiserror::Error;

use super::Response;
use crate::error::LineError;
use crate::message::{read_param, trim_colon};

/// An error numeric reported by the server.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NumericError {
    /// 401
    #[error("{nickname}: {message}")]
    NoSuchNick { nickname: String, message: String },
    /// 402
    #[error("{server}: {message}")]
    NoSuchServer { server: String, message: String },
    /// 403
    #[error("{channel}: {message}")]
    NoSuchChannel { channel: String, message: String },
    /// 404
    #[error("{channel}: {message}")]
    CannotSendToChannel { channel: String, message: String },
    /// 405
    #[error("{channel}: {message}")]
    TooManyChannels { channel: String, message: String },
    /// 406
    #[error("{nickname}: {message}")]
    WasNoSuchNick { nickname: String, message: String },
    /// 407
    #[error("{target}: {message}")]
    TooManyTargets { target: String, message: String },
    /// 409
    #[error("{message}")]
    NoOrigin { message: String },
    /// 411
    #[error("{message}")]
    NoRecipient { message: String },
    /// 412
    #[error("{message}")]
    NoTextToSend { message: String },
    /// 413
    #[error("{mask}: {message}")]
    NoTopLevel { mask: String, message: String },
    /// 414
    #[error("{mask}: {message}")]
    WildTopLevel { mask: String, message: String },
    /// 421
    #[error("{command}: {message}")]
    UnknownCommand { command: String, message: String },
    /// 422
    #[error("{message}")]
    NoMotd { message: String },
    /// 423
    #[error("{server}: {message}")]
    NoAdminInfo { server: String, message: String },
    /// 424
    #[error("{message}")]
    FileError { message: String },
    /// 431
    #[error("{message}")]
    NoNicknameGiven { message: String },
    /// 432
    #[error("{nickname}: {message}")]
    ErroneousNickname { nickname: String, message: String },
    /// 433
    #[error("{nickname}: {message}")]
    NicknameInUse { nickname: String, message: String },
    /// 436
    #[error("{nickname}: {message}")]
    NickCollision { nickname: String, message: String },
}

impl NumericError {
    /// Build the typed error for `code` from the parameters that follow
    /// the target.
    ///
    /// Returns `Ok(None)` for codes outside the taxonomy.
    pub fn parse(code: u16, params: &str) -> Result<Option<Self>, LineError> {
        use Response::*;

        let Some(response) = Response::from_code(code) else {
            return Ok(None);
        };

        let mut rest = params;
        let mut ident = |what: &'static str| -> Result<(String, String), LineError> {
            let id = read_param(&mut rest, what)?.to_string();
            Ok((id, trim_colon(rest).to_string()))
        };
        let message = || trim_colon(params).to_string();

        let error = match response {
            ERR_NOSUCHNICK => {
                let (nickname, message) = ident("nickname")?;
                Self::NoSuchNick { nickname, message }
            }
            ERR_NOSUCHSERVER => {
                let (server, message) = ident("server")?;
                Self::NoSuchServer { server, message }
            }
            ERR_NOSUCHCHANNEL => {
                let (channel, message) = ident("channel")?;
                Self::NoSuchChannel { channel, message }
            }
            ERR_CANNOTSENDTOCHAN => {
                let (channel, message) = ident("channel")?;
                Self::CannotSendToChannel { channel, message }
            }
            ERR_TOOMANYCHANNELS => {
                let (channel, message) = ident("channel")?;
                Self::TooManyChannels { channel, message }
            }
            ERR_WASNOSUCHNICK => {
                let (nickname, message) = ident("nickname")?;
                Self::WasNoSuchNick { nickname, message }
            }
            ERR_TOOMANYTARGETS => {
                let (target, message) = ident("target")?;
                Self::TooManyTargets { target, message }
            }
            ERR_NOORIGIN => Self::NoOrigin { message: message() },
            ERR_NORECIPIENT => Self::NoRecipient { message: message() },
            ERR_NOTEXTTOSEND => Self::NoTextToSend { message: message() },
            ERR_NOTOPLEVEL => {
                let (mask, message) = ident("mask")?;
                Self::NoTopLevel { mask, message }
            }
            ERR_WILDTOPLEVEL => {
                let (mask, message) = ident("mask")?;
                Self::WildTopLevel { mask, message }
            }
            ERR_UNKNOWNCOMMAND => {
                let (command, message) = ident("command")?;
                Self::UnknownCommand { command, message }
            }
            ERR_NOMOTD => Self::NoMotd { message: message() },
            ERR_NOADMININFO => {
                let (server, message) = ident("server")?;
                Self::NoAdminInfo { server, message }
            }
            ERR_FILEERROR => Self::FileError { message: message() },
            ERR_NONICKNAMEGIVEN => Self::NoNicknameGiven { message: message() },
            ERR_ERRONEUSNICKNAME => {
                let (nickname, message) = ident("nickname")?;
                Self::ErroneousNickname { nickname, message }
            }
            ERR_NICKNAMEINUSE => {
                let (nickname, message) = ident("nickname")?;
                Self::NicknameInUse { nickname, message }
            }
            ERR_NICKCOLLISION => {
                let (nickname, message) = ident("nickname")?;
                Self::NickCollision { nickname, message }
            }
            _ => return Ok(None),
        };
        Ok(Some(error))
    }

    /// The response code this error was built from.
    pub fn response(&self) -> Response {
        match self {
            Self::NoSuchNick { .. } => Response::ERR_NOSUCHNICK,
            Self::NoSuchServer { .. } => Response::ERR_NOSUCHSERVER,
            Self::NoSuchChannel { .. } => Response::ERR_NOSUCHCHANNEL,
            Self::CannotSendToChannel { .. } => Response::ERR_CANNOTSENDTOCHAN,
            Self::TooManyChannels { .. } => Response::ERR_TOOMANYCHANNELS,
            Self::WasNoSuchNick { .. } => Response::ERR_WASNOSUCHNICK,
            Self::TooManyTargets { .. } => Response::ERR_TOOMANYTARGETS,
            Self::NoOrigin { .. } => Response::ERR_NOORIGIN,
            Self::NoRecipient { .. } => Response::ERR_NORECIPIENT,
            Self::NoTextToSend { .. } => Response::ERR_NOTEXTTOSEND,
            Self::NoTopLevel { .. } => Response::ERR_NOTOPLEVEL,
            Self::WildTopLevel { .. } => Response::ERR_WILDTOPLEVEL,
            Self::UnknownCommand { .. } => Response::ERR_UNKNOWNCOMMAND,
            Self::NoMotd { .. } => Response::ERR_NOMOTD,
            Self::NoAdminInfo { .. } => Response::ERR_NOADMININFO,
            Self::FileError { .. } => Response::ERR_FILEERROR,
            Self::NoNicknameGiven { .. } => Response::ERR_NONICKNAMEGIVEN,
            Self::ErroneousNickname { .. } => Response::ERR_ERRONEUSNICKNAME,
            Self::NicknameInUse { .. } => Response::ERR_NICKNAMEINUSE,
            Self::NickCollision { .. } => Response::ERR_NICKCOLLISION,
        }
    }

    /// Numeric code, e.g. `433`.
    #[inline]
    pub fn code(&self) -> u16 {
        self.response().code()
    }

    /// The server's explanation text.
    pub fn message(&self) -> &str {
        match self {
            Self::NoSuchNick { message, .. }
            | Self::NoSuchServer { message, .. }
            | Self::NoSuchChannel { message, .. }
            | Self::CannotSendToChannel { message, .. }
            | Self::TooManyChannels { message, .. }
            | Self::WasNoSuchNick { message, .. }
            | Self::TooManyTargets { message, .. }
            | Self::NoOrigin { message }
            | Self::NoRecipient { message }
            | Self::NoTextToSend { message }
            | Self::NoTopLevel { message, .. }
            | Self::WildTopLevel { message, .. }
            | Self::UnknownCommand { message, .. }
            | Self::NoMotd { message }
            | Self::NoAdminInfo { message, .. }
            | Self::FileError { message }
            | Self::NoNicknameGiven { message }
            | Self::ErroneousNickname { message, .. }
            | Self::NicknameInUse { message, .. }
            | Self::NickCollision { message, .. } => message,
        }
    }
}
