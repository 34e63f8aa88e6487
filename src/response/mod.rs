//! IRC numeric response codes the engine reacts to.
//!
//! Response codes are three-digit numbers sent by servers to indicate the
//! result of commands or to provide information. Only the numerics that
//! drive session state or carry a typed error are enumerated here; any other
//! code is still delivered to listeners as a raw line.
//!
//! # Reference
//! - RFC 1459: Internet Relay Chat Protocol
//! - RFC 2812: Internet Relay Chat: Client Protocol

#![allow(non_camel_case_types)]

mod errors;
mod helpers;

pub use self::errors::NumericError;

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,

    /// 311 - WHOIS user info
    RPL_WHOISUSER = 311,
    /// 314 - WHOWAS user info
    RPL_WHOWASUSER = 314,
    /// 331 - No topic set
    RPL_NOTOPIC = 331,
    /// 332 - Channel topic
    RPL_TOPIC = 332,
    /// 341 - Inviting user to channel
    RPL_INVITING = 341,
    /// 353 - NAMES reply
    RPL_NAMREPLY = 353,

    /// 401 - No such nick/channel
    ERR_NOSUCHNICK = 401,
    /// 402 - No such server
    ERR_NOSUCHSERVER = 402,
    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 404 - Cannot send to channel
    ERR_CANNOTSENDTOCHAN = 404,
    /// 405 - Too many channels
    ERR_TOOMANYCHANNELS = 405,
    /// 406 - There was no such nickname
    ERR_WASNOSUCHNICK = 406,
    /// 407 - Too many targets
    ERR_TOOMANYTARGETS = 407,
    /// 409 - No origin specified
    ERR_NOORIGIN = 409,
    /// 411 - No recipient given
    ERR_NORECIPIENT = 411,
    /// 412 - No text to send
    ERR_NOTEXTTOSEND = 412,
    /// 413 - No toplevel domain
    ERR_NOTOPLEVEL = 413,
    /// 414 - Wildcard in toplevel domain
    ERR_WILDTOPLEVEL = 414,
    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 422 - MOTD file missing
    ERR_NOMOTD = 422,
    /// 423 - No admin info
    ERR_NOADMININFO = 423,
    /// 424 - File error
    ERR_FILEERROR = 424,
    /// 431 - No nickname given
    ERR_NONICKNAMEGIVEN = 431,
    /// 432 - Erroneous nickname
    ERR_ERRONEUSNICKNAME = 432,
    /// 433 - Nickname in use
    ERR_NICKNAMEINUSE = 433,
    /// 436 - Nickname collision
    ERR_NICKCOLLISION = 436,
    /// 482 - Channel operator privileges needed
    ERR_CHANOPRIVSNEEDED = 482,
}
