//! Code conversion for [`Response`].

use super::Response;

impl Response {
    /// Returns the numeric code as u16
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Creates a Response from a numeric code
    pub fn from_code(code: u16) -> Option<Response> {
        use Response::*;

        let response = match code {
            1 => RPL_WELCOME,
            311 => RPL_WHOISUSER,
            314 => RPL_WHOWASUSER,
            331 => RPL_NOTOPIC,
            332 => RPL_TOPIC,
            341 => RPL_INVITING,
            353 => RPL_NAMREPLY,
            401 => ERR_NOSUCHNICK,
            402 => ERR_NOSUCHSERVER,
            403 => ERR_NOSUCHCHANNEL,
            404 => ERR_CANNOTSENDTOCHAN,
            405 => ERR_TOOMANYCHANNELS,
            406 => ERR_WASNOSUCHNICK,
            407 => ERR_TOOMANYTARGETS,
            409 => ERR_NOORIGIN,
            411 => ERR_NORECIPIENT,
            412 => ERR_NOTEXTTOSEND,
            413 => ERR_NOTOPLEVEL,
            414 => ERR_WILDTOPLEVEL,
            421 => ERR_UNKNOWNCOMMAND,
            422 => ERR_NOMOTD,
            423 => ERR_NOADMININFO,
            424 => ERR_FILEERROR,
            431 => ERR_NONICKNAMEGIVEN,
            432 => ERR_ERRONEUSNICKNAME,
            433 => ERR_NICKNAMEINUSE,
            436 => ERR_NICKCOLLISION,
            482 => ERR_CHANOPRIVSNEEDED,
            _ => return None,
        };
        Some(response)
    }
}
