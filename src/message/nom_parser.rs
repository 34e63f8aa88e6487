//! Nom-based line classifier.
//!
//! Received lines are matched against three shapes, in order, and the
//! first match wins:
//!
//! ```text
//! PING[ <token>]
//! :<sender> <NNN> <target>[ [:]<params>]
//! [:]<nick>!<user>@<host> <VERB>[ <params>]
//! ```
//!
//! Anything else is [`Line::Unrecognized`].

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1, take_while_m_n},
    character::complete::char,
    combinator::{all_consuming, eof, map_res, opt, rest},
    error::{context, VerboseError},
    sequence::preceded,
    IResult,
};

use crate::prefix::Actor;

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// A classified line, borrowing from the received text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line<'a> {
    /// Keepalive request; `token` is echoed back verbatim.
    Ping { token: &'a str },
    /// Three-digit server reply.
    Numeric(Numeric<'a>),
    /// Command relayed from another client (or ourselves).
    Action(Action<'a>),
    /// No known shape; `sender` is the `:prefix`, if any.
    Unrecognized { sender: Option<&'a str> },
}

/// A numeric reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Numeric<'a> {
    /// The server that sent the reply.
    pub sender: &'a str,
    /// Reply code.
    pub code: u16,
    /// First parameter; our nickname, or `*` before registration.
    pub target: &'a str,
    /// Everything after the target, with one leading `:` removed.
    pub params: &'a str,
}

/// A command sent by `nick!user@host`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action<'a> {
    pub nickname: &'a str,
    pub username: &'a str,
    pub hostname: &'a str,
    /// Command word, e.g. `PRIVMSG`.
    pub verb: &'a str,
    /// Unparsed parameter text.
    pub params: &'a str,
}

impl Action<'_> {
    /// Owned copy of the sender.
    pub fn actor(&self) -> Actor {
        Actor::new(self.nickname, self.username, self.hostname)
    }
}

fn is_space(c: char) -> bool {
    c == ' '
}

fn parse_ping(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing PING",
        preceded(tag("PING"), alt((eof, preceded(char(' '), rest)))),
    )(input)
}

fn parse_prefix(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing message prefix",
        preceded(char(':'), take_till1(is_space)),
    )(input)
}

fn parse_code(input: &str) -> ParseResult<&str, u16> {
    context(
        "parsing numeric code",
        map_res(
            take_while_m_n(3, 3, |c: char| c.is_ascii_digit()),
            |code: &str| code.parse::<u16>(),
        ),
    )(input)
}

/// Parse `:<sender> <NNN> <target>[ [:]<params>]`.
fn parse_numeric(input: &str) -> ParseResult<&str, Numeric<'_>> {
    let (input, sender) = parse_prefix(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, code) = parse_code(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, target) = context(
        "parsing numeric target",
        take_till1(|c: char| c == ' ' || c == ':'),
    )(input)?;
    let (input, params) = opt(preceded(char(' '), preceded(opt(char(':')), rest)))(input)?;

    Ok((
        input,
        Numeric {
            sender,
            code,
            target,
            params: params.unwrap_or(""),
        },
    ))
}

/// Parse `[:]<nick>!<user>@<host> <VERB>[ <params>]`.
fn parse_action(input: &str) -> ParseResult<&str, Action<'_>> {
    let (input, _) = opt(char(':'))(input)?;
    let (input, nickname) = context(
        "parsing nickname",
        take_till1(|c: char| c == ' ' || c == '!'),
    )(input)?;
    let (input, _) = char('!')(input)?;
    let (input, username) = context(
        "parsing username",
        take_till1(|c: char| c == ' ' || c == '@'),
    )(input)?;
    let (input, _) = char('@')(input)?;
    let (input, hostname) = context("parsing hostname", take_till1(is_space))(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, verb) = context("parsing verb", take_till1(is_space))(input)?;
    let (input, params) = opt(preceded(char(' '), rest))(input)?;

    Ok((
        input,
        Action {
            nickname,
            username,
            hostname,
            verb,
            params: params.unwrap_or(""),
        },
    ))
}

impl<'a> Line<'a> {
    /// Classify one line with its terminator already stripped.
    pub fn classify(line: &'a str) -> Self {
        if let Ok((_, token)) = parse_ping(line) {
            return Line::Ping { token };
        }
        if let Ok((_, numeric)) = all_consuming(parse_numeric)(line) {
            return Line::Numeric(numeric);
        }
        if let Ok((_, action)) = all_consuming(parse_action)(line) {
            return Line::Action(action);
        }
        Line::Unrecognized {
            sender: parse_prefix(line).ok().map(|(_, sender)| sender),
        }
    }

    /// The `:prefix` of a server-originated line.
    ///
    /// Action lines are sent on behalf of users and report `None`.
    pub fn server_sender(&self) -> Option<&'a str> {
        match self {
            Line::Numeric(numeric) => Some(numeric.sender),
            Line::Unrecognized { sender } => *sender,
            Line::Ping { .. } | Line::Action(_) => None,
        }
    }
}
