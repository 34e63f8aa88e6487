//! Property-based tests for roster tracking and line framing.
//!
//! Uses proptest to verify that:
//! 1. Channel membership after any JOIN/PART/KICK/QUIT sequence matches a
//!    simple set model applied in arrival order
//! 2. NAMES replies store bare nicknames with their sigils
//! 3. The framer yields the same lines however the bytes are chunked

use std::collections::BTreeSet;

use proptest::prelude::*;
use slirc_engine::config::{ConnectParameters, ConnectionIdentity, UserIdentity};
use slirc_engine::{irc_to_lower, LineFramer, ListenerSet, Session, Sigil};

// =============================================================================
// STRATEGIES
// =============================================================================

const NICKS: &[&str] = &["alice", "Bob", "carol", "dave[m]", "eve"];

#[derive(Clone, Debug)]
enum Event {
    Join(usize),
    Part(usize),
    Kick(usize),
    Quit(usize),
}

fn event_strategy() -> impl Strategy<Value = Event> {
    let nick = 0..NICKS.len();
    prop_oneof![
        nick.clone().prop_map(Event::Join),
        nick.clone().prop_map(Event::Part),
        nick.clone().prop_map(Event::Kick),
        nick.prop_map(Event::Quit),
    ]
}

fn sigil_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(""), Just("+"), Just("%"), Just("@")]
}

/// Printable text without terminators.
fn line_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{1,120}").expect("valid regex")
}

// =============================================================================
// HELPERS
// =============================================================================

/// A session registered as `me` that has joined `#c`.
fn session_in_channel() -> Session {
    let user = UserIdentity {
        nickname: "me".into(),
        username: "me".into(),
        realname: "Me".into(),
        userhost: "*".into(),
    };
    let identity = ConnectionIdentity::new("irc.test", None, false);
    let mut session = Session::new(ConnectParameters::new(identity, user), ListenerSet::new());
    session.begin_connect();
    session.connected();
    session.handle_line(":irc.test 001 me :Welcome");
    session.handle_line(":me!me@host JOIN #c");
    session.take_outbox();
    session
}

fn members(session: &Session) -> BTreeSet<String> {
    session
        .whos_in("#c")
        .into_iter()
        .map(|m| irc_to_lower(&m.nickname))
        .collect()
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn membership_follows_event_order(events in prop::collection::vec(event_strategy(), 0..60)) {
        let mut session = session_in_channel();
        let mut model: BTreeSet<String> = BTreeSet::from(["me".to_string()]);

        for event in &events {
            match *event {
                Event::Join(i) => {
                    session.handle_line(&format!(":{}!u@h JOIN #c", NICKS[i]));
                    model.insert(irc_to_lower(NICKS[i]));
                }
                Event::Part(i) => {
                    session.handle_line(&format!(":{}!u@h PART #c", NICKS[i]));
                    model.remove(&irc_to_lower(NICKS[i]));
                }
                Event::Kick(i) => {
                    session.handle_line(&format!(":me!me@host KICK #c {} :out", NICKS[i]));
                    model.remove(&irc_to_lower(NICKS[i]));
                }
                Event::Quit(i) => {
                    session.handle_line(&format!(":{}!u@h QUIT :bye", NICKS[i]));
                    model.remove(&irc_to_lower(NICKS[i]));
                }
            }
            prop_assert_eq!(members(&session), model.clone());
        }

        // No duplicate entries under any spelling.
        prop_assert_eq!(session.whos_in("#C").len(), model.len());
    }

    #[test]
    fn names_reply_strips_sigils(
        entries in prop::collection::btree_map(0..NICKS.len(), sigil_strategy(), 1..=5),
    ) {
        let mut session = session_in_channel();
        let listing: Vec<String> = entries
            .iter()
            .map(|(&i, sigil)| format!("{}{}", sigil, NICKS[i]))
            .collect();
        session.handle_line(&format!(":irc.test 353 me = #c :{}", listing.join(" ")));

        for (&i, sigil) in &entries {
            let member = session
                .whos_in("#c")
                .into_iter()
                .find(|m| m.nickname == NICKS[i]);
            prop_assert!(member.is_some(), "{} missing", NICKS[i]);
            let expected = sigil.chars().next().and_then(Sigil::from_char).unwrap_or(Sigil::None);
            prop_assert_eq!(member.map(|m| m.sigil), Some(expected));
        }
        prop_assert_eq!(session.whos_in("#c").len(), entries.len() + 1);
    }

    #[test]
    fn framing_ignores_chunk_boundaries(
        lines in prop::collection::vec(line_strategy(), 1..20),
        crlf in any::<bool>(),
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let terminator = if crlf { "\r\n" } else { "\n" };
        let wire: Vec<u8> = lines
            .iter()
            .flat_map(|l| format!("{}{}", l, terminator).into_bytes())
            .collect();

        let mut offsets: Vec<usize> = cuts.iter().map(|c| c.index(wire.len())).collect();
        offsets.push(wire.len());
        offsets.sort_unstable();

        let mut framer = LineFramer::new(encoding::UTF_8);
        let mut received = Vec::new();
        let mut start = 0;
        for end in offsets {
            framer.extend(&wire[start..end]);
            start = end;
            while let Some(line) = framer.next_line() {
                received.push(line.expect("short lines never fail"));
            }
        }

        prop_assert_eq!(received, lines);
        prop_assert_eq!(framer.pending(), 0);
    }
}
