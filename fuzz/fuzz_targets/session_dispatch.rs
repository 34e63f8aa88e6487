//! Fuzz target for session dispatch
//!
//! Every line a server could send goes through a registered session. Handling
//! must never panic, whatever the roster ends up looking like.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_engine::config::{ConnectParameters, ConnectionIdentity, UserIdentity};
use slirc_engine::{ListenerSet, Session};
use std::str;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = str::from_utf8(data) else {
        return;
    };

    let user = UserIdentity {
        nickname: "me".into(),
        username: "me".into(),
        realname: "me".into(),
        userhost: "*".into(),
    };
    let identity = ConnectionIdentity::new("irc.test", None, false);
    let mut session = Session::new(ConnectParameters::new(identity, user), ListenerSet::new());
    session.begin_connect();
    session.connected();
    session.handle_line(":irc.test 001 me :hi");
    session.handle_line(":me!me@host JOIN #c");

    for line in input.lines() {
        session.handle_line(line);
    }
    let _ = session.take_outbox();
});
