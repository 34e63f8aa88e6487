//! Benchmarks for line classification, mode parsing and dispatch.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slirc_engine::config::{ConnectParameters, ConnectionIdentity, UserIdentity};
use slirc_engine::{Command, Line, LineFramer, ListenerSet, ModeChangeSet, Session};

/// Simple PING line
const PING: &str = "PING :irc.example.com";

/// User action with a trailing parameter
const ACTION: &str = ":nick!user@host PRIVMSG #channel :Hello, world!";

/// Numeric reply
const NUMERIC: &str = ":irc.server.net 001 nickname :Welcome to the IRC Network nickname!user@host";

/// NAMES reply with sigils
const NAMES: &str = ":irc.server.net 353 nickname = #channel :@op1 @op2 %half +voice1 +voice2 plain1 plain2 plain3 plain4";

fn benchmark_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("Line Classification");

    for (name, line) in [
        ("ping", PING),
        ("action", ACTION),
        ("numeric", NUMERIC),
        ("unrecognized", "NOTICE AUTH :*** Looking up your hostname"),
    ] {
        group.bench_with_input(BenchmarkId::new("classify", name), line, |b, s| {
            b.iter(|| black_box(Line::classify(black_box(s))))
        });
    }

    group.finish();
}

fn benchmark_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Mode Parsing");

    for (name, modes) in [
        ("flags", "+nt"),
        ("mixed", "+o-v alice bob"),
        ("long", "+ooovvv-b+kl a b c d e f *!*@spam key 50"),
    ] {
        group.bench_with_input(BenchmarkId::new("parse", name), modes, |b, s| {
            b.iter(|| black_box(ModeChangeSet::parse(black_box(s))))
        });
    }

    group.finish();
}

fn benchmark_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Command Serialization");

    let privmsg = Command::PRIVMSG("#channel".into(), "Hello, world!".into());
    let kick = Command::KICK("#channel".into(), "spammer".into(), Some("bye".into()));

    group.bench_function("privmsg", |b| b.iter(|| black_box(black_box(&privmsg).to_string())));
    group.bench_function("kick", |b| b.iter(|| black_box(black_box(&kick).to_string())));

    group.finish();
}

fn benchmark_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Line Framing");

    let burst: Vec<u8> = [PING, ACTION, NUMERIC, NAMES]
        .iter()
        .cycle()
        .take(64)
        .flat_map(|line| format!("{}\r\n", line).into_bytes())
        .collect();

    group.bench_function("burst_64", |b| {
        b.iter(|| {
            let mut framer = LineFramer::new(encoding::UTF_8);
            framer.extend(black_box(&burst));
            let mut count = 0;
            while let Some(line) = framer.next_line() {
                black_box(line).ok();
                count += 1;
            }
            black_box(count)
        })
    });

    group.finish();
}

fn registered_session() -> Session {
    let user = UserIdentity {
        nickname: "nickname".into(),
        username: "user".into(),
        realname: "Real".into(),
        userhost: "*".into(),
    };
    let identity = ConnectionIdentity::new("irc.server.net", None, false);
    let mut session = Session::new(ConnectParameters::new(identity, user), ListenerSet::new());
    session.begin_connect();
    session.connected();
    session.handle_line(NUMERIC);
    session.handle_line(":nickname!user@host JOIN #channel");
    session.take_outbox();
    session
}

fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Session Dispatch");

    group.bench_function("names_reply", |b| {
        let mut session = registered_session();
        b.iter(|| session.handle_line(black_box(NAMES)))
    });

    group.bench_function("privmsg", |b| {
        let mut session = registered_session();
        b.iter(|| session.handle_line(black_box(ACTION)))
    });

    group.bench_function("mode_change", |b| {
        let mut session = registered_session();
        b.iter(|| session.handle_line(black_box(":op1!o@h MODE #channel +o-v voice1 voice1")))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_classification,
    benchmark_modes,
    benchmark_serialization,
    benchmark_framing,
    benchmark_dispatch,
);

criterion_main!(benches);
