use std::sync::Arc;

use parking_lot::Mutex;

use super::*;
use crate::config::{ChannelSettings, UserIdentity};
use crate::response::NumericError;
use crate::roster::Sigil;

#[derive(Default)]
struct Recorder(Mutex<Vec<String>>);

impl Recorder {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock())
    }

    fn push(&self, event: String) {
        self.0.lock().push(event);
    }
}

impl EventListener for Recorder {
    fn on_join(&self, _: &ConnectionIdentity, who: &crate::prefix::Actor, channel: &str) {
        self.push(format!("join {} {}", who.nickname, channel));
    }
    fn on_part(&self, _: &ConnectionIdentity, who: &crate::prefix::Actor, channel: &str) {
        self.push(format!("part {} {}", who.nickname, channel));
    }
    fn on_quit(&self, _: &ConnectionIdentity, who: &crate::prefix::Actor, channel: &str, message: &str) {
        self.push(format!("quit {} {} {}", who.nickname, channel, message));
    }
    fn on_kick(
        &self,
        _: &ConnectionIdentity,
        op: &crate::prefix::Actor,
        channel: &str,
        target: &str,
        message: &str,
    ) {
        self.push(format!("kick {} {} {} {}", op.nickname, channel, target, message));
    }
    fn on_nick(&self, _: &ConnectionIdentity, who: &crate::prefix::Actor, channel: &str, new_nick: &str) {
        self.push(format!("nick {} {} {}", who.nickname, channel, new_nick));
    }
    fn on_mode_change(
        &self,
        _: &ConnectionIdentity,
        _: &crate::prefix::Actor,
        channel: &str,
        change: &ModeChange,
    ) {
        self.push(format!("mode {} {}", channel, change));
    }
    fn on_channel_mode_change(
        &self,
        _: &ConnectionIdentity,
        _: &crate::prefix::Actor,
        channel: &str,
        change: &ModeChange,
    ) {
        self.push(format!("chanmode {} {}", channel, change));
    }
    fn on_topic(
        &self,
        _: &ConnectionIdentity,
        op: Option<&crate::prefix::Actor>,
        channel: &str,
        topic: &str,
    ) {
        let by = op.map_or("-", |a| a.nickname.as_str());
        self.push(format!("topic {} {} {}", by, channel, topic));
    }
    fn on_privmsg(&self, _: &ConnectionIdentity, who: &crate::prefix::Actor, target: &str, message: &str) {
        self.push(format!("privmsg {} {} {}", who.nickname, target, message));
    }
    fn on_notice(&self, _: &ConnectionIdentity, who: &crate::prefix::Actor, target: &str, message: &str) {
        self.push(format!("notice {} {} {}", who.nickname, target, message));
    }
    fn on_invited(&self, _: &ConnectionIdentity, nickname: &str, channel: &str) {
        self.push(format!("invited {} {}", nickname, channel));
    }
    fn on_nick_in_use(&self, _: &ConnectionIdentity, nickname: &str) {
        self.push(format!("nick-in-use {}", nickname));
    }
    fn on_not_channel_op(&self, _: &ConnectionIdentity, channel: &str, message: &str) {
        self.push(format!("not-op {} {}", channel, message));
    }
    fn on_numeric_error(&self, _: &ConnectionIdentity, error: &NumericError) {
        self.push(format!("numeric-error {}", error.code()));
    }
    fn on_parse_error(&self, _: &ConnectionIdentity, raw: &str, _: &LineError) {
        self.push(format!("parse-error {}", raw));
    }
}

struct Harness {
    session: Session,
    events: Arc<Recorder>,
}

impl Harness {
    fn new() -> Self {
        Self::with(|_| {})
    }

    fn with(configure: impl FnOnce(&mut ConnectParameters)) -> Self {
        let user = UserIdentity {
            nickname: "foo".into(),
            username: "ident".into(),
            realname: "Real Name".into(),
            userhost: "*".into(),
        };
        let mut params =
            ConnectParameters::new(ConnectionIdentity::new("irc.example.net", None, false), user);
        configure(&mut params);

        let listeners = ListenerSet::new();
        let events = Arc::new(Recorder::default());
        listeners.add(events.clone());

        let mut session = Session::new(params, listeners);
        session.begin_connect();
        session.connected();
        Self { session, events }
    }

    /// Connected and registered as `foo`, with setup traffic discarded.
    fn registered() -> Self {
        let mut h = Self::new();
        h.feed(":irc.example.net 001 foo :Welcome");
        h.sent();
        h.events.take();
        h
    }

    fn feed(&mut self, line: &str) {
        self.session.handle_line(line);
    }

    fn sent(&mut self) -> Vec<String> {
        self.session
            .take_outbox()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn events(&self) -> Vec<String> {
        self.events
            .take()
            .into_iter()
            .filter(|e| !e.starts_with("numeric-error"))
            .collect()
    }

    fn members(&self, channel: &str) -> Vec<String> {
        self.session
            .whos_in(channel)
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

#[test]
fn test_registration_sequence() {
    let mut h = Harness::with(|p| p.password = Some("secret".into()));
    assert_eq!(
        h.sent(),
        vec!["PASS secret", "USER ident * * :Real Name", "NICK foo"]
    );
    assert_eq!(h.session.state(), ConnectionState::AwaitingWelcome);
    assert_eq!(h.session.last_tried_nickname(), "foo");
}

#[test]
fn test_ping_is_answered_and_not_forwarded() {
    let mut h = Harness::registered();
    h.feed("PING :irc.example.net");
    assert_eq!(h.sent(), vec!["PONG :irc.example.net"]);
    assert!(h.events().is_empty());
}

#[test]
fn test_welcome_joins_target_channels() {
    let mut h = Harness::with(|p| {
        p.channels = vec![
            ChannelSettings::new("#rust"),
            ChannelSettings::new("ops"),
            ChannelSettings {
                name: "#later".into(),
                auto_join: false,
                auto_rejoin: true,
            },
        ]
    });
    h.sent();
    h.feed(":irc.example.net 001 foo :Welcome");
    assert_eq!(h.session.state(), ConnectionState::Registered);
    assert_eq!(h.session.actual_nickname(), Some("foo"));
    assert_eq!(h.sent(), vec!["JOIN #rust", "JOIN #ops"]);
}

#[test]
fn test_server_ident_from_first_prefixed_line() {
    let mut h = Harness::new();
    h.feed("NOTICE AUTH :*** Looking up your hostname");
    assert_eq!(h.session.server_ident(), None);
    h.feed(":irc.example.net NOTICE * :*** Found your hostname");
    h.feed(":other.example.net 001 foo :Welcome");
    assert_eq!(h.session.server_ident(), Some("irc.example.net"));

    h.sent();
    h.session.heartbeat();
    assert_eq!(h.sent(), vec!["PING irc.example.net"]);
}

#[test]
fn test_nickname_in_use_before_registration_appends_underscores() {
    let mut h = Harness::new();
    h.sent();

    h.feed(":srv 433 * foo :Nickname is already in use");
    assert_eq!(h.sent(), vec!["NICK foo_"]);
    h.feed(":srv 433 * foo_ :Nickname is already in use");
    assert_eq!(h.sent(), vec!["NICK foo__"]);
    assert_eq!(h.session.actual_nickname(), None);

    h.feed(":srv 001 foo__ :Welcome");
    assert_eq!(h.session.actual_nickname(), Some("foo__"));
    assert!(h.events().is_empty());

    h.session.nick("bar");
    assert_eq!(h.sent(), vec!["NICK bar"]);
    h.feed(":srv 433 foo__ bar :Nickname is already in use");
    assert!(h.sent().is_empty());
    assert_eq!(h.events(), vec!["nick-in-use bar"]);
    assert_eq!(h.session.actual_nickname(), Some("foo__"));
}

#[test]
fn test_nickname_in_use_is_also_a_typed_error() {
    let mut h = Harness::registered();
    h.feed(":srv 433 foo bar :Nickname is already in use");
    assert_eq!(
        h.events.take(),
        vec!["nick-in-use foo", "numeric-error 433"]
    );
}

#[test]
fn test_numeric_target_sets_actual_nickname() {
    let mut h = Harness::registered();
    h.feed(":srv 376 foo2 :End of MOTD");
    assert_eq!(h.session.actual_nickname(), Some("foo2"));
    h.feed(":srv 020 * :Please wait");
    assert_eq!(h.session.actual_nickname(), Some("foo2"));
}

#[test]
fn test_self_join_resets_channel() {
    let mut h = Harness::registered();
    h.feed(":foo!ident@me.example JOIN #rust");
    h.feed(":srv 353 foo = #rust :@foo +bob carol");
    assert_eq!(h.members("#rust"), vec!["+bob", "carol", "@foo"]);

    h.feed(":foo!ident@me.example JOIN :#rust");
    assert_eq!(h.members("#rust"), vec!["foo"]);
    assert_eq!(h.events(), vec!["join foo #rust", "join foo #rust"]);
}

#[test]
fn test_other_join_only_touches_known_channels() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #rust");
    h.feed(":bob!b@bob.example JOIN #rust");
    h.feed(":bob!b@bob.example JOIN #unknown");
    assert_eq!(h.members("#rust"), vec!["bob", "foo"]);
    assert!(h.session.roster().channel("#unknown").is_none());
    assert_eq!(
        h.session.roster().user("bob").unwrap().hostname(),
        Some("bob.example")
    );
}

#[test]
fn test_join_then_part_leaves_no_member() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #rust");
    h.feed(":bob!b@h JOIN #rust");
    h.feed(":bob!b@h PART #rust");
    assert_eq!(h.members("#rust"), vec!["foo"]);

    h.feed(":foo!i@h PART #rust");
    assert!(h.session.roster().channel("#rust").is_none());
    assert_eq!(
        h.events(),
        vec![
            "join foo #rust",
            "join bob #rust",
            "part bob #rust",
            "part foo #rust"
        ]
    );
}

#[test]
fn test_names_strips_sigils_and_skips_unknown_channels() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #rust");
    h.feed(":srv 353 foo @ #rust :@op %half +voice plain");
    let roster = h.session.roster().channel("#rust").unwrap();
    assert_eq!(roster.member("op").unwrap().sigil, Sigil::Op);
    assert_eq!(roster.member("half").unwrap().sigil, Sigil::HalfOp);
    assert_eq!(roster.member("voice").unwrap().sigil, Sigil::Voice);
    assert_eq!(roster.member("plain").unwrap().sigil, Sigil::None);
    assert!(h.session.roster().user("half").is_some());

    h.feed(":srv 353 foo = #elsewhere :a b c");
    assert!(h.session.roster().channel("#elsewhere").is_none());
    assert!(h.session.roster().user("a").is_none());

    h.feed(":srv 366 foo #rust :End of /NAMES list.");
    assert!(h.events().iter().all(|e| !e.starts_with("parse-error")));
}

#[test]
fn test_nick_change_renames_everywhere() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #a");
    h.feed(":foo!i@h JOIN #b");
    h.feed(":srv 353 foo = #a :@bob");
    h.feed(":srv 353 foo = #b :bob");
    h.events();

    h.feed(":bob!b@h NICK :robert");
    assert_eq!(h.members("#a"), vec!["foo", "@robert"]);
    assert_eq!(h.members("#b"), vec!["foo", "robert"]);
    assert!(h.session.roster().user("robert").is_some());
    assert_eq!(h.events(), vec!["nick bob #a robert", "nick bob #b robert"]);

    h.feed(":foo!i@h NICK foo2");
    assert_eq!(h.session.actual_nickname(), Some("foo2"));
}

#[test]
fn test_quit_fires_once_per_channel() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #a");
    h.feed(":foo!i@h JOIN #b");
    h.feed(":foo!i@h JOIN #c");
    h.feed(":srv 353 foo = #a :bob");
    h.feed(":srv 353 foo = #b :bob");
    h.events();

    h.feed(":bob!b@h QUIT :Ping timeout");
    assert_eq!(
        h.events(),
        vec!["quit bob #a Ping timeout", "quit bob #b Ping timeout"]
    );
    assert_eq!(h.members("#a"), vec!["foo"]);
}

#[test]
fn test_quit_of_target_nickname_reclaims_it() {
    let mut h = Harness::new();
    h.sent();
    h.feed(":srv 433 * foo :in use");
    h.feed(":srv 001 foo_ :Welcome");
    h.sent();

    h.feed(":foo!x@elsewhere QUIT :bye");
    assert_eq!(h.sent(), vec!["NICK foo"]);

    h.feed(":someone!x@y QUIT :bye");
    assert!(h.sent().is_empty());
}

#[test]
fn test_kick_of_self_rejoins_by_default() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #rust");
    h.events();
    h.feed(":op!o@h KICK #rust foo :behave");
    assert!(h.session.roster().channel("#rust").is_none());
    assert_eq!(h.sent(), vec!["JOIN #rust"]);
    assert_eq!(h.events(), vec!["kick op #rust foo behave"]);
}

#[test]
fn test_kick_of_self_respects_rejoin_policy() {
    let mut h = Harness::with(|p| {
        p.channels = vec![ChannelSettings {
            name: "#strict".into(),
            auto_join: true,
            auto_rejoin: false,
        }]
    });
    h.feed(":srv 001 foo :Welcome");
    h.feed(":foo!i@h JOIN #strict");
    h.sent();

    h.feed(":op!o@h KICK #strict foo :out");
    assert!(h.sent().is_empty());
    assert_eq!(h.session.target_channels().count(), 0);
}

#[test]
fn test_kick_of_other_removes_member() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #rust");
    h.feed(":bob!b@h JOIN #rust");
    h.feed(":foo!i@h KICK #rust bob");
    assert_eq!(h.members("#rust"), vec!["foo"]);
    assert!(h.sent().is_empty());
}

#[test]
fn test_ctcp_version_to_self_is_answered() {
    let mut h = Harness::registered();
    h.feed(":bob!b@h PRIVMSG foo :\u{1}VERSION\u{1}");
    assert_eq!(h.sent(), vec![format!("NOTICE bob :{}", crate::command::VERSION_REPLY)]);
    assert!(h.events().is_empty());

    h.feed(":bob!b@h PRIVMSG #rust :\u{1}VERSION\u{1}");
    assert!(h.sent().is_empty());
    assert_eq!(h.events(), vec!["privmsg bob #rust \u{1}VERSION\u{1}"]);
}

#[test]
fn test_privmsg_and_notice_forwarded() {
    let mut h = Harness::registered();
    h.feed(":bob!b@h PRIVMSG #rust :hello: world");
    h.feed(":bob!b@h NOTICE foo :psst");
    assert_eq!(
        h.events(),
        vec!["privmsg bob #rust hello: world", "notice bob foo psst"]
    );
}

#[test]
fn test_mode_splits_user_and_channel_changes() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #rust");
    h.feed(":bob!b@h JOIN #rust");
    h.events();

    h.feed(":op!o@h MODE #rust +ov-m bob bob");
    assert_eq!(
        h.events(),
        vec!["mode #rust +o bob", "mode #rust +v bob", "chanmode #rust -m"]
    );
    assert_eq!(h.members("#rust"), vec!["@bob", "foo"]);

    h.feed(":op!o@h MODE #rust -o bob");
    assert_eq!(h.members("#rust"), vec!["bob", "foo"]);
}

#[test]
fn test_malformed_mode_is_isolated() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #rust");
    h.events();

    h.feed(":op!o@h MODE #rust +o");
    assert_eq!(h.events(), vec!["parse-error :op!o@h MODE #rust +o"]);

    h.feed(":bob!b@h PRIVMSG #rust :still alive");
    assert_eq!(h.events(), vec!["privmsg bob #rust still alive"]);
}

#[test]
fn test_missing_parameter_is_isolated() {
    let mut h = Harness::registered();
    h.feed(":bob!b@h JOIN");
    h.feed(":srv 482 foo");
    assert_eq!(
        h.events(),
        vec!["parse-error :bob!b@h JOIN", "parse-error :srv 482 foo"]
    );
}

#[test]
fn test_topic_events() {
    let mut h = Harness::registered();
    h.feed(":srv 332 foo #rust :Rust talk");
    h.feed(":srv 331 foo #rust :No topic is set");
    h.feed(":bob!b@h TOPIC #rust :new topic");
    assert_eq!(
        h.events(),
        vec![
            "topic - #rust Rust talk",
            "topic - #rust No topic is set",
            "topic bob #rust new topic"
        ]
    );
}

#[test]
fn test_invite_and_not_op() {
    let mut h = Harness::registered();
    h.feed(":srv 341 foo bob #rust");
    h.feed(":srv 482 foo #rust :You're not channel operator");
    assert_eq!(
        h.events(),
        vec!["invited bob #rust", "not-op #rust You're not channel operator"]
    );
}

#[test]
fn test_no_such_nick_falls_back_to_whowas() {
    let mut h = Harness::registered();
    h.feed(":srv 401 foo ghost :No such nick/channel");
    assert_eq!(h.sent(), vec!["WHOWAS ghost"]);

    h.session.ban("#rust", "ghost");
    h.sent();
    assert!(h.session.roster().user("ghost").is_some());
    h.feed(":srv 406 foo ghost :There was no such nickname");
    assert!(h.session.roster().user("ghost").is_none());
}

#[test]
fn test_ban_by_nickname_waits_for_whois() {
    let mut h = Harness::registered();
    h.session.ban("#rust", "bob");
    assert_eq!(h.sent(), vec!["WHOIS bob"]);

    h.feed(":srv 311 foo bob b bob.example * :Bob");
    assert_eq!(h.sent(), vec!["MODE #rust +b *!*@bob.example"]);

    h.feed(":srv 311 foo bob b bob.example * :Bob");
    assert!(h.sent().is_empty());
}

#[test]
fn test_ban_survives_nick_change_onto_pending_nickname() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #rust");
    h.feed(":bob!b@bob.example JOIN #rust");
    h.sent();
    h.session.ban("#rust", "rob");
    assert_eq!(h.sent(), vec!["WHOIS rob"]);

    h.feed(":bob!b@bob.example NICK rob");
    assert_eq!(h.members("#rust"), vec!["foo", "rob"]);
    h.feed(":srv 311 foo rob r rob.example * :Rob");
    assert_eq!(h.sent(), vec!["MODE #rust +b *!*@rob.example"]);
}

#[test]
fn test_quit_forgets_learned_hostname() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #rust");
    h.feed(":bob!b@bob.example JOIN #rust");
    h.feed(":bob!b@bob.example QUIT :later");
    h.sent();

    h.session.ban("#rust", "bob");
    assert_eq!(h.sent(), vec!["WHOIS bob"]);
    h.feed(":srv 311 foo bob b new.example * :Bob");
    assert_eq!(h.sent(), vec!["MODE #rust +b *!*@new.example"]);
}

#[test]
fn test_kick_ban_with_known_host_is_immediate() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #rust");
    h.feed(":bob!b@bob.example JOIN #rust");
    h.sent();

    h.session.kick_ban("#rust", "bob", Some("spam"));
    assert_eq!(
        h.sent(),
        vec!["MODE #rust +b *!*@bob.example", "KICK #rust bob :spam"]
    );

    h.session.kick_ban("#rust", "bob", Some(""));
    assert_eq!(h.sent(), vec!["MODE #rust +b *!*@bob.example"]);
}

#[test]
fn test_ban_and_unban_by_mask() {
    let mut h = Harness::registered();
    h.session.ban("#rust", "*!*@spam.example");
    h.session.unban("#rust", "bad!*@*");
    assert_eq!(
        h.sent(),
        vec!["MODE #rust +b *!*@spam.example", "MODE #rust -b bad!*@*"]
    );
}

#[test]
fn test_deferred_actions_fire_in_order_once() {
    let mut h = Harness::registered();
    h.session.kick_ban("#a", "bob", Some("bye"));
    h.session.unban("#b", "bob");
    assert_eq!(h.sent(), vec!["WHOIS bob", "WHOIS bob"]);

    h.feed(":srv 314 foo Bob b bob.example * :Bob");
    assert_eq!(
        h.sent(),
        vec![
            "MODE #a +b *!*@bob.example",
            "KICK #a bob :bye",
            "MODE #b -b *!*@bob.example"
        ]
    );
    assert_eq!(h.session.roster().user("bob").unwrap().pending(), 0);
}

#[test]
fn test_whois_for_unknown_user_is_ignored() {
    let mut h = Harness::registered();
    h.feed(":srv 311 foo stranger s s.example * :Who");
    assert!(h.session.roster().user("stranger").is_none());
}

#[test]
fn test_commands() {
    let mut h = Harness::registered();
    h.session.topic("#rust", None);
    h.session.topic("#rust", Some("all about crabs"));
    h.session.kick("#rust", "bob", None);
    h.session.kick("#rust", "bob", Some(""));
    h.session.kick("#rust", "bob", Some("bye"));
    h.session
        .change_modes("#rust", &ModeChangeSet::new().add('o', Some("bob")).remove('t', None));
    h.session.send_raw("AWAY :lunch");
    h.session.privmsg("#rust", "hi");
    assert_eq!(
        h.sent(),
        vec![
            "TOPIC #rust",
            "TOPIC #rust :all about crabs",
            "KICK #rust bob",
            "KICK #rust bob",
            "KICK #rust bob :bye",
            "MODE #rust +o bob",
            "MODE #rust -t",
            "AWAY :lunch",
            "PRIVMSG #rust :hi"
        ]
    );
}

#[test]
fn test_change_modes_keeps_interleaved_order() {
    let mut h = Harness::registered();
    let changes = ModeChangeSet::new()
        .add('o', Some("bob"))
        .remove('v', Some("carol"))
        .add('b', Some("*!*@spam.example"));
    h.session.change_modes("#rust", &changes);
    assert_eq!(
        h.sent(),
        vec![
            "MODE #rust +o bob",
            "MODE #rust -v carol",
            "MODE #rust +b *!*@spam.example"
        ]
    );
}

#[test]
fn test_join_and_part_before_registration_only_update_targets() {
    let mut h = Harness::new();
    h.sent();
    h.session.join("#a");
    h.session.join("#A");
    h.session.join("#b");
    h.session.part("#b");
    assert!(h.sent().is_empty());
    assert_eq!(h.session.target_channels().collect::<Vec<_>>(), vec!["#a"]);

    h.feed(":srv 001 foo :Welcome");
    assert_eq!(h.sent(), vec!["JOIN #a"]);

    h.session.join("#c");
    h.session.part("#a");
    assert_eq!(h.sent(), vec!["JOIN #c", "PART #a"]);
}

#[test]
fn test_reconnect_clears_per_connection_state() {
    let mut h = Harness::registered();
    h.feed(":foo!i@h JOIN #rust");
    h.session.join("#rust");

    h.session.disconnected();
    assert_eq!(h.session.state(), ConnectionState::Disconnected);
    h.session.privmsg("#rust", "lost");
    assert!(h.sent().is_empty());

    h.session.begin_connect();
    assert!(h.session.roster().channel("#rust").is_none());
    assert_eq!(h.session.actual_nickname(), None);
    assert_eq!(h.session.server_ident(), None);

    h.session.connected();
    h.sent();
    h.feed(":srv 001 foo :Welcome");
    assert_eq!(h.sent(), vec!["JOIN #rust"]);
}

#[test]
fn test_heartbeat_needs_connection_and_ident() {
    let mut h = Harness::new();
    h.sent();
    h.session.heartbeat();
    assert!(h.sent().is_empty());

    h.session.disconnected();
    h.feed(":srv NOTICE * :hi");
    h.session.heartbeat();
    assert!(h.sent().is_empty());
}

#[test]
fn test_unrecognized_lines_are_only_raw() {
    let mut h = Harness::registered();
    h.feed("ERROR :Closing link");
    h.feed(":bob!b@h AWAY :gone");
    assert!(h.events().is_empty());
    assert!(h.sent().is_empty());
}
