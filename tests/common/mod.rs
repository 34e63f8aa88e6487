//! Shared helpers for the async integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::StreamExt;
use parking_lot::Mutex;
use tokio::io::{AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::codec::{FramedRead, LinesCodec};

use slirc_engine::config::ChannelSettings;
use slirc_engine::transport::{BoxedStream, Connector};
use slirc_engine::{
    Actor, ConnectParameters, ConnectionIdentity, EventListener, LineError, NumericError,
    UserIdentity,
};

pub const WAIT: Duration = Duration::from_secs(5);

/// Hands the server end of every dialed in-memory pipe to the test.
pub struct DuplexConnector {
    servers: mpsc::UnboundedSender<FakeServer>,
    refuse: AtomicBool,
}

impl DuplexConnector {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<FakeServer>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connector = Arc::new(Self {
            servers: tx,
            refuse: AtomicBool::new(false),
        });
        (connector, rx)
    }

    /// Make every later dial fail with `ConnectionRefused`.
    pub fn refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }
}

impl Connector for DuplexConnector {
    fn connect(&self, _: &ConnectionIdentity) -> BoxFuture<'static, io::Result<BoxedStream>> {
        if self.refuse.load(Ordering::SeqCst) {
            return Box::pin(async { Err(io::Error::from(io::ErrorKind::ConnectionRefused)) });
        }
        let (client, server) = tokio::io::duplex(64 * 1024);
        let delivered = self.servers.send(FakeServer::new(server));
        Box::pin(async move {
            delivered.map_err(|_| io::Error::from(io::ErrorKind::ConnectionRefused))?;
            Ok(Box::new(client) as BoxedStream)
        })
    }
}

/// The server side of one dialed connection.
pub struct FakeServer {
    lines: FramedRead<ReadHalf<DuplexStream>, LinesCodec>,
    writer: WriteHalf<DuplexStream>,
}

impl FakeServer {
    fn new(stream: DuplexStream) -> Self {
        let (read, writer) = tokio::io::split(stream);
        Self {
            lines: FramedRead::new(read, LinesCodec::new()),
            writer,
        }
    }

    /// Next line the client wrote, without its terminator.
    pub async fn recv(&mut self) -> String {
        timeout(WAIT, self.lines.next())
            .await
            .expect("timed out waiting for a line")
            .expect("client closed the connection")
            .expect("undecodable line")
    }

    /// Read until the client closes, returning what it wrote on the way.
    pub async fn drain(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = timeout(WAIT, self.lines.next())
            .await
            .expect("timed out waiting for close")
        {
            lines.push(line.expect("undecodable line"));
        }
        lines
    }

    pub async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .expect("client went away");
    }

    pub async fn send_bytes(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.expect("client went away");
    }

    /// Consume registration and welcome the client as `nickname`.
    pub async fn register(&mut self, nickname: &str) {
        loop {
            if self.recv().await.starts_with("NICK ") {
                break;
            }
        }
        self.send(&format!(":irc.test 001 {} :Welcome", nickname)).await;
    }
}

pub async fn next_server(servers: &mut mpsc::UnboundedReceiver<FakeServer>) -> FakeServer {
    timeout(WAIT, servers.recv())
        .await
        .expect("timed out waiting for a dial")
        .expect("connector dropped")
}

pub fn identity() -> ConnectionIdentity {
    ConnectionIdentity::new("irc.test", None, false)
}

pub fn params() -> ConnectParameters {
    let user = UserIdentity {
        nickname: "ferris".into(),
        username: "crab".into(),
        realname: "Ferris".into(),
        userhost: "*".into(),
    };
    let mut params = ConnectParameters::new(identity(), user);
    params.channels.push(ChannelSettings::new("#rust"));
    params.heartbeat = Duration::from_secs(3600);
    params
}

/// Collects events as short strings.
#[derive(Default)]
pub struct Recorder(Mutex<Vec<String>>);

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Poll until an event satisfying `pred` shows up.
    pub async fn wait_for(&self, pred: impl Fn(&str) -> bool) -> String {
        timeout(WAIT, async {
            loop {
                if let Some(event) = self.0.lock().iter().find(|e| pred(e)) {
                    return event.clone();
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("timed out waiting for event")
    }

    fn push(&self, event: String) {
        self.0.lock().push(event);
    }
}

impl EventListener for Recorder {
    fn on_join(&self, _: &ConnectionIdentity, who: &Actor, channel: &str) {
        self.push(format!("join {} {}", who.nickname, channel));
    }

    fn on_privmsg(&self, _: &ConnectionIdentity, who: &Actor, target: &str, message: &str) {
        self.push(format!("privmsg {} {} {}", who.nickname, target, message));
    }

    fn on_nick_in_use(&self, _: &ConnectionIdentity, nickname: &str) {
        self.push(format!("nick-in-use {}", nickname));
    }

    fn on_numeric_error(&self, _: &ConnectionIdentity, error: &NumericError) {
        self.push(format!("numeric-error {}", error.code()));
    }

    fn on_parse_error(&self, _: &ConnectionIdentity, raw: &str, _: &LineError) {
        self.push(format!("parse-error {}", raw));
    }

    fn on_connection_error(&self, conn: &ConnectionIdentity, error: &io::Error) {
        self.push(format!("connection-error {} {:?}", conn.hostname, error.kind()));
    }
}
