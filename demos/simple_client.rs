//! Simple IRC client example
//!
//! Loads settings from a TOML file (or uses built-in defaults), joins the
//! channel named by a URL and prints what happens there until Ctrl-C.
//!
//! ```text
//! RUST_LOG=slirc_engine=debug cargo run --example simple_client -- irc://irc.libera.chat/#rust settings.toml
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use slirc_engine::{
    Actor, ConnectionIdentity, EventListener, LineError, ModeChange, NumericError, Registry,
    Settings,
};

struct Printer;

impl EventListener for Printer {
    fn on_join(&self, conn: &ConnectionIdentity, who: &Actor, channel: &str) {
        println!("[{}] {} joined {}", conn.hostname, who, channel);
    }

    fn on_part(&self, conn: &ConnectionIdentity, who: &Actor, channel: &str) {
        println!("[{}] {} left {}", conn.hostname, who.nickname, channel);
    }

    fn on_quit(&self, conn: &ConnectionIdentity, who: &Actor, channel: &str, message: &str) {
        println!("[{}] {} quit {} ({})", conn.hostname, who.nickname, channel, message);
    }

    fn on_nick(&self, conn: &ConnectionIdentity, who: &Actor, channel: &str, new_nick: &str) {
        println!("[{}] {} is now {} in {}", conn.hostname, who.nickname, new_nick, channel);
    }

    fn on_mode_change(&self, conn: &ConnectionIdentity, op: &Actor, channel: &str, change: &ModeChange) {
        println!("[{}] {} sets {} on {}", conn.hostname, op.nickname, change, channel);
    }

    fn on_topic(&self, conn: &ConnectionIdentity, op: Option<&Actor>, channel: &str, topic: &str) {
        match op {
            Some(op) => println!("[{}] {} set the topic of {}: {}", conn.hostname, op.nickname, channel, topic),
            None => println!("[{}] topic of {}: {}", conn.hostname, channel, topic),
        }
    }

    fn on_privmsg(&self, conn: &ConnectionIdentity, who: &Actor, target: &str, message: &str) {
        println!("[{}] {} <{}> {}", conn.hostname, target, who.nickname, message);
    }

    fn on_nick_in_use(&self, conn: &ConnectionIdentity, nickname: &str) {
        println!("[{}] nickname {} is taken", conn.hostname, nickname);
    }

    fn on_numeric_error(&self, conn: &ConnectionIdentity, error: &NumericError) {
        println!("[{}] {} {}", conn.hostname, error.code(), error);
    }

    fn on_parse_error(&self, conn: &ConnectionIdentity, raw: &str, error: &LineError) {
        eprintln!("[{}] could not handle {:?}: {}", conn.hostname, raw, error);
    }

    fn on_connection_error(&self, conn: &ConnectionIdentity, error: &std::io::Error) {
        eprintln!("[{}] connection error: {}", conn.hostname, error);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| "irc://irc.libera.chat/#rust".to_string());
    let settings = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path))?;
            Settings::from_toml_str(&text).context("parsing settings")?
        }
        None => Settings::default(),
    };

    let registry = Registry::new(settings);
    registry.add_listener(Arc::new(Printer));
    registry.auto_connect()?;
    registry.join(&url).with_context(|| format!("joining {}", url))?;

    tokio::signal::ctrl_c().await?;
    registry.dispose();
    // Give the writer a moment to deliver QUIT.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    Ok(())
}
