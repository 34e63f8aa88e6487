//! Reader, writer and heartbeat tasks.

use std::io;
use std::sync::{Arc, Weak};
use std::time::Duration;

use encoding::Encoding;
use futures_util::{SinkExt, StreamExt};
use tokio::io::WriteHalf;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::trace;

use super::Shared;
use crate::error::LineError;
use crate::line::LineCodec;
use crate::transport::BoxedStream;

/// Dial, register, then feed received lines to the session until the
/// socket fails or the generation goes stale.
pub(super) async fn run(shared: Arc<Shared>, generation: u64) {
    let stream = match shared.connector.connect(&shared.identity).await {
        Ok(stream) => stream,
        Err(error) => return shared.connection_lost(generation, error),
    };

    let (read_half, write_half) = tokio::io::split(stream);
    let (tx, rx) = mpsc::unbounded_channel();
    {
        let mut inner = shared.inner.lock();
        if !inner.is_current(generation) {
            return;
        }
        inner.connecting_since = None;
        inner.writer = Some(tx);
        inner.session.connected();
        inner.flush();
    }
    tokio::spawn(write_loop(
        Arc::downgrade(&shared),
        generation,
        write_half,
        rx,
        shared.encoding,
    ));

    let mut lines = FramedRead::new(read_half, LineCodec::new(shared.encoding));
    while let Some(item) = lines.next().await {
        let mut inner = shared.inner.lock();
        if !inner.is_current(generation) {
            return;
        }
        match item {
            Ok(Ok(line)) => inner.session.handle_line(&line),
            Ok(Err(error)) => {
                let raw = match &error {
                    LineError::TooLong { head, .. } => head.clone(),
                    _ => String::new(),
                };
                inner.session.report_line_error(&raw, error);
            }
            Err(error) => {
                drop(inner);
                return shared.connection_lost(generation, error);
            }
        }
        inner.flush();
    }

    shared.connection_lost(
        generation,
        io::Error::new(io::ErrorKind::UnexpectedEof, "server closed the connection"),
    );
}

/// Write queued lines until the sender is dropped, then shut the socket.
async fn write_loop(
    shared: Weak<Shared>,
    generation: u64,
    write_half: WriteHalf<BoxedStream>,
    mut rx: mpsc::UnboundedReceiver<String>,
    encoding: &'static Encoding,
) {
    let mut sink = FramedWrite::new(write_half, LineCodec::new(encoding));
    while let Some(line) = rx.recv().await {
        if let Err(error) = sink.send(line).await {
            if let Some(shared) = shared.upgrade() {
                shared.connection_lost(generation, error);
            }
            return;
        }
    }
    if let Err(error) = sink.close().await {
        trace!(%error, "error shutting down writer");
    }
}

/// Tick every `period` until the connection is disposed or dropped.
pub(super) async fn heartbeat(shared: Weak<Shared>, period: Duration) {
    let period = period.max(Duration::from_millis(1));
    let mut ticker = time::interval_at(time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let Some(shared) = shared.upgrade() else {
            return;
        };
        if !shared.beat() {
            return;
        }
    }
}
