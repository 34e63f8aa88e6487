//! Byte-stream transports.
//!
//! A [`Connector`] opens the stream a connection reads and writes. The
//! default [`TcpConnector`] dials TCP and wraps it in TLS when the identity
//! asks for it; tests substitute an in-memory connector.

mod tcp;

use std::io;

use futures_util::future::BoxFuture;
use tokio::io::{AsyncRead, AsyncWrite};

pub use self::tcp::TcpConnector;

use crate::config::ConnectionIdentity;

/// A bidirectional byte stream.
pub trait AsyncStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> AsyncStream for T {}

/// An owned, type-erased stream.
pub type BoxedStream = Box<dyn AsyncStream>;

/// Opens streams to servers.
pub trait Connector: Send + Sync + 'static {
    fn connect(&self, identity: &ConnectionIdentity) -> BoxFuture<'static, io::Result<BoxedStream>>;
}

/// Whether an I/O error means the peer went away, as opposed to a failure
/// to reach it at all.
pub fn is_reset(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
    )
}
