//! TCP and TLS connector.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::{debug, warn};

use super::{BoxedStream, Connector};
use crate::config::ConnectionIdentity;

/// Dials servers over TCP, with TLS for `ircs` identities.
#[derive(Clone)]
pub struct TcpConnector {
    tls: Arc<ClientConfig>,
}

impl TcpConnector {
    /// Trust the bundled Mozilla root certificates.
    pub fn new() -> Self {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Self::with_tls_config(Arc::new(config))
    }

    pub fn with_tls_config(tls: Arc<ClientConfig>) -> Self {
        Self { tls }
    }

    fn enable_keepalive(stream: &TcpStream) -> io::Result<()> {
        use socket2::{SockRef, TcpKeepalive};

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for TcpConnector {
    fn connect(&self, identity: &ConnectionIdentity) -> BoxFuture<'static, io::Result<BoxedStream>> {
        let hostname = identity.hostname.clone();
        let port = identity.effective_port();
        let tls = identity.tls.then(|| TlsConnector::from(Arc::clone(&self.tls)));

        Box::pin(async move {
            let stream = TcpStream::connect((hostname.as_str(), port)).await?;
            if let Err(e) = Self::enable_keepalive(&stream) {
                warn!("failed to enable TCP keepalive: {}", e);
            }
            debug!(%hostname, port, tls = tls.is_some(), "socket connected");

            let Some(connector) = tls else {
                return Ok(Box::new(stream) as BoxedStream);
            };
            let server_name = ServerName::try_from(hostname)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let stream = connector.connect(server_name, stream).await?;
            Ok(Box::new(stream) as BoxedStream)
        })
    }
}
