//! The set of live connections, keyed by server identity.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::config::{ConnectionIdentity, Settings};
use crate::connection::Connection;
use crate::error::{EngineError, Result};
use crate::event::{EventListener, ListenerSet};
use crate::transport::{Connector, TcpConnector};

/// Owns one [`Connection`] per server and routes channel requests to them.
///
/// Every connection shares the registry's listener set, so a listener added
/// here observes all servers.
pub struct Registry {
    settings: Settings,
    listeners: ListenerSet,
    connector: Arc<dyn Connector>,
    connections: Mutex<HashMap<ConnectionIdentity, Connection>>,
    selected: Mutex<Option<ConnectionIdentity>>,
}

impl Registry {
    /// A registry that dials real servers.
    pub fn new(settings: Settings) -> Self {
        Self::with_connector(settings, Arc::new(TcpConnector::default()))
    }

    pub fn with_connector(settings: Settings, connector: Arc<dyn Connector>) -> Self {
        Self {
            settings,
            listeners: ListenerSet::new(),
            connector,
            connections: Mutex::new(HashMap::new()),
            selected: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }

    pub fn add_listener(&self, listener: Arc<dyn EventListener>) {
        self.listeners.add(listener);
    }

    /// The connection for `identity`, creating and dialing it if needed.
    pub fn connect(&self, identity: &ConnectionIdentity) -> Result<Connection> {
        let mut connections = self.connections.lock();
        if let Some(existing) = connections.get(identity) {
            return Ok(existing.clone());
        }

        let params = self.settings.connect_parameters(identity)?;
        debug!(server = %identity, nickname = %params.user.nickname, "creating connection");
        let connection = Connection::new(params, self.listeners.clone(), Arc::clone(&self.connector));
        connections.insert(identity.clone(), connection.clone());
        Ok(connection)
    }

    /// Connect to the server named by an `irc://` or `ircs://` URL.
    pub fn connect_url(&self, url: &str) -> Result<Connection> {
        let (identity, _) = ConnectionIdentity::parse_url(url)?;
        self.connect(&identity)
    }

    /// Connect to every server marked `auto_connect`.
    pub fn auto_connect(&self) -> Result<Vec<Connection>> {
        self.settings
            .auto_connect()?
            .iter()
            .map(|identity| self.connect(identity))
            .collect()
    }

    pub fn connection(&self, identity: &ConnectionIdentity) -> Option<Connection> {
        self.connections.lock().get(identity).cloned()
    }

    pub fn connections(&self) -> Vec<Connection> {
        self.connections.lock().values().cloned().collect()
    }

    /// Route bare channel names to `identity`.
    pub fn select(&self, identity: &ConnectionIdentity) -> Result<()> {
        if !self.connections.lock().contains_key(identity) {
            return Err(EngineError::NotConnected(identity.to_string()));
        }
        *self.selected.lock() = Some(identity.clone());
        Ok(())
    }

    pub fn selected(&self) -> Option<Connection> {
        let identity = self.selected.lock().clone()?;
        self.connection(&identity)
    }

    /// Join a channel given as a full URL or, with a connection selected, a
    /// bare name. A URL connects to its server first if needed.
    pub fn join(&self, target: &str) -> Result<()> {
        let (connection, channel) = self.resolve(target, true)?;
        connection.join(&channel)
    }

    /// Leave a channel given as a full URL or a bare name.
    pub fn part(&self, target: &str) -> Result<()> {
        let (connection, channel) = self.resolve(target, false)?;
        connection.part(&channel)
    }

    fn resolve(&self, target: &str, connect: bool) -> Result<(Connection, String)> {
        if target.contains("://") {
            let (identity, channel) = ConnectionIdentity::parse_url(target)?;
            let channel = channel.ok_or_else(|| EngineError::MissingChannel(target.to_string()))?;
            let connection = if connect {
                self.connect(&identity)?
            } else {
                self.connection(&identity)
                    .ok_or_else(|| EngineError::NotConnected(identity.to_string()))?
            };
            return Ok((connection, channel));
        }

        let identity = self
            .selected
            .lock()
            .clone()
            .ok_or(EngineError::NoSelectedConnection)?;
        let connection = self
            .connection(&identity)
            .ok_or_else(|| EngineError::NotConnected(identity.to_string()))?;
        Ok((connection, target.to_string()))
    }

    /// Dispose the connection for `identity`. Returns whether one existed.
    pub fn disconnect(&self, identity: &ConnectionIdentity) -> bool {
        let removed = self.connections.lock().remove(identity);
        let mut selected = self.selected.lock();
        if selected.as_ref() == Some(identity) {
            *selected = None;
        }
        drop(selected);

        match removed {
            Some(connection) => {
                connection.dispose();
                true
            }
            None => false,
        }
    }

    /// Dispose every connection.
    pub fn dispose(&self) {
        let connections: Vec<_> = self.connections.lock().drain().map(|(_, c)| c).collect();
        *self.selected.lock() = None;
        for connection in connections {
            connection.dispose();
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("connections", &self.connections.lock().len())
            .field("selected", &*self.selected.lock())
            .finish()
    }
}
