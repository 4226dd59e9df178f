//! Mirroring of entity logs to a remote collector.
//!
//! [`RemoteLoggerFactory`] opens one websocket per logger at
//! `<server-url>/log/<kind>/<entity-id>` before building the local logger.
//! If the connection cannot be established no local logger is created.
//! Each write is then sent as one frame carrying the caller's bytes
//! unchanged (text when they are valid UTF-8, binary otherwise) and appended
//! locally by the wrapped logger.

use std::fmt;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::PathBuf;

use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::stream::MaybeTlsStream;
use tokio_tungstenite::tungstenite::{self, Message, WebSocket};
use tracing::{debug, trace};

use crate::entry::LogSource;
use crate::error::{LogError, Result};
use crate::factory::{validate_entity_id, LocalLoggerFactory, LoggerFactory};
use crate::logger::{Logger, WriteOutcome};

/// Blocking websocket connection to the collector.
pub type WsConnection = WebSocket<MaybeTlsStream<TcpStream>>;

/// The kind of entity a log stream is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A workspace
    Workspace,
    /// A target environment
    Target,
    /// An image build
    Build,
}

impl EntityKind {
    /// Path segment used in the collector endpoint.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::Target => "target",
            Self::Build => "build",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a websocket URL from a server URL and an absolute path.
///
/// `http` and `https` schemes map to `ws` and `wss`.
#[must_use]
pub fn websocket_url(server_url: &str, path: &str) -> String {
    let base = server_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{base}{path}")
}

/// The outgoing half of a collector connection.
pub trait RemoteConnection: Send {
    /// Sends one text frame.
    fn send_text(&mut self, text: String) -> Result<()>;

    /// Sends one binary frame.
    fn send_binary(&mut self, data: Vec<u8>) -> Result<()>;

    /// Closes the connection.
    fn close(&mut self) -> Result<()>;
}

fn is_closed(err: &tungstenite::Error) -> bool {
    matches!(
        err,
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed
    )
}

impl<S: Read + Write + Send> RemoteConnection for WebSocket<S> {
    fn send_text(&mut self, text: String) -> Result<()> {
        self.send(Message::Text(text))
            .map_err(|e| LogError::Connection(format!("failed to send log frame: {e}")))
    }

    fn send_binary(&mut self, data: Vec<u8>) -> Result<()> {
        self.send(Message::Binary(data))
            .map_err(|e| LogError::Connection(format!("failed to send log frame: {e}")))
    }

    fn close(&mut self) -> Result<()> {
        match WebSocket::close(self, None).and_then(|()| self.flush()) {
            Ok(()) => Ok(()),
            Err(e) if is_closed(&e) => Ok(()),
            Err(e) => Err(LogError::Connection(format!("failed to close log stream: {e}"))),
        }
    }
}

/// A logger that mirrors every write to a remote collector.
pub struct RemoteLogger<L, C = WsConnection> {
    inner: L,
    conn: Option<C>,
}

impl<L: Logger, C: RemoteConnection> RemoteLogger<L, C> {
    /// Wraps `inner`, taking ownership of `conn`.
    pub fn new(inner: L, conn: C) -> Self {
        Self {
            inner,
            conn: Some(conn),
        }
    }

    /// The wrapped local logger.
    pub const fn inner(&self) -> &L {
        &self.inner
    }

    /// Returns true while the remote connection is held.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.conn.is_some()
    }
}

impl<L, C> fmt::Debug for RemoteLogger<L, C>
where
    L: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteLogger")
            .field("inner", &self.inner)
            .field("connected", &self.conn.is_some())
            .finish()
    }
}

impl<L: Logger, C: RemoteConnection> Logger for RemoteLogger<L, C> {
    fn append(&mut self, buf: &[u8]) -> WriteOutcome {
        if let Some(conn) = self.conn.as_mut() {
            let sent = match std::str::from_utf8(buf) {
                Ok(text) => conn.send_text(text.to_owned()),
                Err(_) => conn.send_binary(buf.to_vec()),
            };
            if let Err(err) = sent {
                return WriteOutcome::failed(buf.len(), err);
            }
        }
        self.inner.append(buf)
    }

    fn close(&mut self) -> Result<()> {
        let remote = match self.conn.take() {
            Some(mut conn) => conn.close(),
            None => Ok(()),
        };
        let local = self.inner.close();
        remote.and(local)
    }

    fn cleanup(&self) -> Result<()> {
        self.inner.cleanup()
    }

    fn log_path(&self) -> PathBuf {
        self.inner.log_path()
    }
}

/// Factory that pairs every local logger with a collector connection.
///
/// Reading logs back through this factory is not supported.
pub struct RemoteLoggerFactory {
    local: LocalLoggerFactory,
    server_url: String,
    api_key: String,
}

impl fmt::Debug for RemoteLoggerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteLoggerFactory")
            .field("local", &self.local)
            .field("server_url", &self.server_url)
            .finish_non_exhaustive()
    }
}

impl RemoteLoggerFactory {
    /// Creates a factory mirroring to `server_url`, authenticating with `api_key`.
    #[must_use]
    pub fn new(
        local: LocalLoggerFactory,
        server_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            local,
            server_url: server_url.into(),
            api_key: api_key.into(),
        }
    }

    /// The local factory backing each remote logger.
    #[must_use]
    pub const fn local(&self) -> &LocalLoggerFactory {
        &self.local
    }

    /// Collector endpoint for one entity.
    #[must_use]
    pub fn endpoint(&self, kind: EntityKind, entity_id: &str) -> String {
        websocket_url(&self.server_url, &format!("/log/{kind}/{entity_id}"))
    }

    fn connect(&self, kind: EntityKind, entity_id: &str) -> Result<WsConnection> {
        validate_entity_id(entity_id)?;
        let url = self.endpoint(kind, entity_id);

        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(|e| LogError::Connection(format!("invalid log endpoint {url}: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| LogError::Connection(format!("invalid API key: {e}")))?;
        request.headers_mut().insert(AUTHORIZATION, bearer);

        debug!(url = %url, %kind, "Connecting to log collector");
        let (conn, _response) = tungstenite::connect(request)
            .map_err(|e| LogError::Connection(format!("failed to connect to {url}: {e}")))?;
        trace!(url = %url, "Log collector connected");

        Ok(conn)
    }
}

impl LoggerFactory for RemoteLoggerFactory {
    fn create_workspace_logger(
        &self,
        workspace_id: &str,
        workspace_name: &str,
        source: LogSource,
    ) -> Result<Box<dyn Logger>> {
        let conn = self.connect(EntityKind::Workspace, workspace_id)?;
        let inner = self.local.workspace_logger(workspace_id, workspace_name, source)?;
        Ok(Box::new(RemoteLogger::new(inner, conn)))
    }

    fn create_target_logger(
        &self,
        target_id: &str,
        target_name: &str,
        source: LogSource,
    ) -> Result<Box<dyn Logger>> {
        let conn = self.connect(EntityKind::Target, target_id)?;
        let inner = self.local.target_logger(target_id, target_name, source)?;
        Ok(Box::new(RemoteLogger::new(inner, conn)))
    }

    fn create_build_logger(&self, build_id: &str, source: LogSource) -> Result<Box<dyn Logger>> {
        let conn = self.connect(EntityKind::Build, build_id)?;
        let inner = self.local.build_logger(build_id, source)?;
        Ok(Box::new(RemoteLogger::new(inner, conn)))
    }

    fn create_workspace_log_reader(&self, _workspace_id: &str) -> Result<Box<dyn Read + Send>> {
        Err(LogError::NotSupported("reading workspace logs from a remote logger factory"))
    }

    fn create_target_log_reader(&self, _target_id: &str) -> Result<Box<dyn Read + Send>> {
        Err(LogError::NotSupported("reading target logs from a remote logger factory"))
    }

    fn create_build_log_reader(&self, _build_id: &str) -> Result<Box<dyn Read + Send>> {
        Err(LogError::NotSupported("reading build logs from a remote logger factory"))
    }
}
