use std::net::TcpStream;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::stream::McsStream;

/// Establishes the byte stream a connection runs over.
///
/// Implementations own everything below the framing layer: DNS, TCP,
/// and any TLS session with certificate validation.
pub trait Connector {
    /// Connect to `host:port` and return a ready stream (blocking).
    fn connect(&self, host: &str, port: u16) -> Result<McsStream>;
}

/// Plain TCP connector.
///
/// Suitable for TLS-terminating proxies and local test servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector {
    /// Disable Nagle's algorithm on the connected socket.
    pub nodelay: bool,
}

impl TcpConnector {
    /// Create a connector with `TCP_NODELAY` enabled.
    pub fn new() -> Self {
        Self { nodelay: true }
    }
}

impl Connector for TcpConnector {
    fn connect(&self, host: &str, port: u16) -> Result<McsStream> {
        let stream = TcpStream::connect((host, port)).map_err(|e| TransportError::Connect {
            host: host.to_string(),
            port,
            source: e,
        })?;
        if self.nodelay {
            stream.set_nodelay(true)?;
        }
        debug!(host, port, "connected over tcp");
        Ok(McsStream::from_tcp(stream))
    }
}
