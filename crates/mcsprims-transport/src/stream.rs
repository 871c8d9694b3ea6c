use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};

use crate::error::Result;

/// A connected, bidirectional byte stream implementing Read + Write.
///
/// This is the fundamental I/O type handed to the connection engine.
/// TCP is the production transport; Unix stream pairs exist for local
/// loopback and tests.
pub struct McsStream {
    inner: McsStreamInner,
}

enum McsStreamInner {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
}

impl Read for McsStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            McsStreamInner::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            McsStreamInner::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for McsStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            McsStreamInner::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            McsStreamInner::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            McsStreamInner::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            McsStreamInner::Unix(stream) => stream.flush(),
        }
    }
}

impl McsStream {
    /// Wrap a connected TCP stream.
    pub fn from_tcp(stream: TcpStream) -> Self {
        Self {
            inner: McsStreamInner::Tcp(stream),
        }
    }

    /// Wrap a connected Unix domain socket stream.
    #[cfg(unix)]
    pub fn from_unix(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: McsStreamInner::Unix(stream),
        }
    }

    /// Create a connected pair of in-process streams.
    #[cfg(unix)]
    pub fn pair() -> Result<(Self, Self)> {
        let (left, right) = std::os::unix::net::UnixStream::pair()?;
        Ok((Self::from_unix(left), Self::from_unix(right)))
    }

    /// Try to clone this stream (creates a new file descriptor).
    ///
    /// Both handles refer to the same connection; the engine reads from one
    /// and writes to the other.
    pub fn try_clone(&self) -> Result<Self> {
        match &self.inner {
            McsStreamInner::Tcp(stream) => Ok(Self::from_tcp(stream.try_clone()?)),
            #[cfg(unix)]
            McsStreamInner::Unix(stream) => Ok(Self::from_unix(stream.try_clone()?)),
        }
    }

    /// Shut down both directions of the connection.
    ///
    /// A thread blocked reading any clone of this stream observes EOF.
    pub fn shutdown(&self) -> Result<()> {
        match &self.inner {
            McsStreamInner::Tcp(stream) => stream.shutdown(Shutdown::Both)?,
            #[cfg(unix)]
            McsStreamInner::Unix(stream) => stream.shutdown(Shutdown::Both)?,
        }
        tracing::debug!(stream = ?self, "transport shut down");
        Ok(())
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        match &self.inner {
            McsStreamInner::Tcp(_) => "tcp",
            #[cfg(unix)]
            McsStreamInner::Unix(_) => "unix",
        }
    }
}

impl std::fmt::Debug for McsStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            McsStreamInner::Tcp(stream) => f
                .debug_struct("McsStream")
                .field("type", &"tcp")
                .field("peer", &stream.peer_addr().ok())
                .finish(),
            #[cfg(unix)]
            McsStreamInner::Unix(_) => f.debug_struct("McsStream").field("type", &"unix").finish(),
        }
    }
}
