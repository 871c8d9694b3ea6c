//! Byte-stream transport abstraction for MCS connections.
//!
//! The connection engine never negotiates encryption itself. It asks a
//! [`Connector`] for a connected [`McsStream`] and splits that stream into
//! a read half and a write half. TLS termination belongs to whoever
//! supplies the connector.

pub mod connector;
pub mod error;
pub mod stream;

pub use connector::{Connector, TcpConnector};
pub use error::{Result, TransportError};
pub use stream::McsStream;
