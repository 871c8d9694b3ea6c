use mcsprims_frame::FrameError;

use crate::bind::ServiceError;
use crate::state::SessionState;

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] mcsprims_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The payload did not match its tag.
    #[error("protocol error: {0}")]
    Proto(#[from] mcsprims_proto::ProtoError),

    /// An application message was sent before the login response arrived.
    #[error("handshake incomplete: cannot send in state {0}")]
    HandshakeIncomplete(SessionState),

    /// The operation is not legal in the current session state.
    #[error("{operation} not allowed in state {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// The connection was built without a transport handle it can shut down.
    #[error("connection has no shutdown handle")]
    NoShutdownHandle,

    /// The registration service failed while binding an account.
    #[error("registration failed: {0}")]
    Registration(#[source] ServiceError),

    /// The login service failed while binding an account.
    #[error("auth token request failed: {0}")]
    Login(#[source] ServiceError),
}

impl SessionError {
    /// True when the peer closed the stream.
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, SessionError::Frame(FrameError::ConnectionClosed))
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
