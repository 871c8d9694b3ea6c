use std::fmt;

use crate::error::{Result, SessionError};

/// Handshake progress of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No transport yet.
    Disconnected,
    /// Transport established, nothing sent.
    Connected,
    /// Login request sent; waiting for the server's version byte.
    AwaitingServerVersion,
    /// Server version accepted; waiting for the login response.
    AwaitingLoginAck,
    /// Login acknowledged. The only state that permits application sends.
    SteadyState,
    /// Terminal. Framing or transport failed and the session must be dropped.
    Errored,
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connected => "connected",
            SessionState::AwaitingServerVersion => "awaiting-server-version",
            SessionState::AwaitingLoginAck => "awaiting-login-ack",
            SessionState::SteadyState => "steady-state",
            SessionState::Errored => "errored",
        }
    }

    /// Whether application messages may be sent in this state.
    pub fn can_send(self) -> bool {
        self == SessionState::SteadyState
    }

    /// Whether frames may be read from the peer in this state.
    pub fn is_receiving(self) -> bool {
        matches!(
            self,
            SessionState::AwaitingServerVersion
                | SessionState::AwaitingLoginAck
                | SessionState::SteadyState
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Enforces the legal order of handshake events.
#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    state: SessionState,
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStateMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::Disconnected,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the login response has been received.
    pub fn handshake_complete(&self) -> bool {
        self.state.can_send()
    }

    pub fn transport_established(&mut self) -> Result<()> {
        self.advance(
            "transport_established",
            SessionState::Disconnected,
            SessionState::Connected,
        )
    }

    pub fn login_sent(&mut self) -> Result<()> {
        self.advance(
            "send_login_request",
            SessionState::Connected,
            SessionState::AwaitingServerVersion,
        )
    }

    pub fn version_accepted(&mut self) -> Result<()> {
        self.advance(
            "version_accepted",
            SessionState::AwaitingServerVersion,
            SessionState::AwaitingLoginAck,
        )
    }

    /// Record a login response. Repeated responses keep the session steady.
    pub fn login_acknowledged(&mut self) -> Result<()> {
        if self.state == SessionState::SteadyState {
            return Ok(());
        }
        self.advance(
            "login_acknowledged",
            SessionState::AwaitingLoginAck,
            SessionState::SteadyState,
        )
    }

    /// Enter the terminal state.
    pub fn fail(&mut self) {
        self.state = SessionState::Errored;
    }

    /// Fail unless application sends are allowed.
    pub fn ensure_can_send(&self) -> Result<()> {
        if self.handshake_complete() {
            Ok(())
        } else {
            Err(SessionError::HandshakeIncomplete(self.state))
        }
    }

    /// Fail unless the current state is `expected`.
    pub fn expect(&self, operation: &'static str, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn advance(
        &mut self,
        operation: &'static str,
        from: SessionState,
        to: SessionState,
    ) -> Result<()> {
        self.expect(operation, from)?;
        tracing::trace!(from = %from, to = %to, "session state transition");
        self.state = to;
        Ok(())
    }
}
