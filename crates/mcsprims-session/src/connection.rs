use std::convert::Infallible;
use std::io::{Read, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mcsprims_frame::{FrameReader, FrameWriter, McsTag};
use mcsprims_proto::{
    ApplicationMessage, DataMessageStanza, HeartbeatAck, LoginResponse, McsMessage,
    StreamErrorStanza, TaggedMessage,
};
use mcsprims_transport::{Connector, McsStream};
use prost::Message;
use tracing::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::login::{build_login_request, CheckinResult};
use crate::state::{SessionState, SessionStateMachine};

/// Callback invoked for every data message stanza, in wire order.
pub type DataMessageHandler = Box<dyn FnMut(&DataMessageStanza) + Send>;

struct Shared<W> {
    writer: Mutex<FrameWriter<W>>,
    machine: Mutex<SessionStateMachine>,
    /// Extra handle on the transport, used only for shutdown. Never behind
    /// the writer lock, so a write stalled on the peer cannot block close.
    closer: Option<McsStream>,
}

/// Write half of a connection.
///
/// Cloneable and shareable across threads. Every frame is written under one
/// lock, so frames from concurrent senders never interleave on the wire.
pub struct Sender<W> {
    shared: Arc<Shared<W>>,
}

impl<W> Clone for Sender<W> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<W: Write> Sender<W> {
    /// Current session state.
    pub fn state(&self) -> SessionState {
        lock(&self.shared.machine).state()
    }

    /// Encode and send one application message.
    ///
    /// Fails with [`SessionError::HandshakeIncomplete`] without writing
    /// anything unless the login response has been received. Only
    /// application records are accepted; the engine writes the login request
    /// and heartbeat acks itself.
    pub fn send<M: ApplicationMessage>(&self, message: &M) -> Result<()> {
        if let Err(err) = lock(&self.shared.machine).ensure_can_send() {
            error!(tag = %M::TAG, error = %err, "send rejected before handshake completed");
            return Err(err);
        }
        self.write_message(M::TAG, &message.encode_to_vec())
    }

    fn write_message(&self, tag: McsTag, payload: &[u8]) -> Result<()> {
        let result = lock(&self.shared.writer).send(tag.as_u8(), payload);
        match result {
            Ok(()) => {
                debug!(tag = %tag, size = payload.len(), "frame sent");
                Ok(())
            }
            Err(err) => {
                self.fail();
                Err(err.into())
            }
        }
    }

    fn transition(&self, f: impl FnOnce(&mut SessionStateMachine) -> Result<()>) -> Result<()> {
        f(&mut lock(&self.shared.machine))
    }

    fn fail(&self) {
        lock(&self.shared.machine).fail();
    }
}

impl<W> Sender<W> {
    /// Shut the transport down.
    ///
    /// A receive loop blocked on this connection returns with a
    /// connection-closed error and moves the session to errored. A send
    /// blocked on a stalled peer fails instead of holding up the caller.
    pub fn close(&self) -> Result<()> {
        let closer = self
            .shared
            .closer
            .as_ref()
            .ok_or(SessionError::NoShutdownHandle)?;
        closer.shutdown()?;
        info!("connection closed locally");
        Ok(())
    }
}

/// One MCS session over an exclusively owned transport.
///
/// The connection is the sole reader of the stream. Writes go through its
/// [`Sender`], which other threads may hold as well.
pub struct Connection<R, W> {
    reader: FrameReader<R>,
    sender: Sender<W>,
    handler: Option<DataMessageHandler>,
    config: SessionConfig,
}

impl Connection<McsStream, McsStream> {
    /// Open the transport and wrap it in frame adapters. Sends nothing.
    pub fn connect<C: Connector + ?Sized>(connector: &C, config: &SessionConfig) -> Result<Self> {
        let stream = connector.connect(&config.host, config.port)?;
        info!(
            host = %config.host,
            port = config.port,
            transport = stream.transport_name(),
            "mcs transport established"
        );
        Self::from_stream(stream, config)
    }

    /// Wrap a connected stream. The connection can be closed through any
    /// [`Sender`], even while another thread is blocked writing.
    pub fn from_stream(stream: McsStream, config: &SessionConfig) -> Result<Self> {
        let reader = stream.try_clone()?;
        let closer = stream.try_clone()?;
        Self::build(reader, stream, Some(closer), config)
    }
}

impl<R: Read, W: Write> Connection<R, W> {
    /// Build a connection from already-established stream halves.
    ///
    /// Such a connection has no shutdown handle; [`Sender::close`] fails
    /// with [`SessionError::NoShutdownHandle`].
    pub fn from_parts(reader: R, writer: W, config: &SessionConfig) -> Result<Self> {
        Self::build(reader, writer, None, config)
    }

    fn build(
        reader: R,
        writer: W,
        closer: Option<McsStream>,
        config: &SessionConfig,
    ) -> Result<Self> {
        let mut machine = SessionStateMachine::new();
        machine.transport_established()?;
        Ok(Self {
            reader: FrameReader::with_config(reader, config.frame.clone()),
            sender: Sender {
                shared: Arc::new(Shared {
                    writer: Mutex::new(FrameWriter::with_config(writer, config.frame.clone())),
                    machine: Mutex::new(machine),
                    closer,
                }),
            },
            handler: None,
            config: config.clone(),
        })
    }

    /// Register the data message callback, replacing any previous one.
    pub fn set_data_message_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&DataMessageStanza) + Send + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    /// A handle for sending from other threads.
    pub fn sender(&self) -> Sender<W> {
        self.sender.clone()
    }

    pub fn state(&self) -> SessionState {
        self.sender.state()
    }

    /// Version byte announced by the server, once received.
    pub fn server_version(&self) -> Option<u8> {
        self.reader.peer_version()
    }

    /// Send the login request as the first outgoing frame.
    pub fn send_login_request(&mut self, checkin: &CheckinResult) -> Result<()> {
        self.sender
            .transition(|m| m.expect("send_login_request", SessionState::Connected))?;

        let request = build_login_request(checkin, &self.config);
        info!(
            user = %request.user,
            device_id = request.device_id.as_deref().unwrap_or_default(),
            "sending login request"
        );
        self.sender
            .write_message(McsTag::LoginRequest, &request.encode_to_vec())?;
        self.sender.transition(SessionStateMachine::login_sent)
    }

    /// Send one application message. See [`Sender::send`].
    pub fn send<M: ApplicationMessage>(&self, message: &M) -> Result<()> {
        self.sender.send(message)
    }

    /// Read and dispatch frames until the transport closes or a fatal error
    /// occurs. Never returns `Ok`.
    pub fn run_receive_loop(&mut self) -> Result<Infallible> {
        loop {
            self.receive_one()?;
        }
    }

    /// Read, decode, and dispatch exactly one frame.
    ///
    /// Any error leaves the session in [`SessionState::Errored`].
    pub fn receive_one(&mut self) -> Result<McsMessage> {
        let state = self.state();
        if !state.is_receiving() {
            return Err(SessionError::InvalidState {
                operation: "receive",
                state,
            });
        }

        let result = self.receive_and_dispatch();
        if let Err(err) = &result {
            self.sender.fail();
            if err.is_connection_closed() {
                info!("mcs connection closed by peer");
            } else {
                warn!(error = %err, "mcs session failed");
            }
        }
        result
    }

    fn receive_and_dispatch(&mut self) -> Result<McsMessage> {
        let frame = self.reader.read_frame()?;
        if self.state() == SessionState::AwaitingServerVersion {
            self.sender.transition(SessionStateMachine::version_accepted)?;
            info!(version = ?self.reader.peer_version(), "server version accepted");
        }

        let message = McsMessage::from_frame(&frame)?;
        debug!(tag = %message.tag(), size = frame.payload.len(), "frame received");

        match &message {
            McsMessage::LoginResponse(response) => {
                self.sender
                    .transition(SessionStateMachine::login_acknowledged)?;
                log_login_response(response);
            }
            McsMessage::HeartbeatPing(_) => {
                let ack = HeartbeatAck::default();
                self.sender
                    .write_message(HeartbeatAck::TAG, &ack.encode_to_vec())?;
            }
            McsMessage::DataMessageStanza(stanza) => {
                if let Some(handler) = self.handler.as_mut() {
                    handler(stanza);
                }
            }
            McsMessage::StreamErrorStanza(stanza) => log_stream_error(stanza),
            McsMessage::HeartbeatAck(_)
            | McsMessage::IqStanza(_)
            | McsMessage::LoginRequest(_) => {}
        }

        Ok(message)
    }
}

fn log_login_response(response: &LoginResponse) {
    match &response.error {
        Some(err) => warn!(
            code = err.code,
            reason = err.message.as_deref().unwrap_or_default(),
            "login response carries an error"
        ),
        None => info!(
            stream_id = ?response.stream_id,
            server_timestamp = ?response.server_timestamp,
            "login acknowledged, handshake complete"
        ),
    }
}

fn log_stream_error(stanza: &StreamErrorStanza) {
    warn!(
        kind = %stanza.r#type,
        text = stanza.text.as_deref().unwrap_or_default(),
        "server sent stream error"
    );
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
