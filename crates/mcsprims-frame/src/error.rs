/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The peer announced a protocol version we do not speak.
    #[error("unsupported MCS version {got} (expected {expected} or legacy {legacy})")]
    UnsupportedVersion { got: u8, expected: u8, legacy: u8 },

    /// The length prefix is not a valid 32-bit varint.
    #[error("malformed varint length prefix")]
    MalformedVarint,

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

impl FrameError {
    /// True when the error came from the transport rather than the peer's bytes.
    pub fn is_transport(&self) -> bool {
        matches!(self, FrameError::Io(_) | FrameError::ConnectionClosed)
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
