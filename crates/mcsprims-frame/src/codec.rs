use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::varint::{peek_varint32, put_varint32, varint32_len};

/// Protocol version byte sent ahead of the first outgoing frame.
pub const MCS_VERSION: u8 = 41;

/// Older server version still accepted on the first incoming frame.
pub const LEGACY_MCS_VERSION: u8 = 38;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// One tagged, length-delimited unit of the wire protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw message tag. Unknown values are kept so the registry can reject them.
    pub tag: u8,
    /// The serialized message payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(tag: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            tag,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (tag + varint + payload).
    pub fn wire_size(&self) -> usize {
        1 + varint32_len(self.payload.len() as u32) + self.payload.len()
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬────────────────┬─────────────────┐
/// │ Tag (1B) │ Length         │ Payload          │
/// │          │ (varint, 1-5B) │ (Length bytes)   │
/// └──────────┴────────────────┴─────────────────┘
/// ```
///
/// The version byte that precedes the first frame is the writer's concern.
pub fn encode_frame(tag: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: payload.len(),
        max: u32::MAX as usize,
    })?;
    dst.reserve(1 + varint32_len(len) + payload.len());
    dst.put_u8(tag);
    put_varint32(len, dst);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes exactly the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Frame>> {
    if src.is_empty() {
        return Ok(None);
    }

    let Some((len, prefix_len)) = peek_varint32(&src[1..])? else {
        return Ok(None);
    };
    let payload_len = len as usize;

    if payload_len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    let header = 1 + prefix_len;
    if src.len() < header + payload_len {
        src.reserve(header + payload_len - src.len());
        return Ok(None);
    }

    let tag = src[0];
    src.advance(header);
    let payload = src.split_to(payload_len).freeze();

    Ok(Some(Frame { tag, payload }))
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Version byte written before the first outgoing frame.
    pub protocol_version: u8,
    /// The single older version tolerated on the first incoming frame.
    pub legacy_version: u8,
}

impl FrameConfig {
    /// Validate the version byte announced by the peer.
    pub fn check_version(&self, version: u8) -> Result<()> {
        if version == self.protocol_version || version == self.legacy_version {
            Ok(())
        } else {
            Err(FrameError::UnsupportedVersion {
                got: version,
                expected: self.protocol_version,
                legacy: self.legacy_version,
            })
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            protocol_version: MCS_VERSION,
            legacy_version: LEGACY_MCS_VERSION,
        }
    }
}
