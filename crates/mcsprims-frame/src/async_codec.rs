use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_frame, encode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};

/// `tokio_util` codec applying the same wire rules as
/// [`FrameReader`](crate::FrameReader) and [`FrameWriter`](crate::FrameWriter).
#[derive(Debug, Clone, Default)]
pub struct McsCodec {
    config: FrameConfig,
    peer_version: Option<u8>,
    version_sent: bool,
}

impl McsCodec {
    /// Create a codec with explicit configuration.
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            peer_version: None,
            version_sent: false,
        }
    }

    /// The version byte the peer announced, once seen.
    pub fn peer_version(&self) -> Option<u8> {
        self.peer_version
    }
}

impl Decoder for McsCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        if self.peer_version.is_none() {
            let Some(&version) = src.first() else {
                return Ok(None);
            };
            self.config.check_version(version)?;
            src.advance(1);
            self.peer_version = Some(version);
        }
        decode_frame(src, self.config.max_payload_size)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(FrameError::ConnectionClosed),
        }
    }
}

impl Encoder<Frame> for McsCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<()> {
        if item.payload.len() > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: item.payload.len(),
                max: self.config.max_payload_size,
            });
        }
        if !self.version_sent {
            dst.put_u8(self.config.protocol_version);
            self.version_sent = true;
        }
        encode_frame(item.tag, &item.payload, dst)
    }
}
