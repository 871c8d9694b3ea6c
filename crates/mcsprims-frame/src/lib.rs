//! MCS wire framing.
//!
//! The first frame in each direction is preceded by a single protocol
//! version byte. Every frame is then:
//! - A 1-byte message tag
//! - A base-128 varint payload length
//! - Exactly that many serialized payload bytes
//!
//! No partial reads, no buffer management in user code.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod error;
pub mod reader;
pub mod tag;
pub mod varint;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::McsCodec;
pub use codec::{
    decode_frame, encode_frame, Frame, FrameConfig, DEFAULT_MAX_PAYLOAD, LEGACY_MCS_VERSION,
    MCS_VERSION,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use tag::McsTag;
pub use writer::FrameWriter;
