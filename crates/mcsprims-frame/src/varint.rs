//! Base-128 varints for the frame length prefix.
//!
//! Seven payload bits per byte, least significant group first, high bit set
//! on every byte except the last.

use bytes::BufMut;

use crate::error::{FrameError, Result};

/// Longest encoding of a 32-bit value.
pub const MAX_VARINT32_LEN: usize = 5;

/// Append `value` as a varint.
pub fn put_varint32(mut value: u32, dst: &mut impl BufMut) {
    while value >= 0x80 {
        dst.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    dst.put_u8(value as u8);
}

/// Number of bytes `value` occupies once encoded.
pub fn varint32_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}

/// Parse a varint from the front of `src` without consuming it.
///
/// Returns `Ok(None)` if `src` ends before the varint terminates, and the
/// decoded value with its encoded length otherwise.
pub fn peek_varint32(src: &[u8]) -> Result<Option<(u32, usize)>> {
    let mut value: u64 = 0;
    for (i, &byte) in src.iter().take(MAX_VARINT32_LEN).enumerate() {
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            let value = u32::try_from(value).map_err(|_| FrameError::MalformedVarint)?;
            return Ok(Some((value, i + 1)));
        }
    }

    if src.len() >= MAX_VARINT32_LEN {
        return Err(FrameError::MalformedVarint);
    }
    Ok(None)
}
