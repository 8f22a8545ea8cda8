//! Angle datagram format.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ angle, radians (8 bytes)     │
//! │ IEEE-754 binary64, LE        │
//! └──────────────────────────────┘
//! ```
//!
//! No header, no sequence number, no checksum.

/// Size of one angle datagram.
pub const ANGLE_DATAGRAM_LEN: usize = 8;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    #[error("datagram too short: {len} bytes (need {ANGLE_DATAGRAM_LEN})")]
    TooShort { len: usize },
}

#[inline]
pub fn encode_angle(radians: f64) -> [u8; ANGLE_DATAGRAM_LEN] {
    radians.to_le_bytes()
}

/// Decode the angle from the first 8 bytes. Trailing bytes are ignored.
pub fn decode_angle(payload: &[u8]) -> Result<f64, WireError> {
    let Some(head) = payload.first_chunk::<ANGLE_DATAGRAM_LEN>() else {
        return Err(WireError::TooShort { len: payload.len() });
    };
    Ok(f64::from_le_bytes(*head))
}
