use crate::error::ByteOverflow;
use crate::{PayloadError, Result};

/// Widest component the 64-bit accumulator can hold.
pub const MAX_COMPONENT_WIDTH: usize = 8;

/// Reconstruct a fixed-point value from a big-endian byte slice.
///
/// The bytes are assembled most-significant first into an unsigned integer of
/// `8 * bytes.len()` bits. When `signed` is set the pattern is reinterpreted
/// as two's complement of that width. The result is divided by `divisor`.
pub fn decode_scaled(bytes: &[u8], signed: bool, divisor: f64) -> Result<f64> {
    if bytes.is_empty() || bytes.len() > MAX_COMPONENT_WIDTH {
        return Err(PayloadError::ByteValueOverflow(ByteOverflow::Width {
            width: bytes.len(),
        }));
    }

    let raw = bytes
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));

    let value = if signed {
        let edge = 1i128 << (8 * bytes.len());
        let max = (edge - 1) >> 1;
        let raw = i128::from(raw);
        if raw > max { raw - edge } else { raw }
    } else {
        i128::from(raw)
    };

    Ok(value as f64 / divisor)
}
