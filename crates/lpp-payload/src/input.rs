//! Turn textual uplink representations into a byte buffer.
//!
//! Network servers hand payloads over either as a JSON array of numbers or as
//! a hex string. Each array element must fit in a byte; anything else is
//! rejected rather than truncated.

use crate::error::ByteOverflow;
use crate::{PayloadError, Result};
use serde_json::Value;

/// Parse a hex string such as `"01 67 01 10"` or `"0x01670110"`.
pub fn payload_from_hex(text: &str) -> Result<Vec<u8>> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let compact: String = digits.chars().filter(|c| !c.is_whitespace()).collect();

    hex::decode(&compact).map_err(|e| PayloadError::InvalidPayload(format!("bad hex: {}", e)))
}

/// Accept either a JSON array of byte values or a hex string.
pub fn payload_from_json(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| byte_at(index, item))
            .collect(),
        Value::String(text) => payload_from_hex(text),
        other => Err(PayloadError::InvalidPayload(format!(
            "expected byte array or hex string, got {}",
            other
        ))),
    }
}

fn byte_at(index: usize, item: &Value) -> Result<u8> {
    let Some(value) = item.as_i64() else {
        if let Some(value) = item.as_u64() {
            return Err(PayloadError::ByteValueOverflow(ByteOverflow::Value {
                index,
                value: i64::try_from(value).unwrap_or(i64::MAX),
            }));
        }
        return Err(PayloadError::InvalidPayload(format!(
            "element {} is not an integer: {}",
            index, item
        )));
    };

    u8::try_from(value)
        .map_err(|_| PayloadError::ByteValueOverflow(ByteOverflow::Value { index, value }))
}
