use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("unknown sensor type: {0}")]
    UnknownSensorType(u8),

    #[error("truncated header at offset {offset}: expected 2 bytes, got {remaining}")]
    TruncatedHeader { offset: usize, remaining: usize },

    #[error("truncated payload for sensor type {type_id}: expected {expected} bytes, got {actual}")]
    TruncatedPayload {
        type_id: u8,
        expected: usize,
        actual: usize,
    },

    #[error("byte value overflow: {0}")]
    ByteValueOverflow(ByteOverflow),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("json serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Where a byte-range violation was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ByteOverflow {
    /// An input value at `index` does not fit in a single byte.
    #[error("value {value} at index {index} is outside 0..=255")]
    Value { index: usize, value: i64 },
    /// A component slice is wider than the accumulator can hold.
    #[error("component width of {width} bytes is outside 1..=8")]
    Width { width: usize },
}

pub type Result<T> = std::result::Result<T, PayloadError>;
