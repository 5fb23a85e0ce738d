pub mod cayenne_lpp;
pub mod envelope;
mod error;
pub mod input;
pub mod numeric;
pub mod reading;
pub mod registry;

pub use cayenne_lpp::{CayenneLppDecoder, Readings, decode};
pub use envelope::{to_fields_envelope, to_flat_map};
pub use error::{ByteOverflow, PayloadError, Result};
pub use input::{payload_from_hex, payload_from_json};
pub use reading::{GeoLocation, SensorReading, SensorValue, Vector3};
pub use registry::{Divisor, SensorType, SensorTypeRule, ValueLayout};

/// Trait for decoding binary payload formats to JSON
pub trait PayloadDecoder {
    /// Decode binary payload to JSON value
    fn decode(&self, bytes: &[u8]) -> Result<serde_json::Value>;
}
