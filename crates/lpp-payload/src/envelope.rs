//! Reshape decoded readings into the JSON envelopes downstream consumers expect.

use crate::reading::SensorReading;
use crate::Result;
use serde_json::{Map, Value, json};

/// Flat `{"{name}_{channel}": value}` map.
///
/// When two readings share a key, the later one wins.
pub fn to_flat_map(readings: &[SensorReading]) -> Result<Map<String, Value>> {
    let mut result = Map::new();
    for reading in readings {
        result.insert(reading.field_name(), serde_json::to_value(reading.value)?);
    }
    Ok(result)
}

/// `{"fields": [{"channel", "type", "name", "value"}, ...]}` in wire order.
pub fn to_fields_envelope(readings: &[SensorReading]) -> Result<Value> {
    Ok(json!({ "fields": serde_json::to_value(readings)? }))
}
