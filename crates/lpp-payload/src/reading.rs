use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// Decoded physical value of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorValue {
    Scalar(f64),
    Vector3(Vector3),
    Location(GeoLocation),
}

impl SensorValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            SensorValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub channel: u8,
    #[serde(rename = "type")]
    pub type_id: u8,
    pub name: String,
    pub value: SensorValue,
}

impl SensorReading {
    /// Key used by the flat envelope, e.g. `temperature_3`.
    pub fn field_name(&self) -> String {
        format!("{}_{}", self.name, self.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_serializes_as_number() {
        let reading = SensorReading {
            channel: 1,
            type_id: 103,
            name: "temperature".to_string(),
            value: SensorValue::Scalar(27.2),
        };
        assert_eq!(
            serde_json::to_value(&reading).unwrap(),
            json!({"channel": 1, "type": 103, "name": "temperature", "value": 27.2})
        );
        assert_eq!(reading.field_name(), "temperature_1");
    }

    #[test]
    fn test_location_serializes_as_object() {
        let value = SensorValue::Location(GeoLocation {
            latitude: 42.3519,
            longitude: -87.9094,
            altitude: 10.0,
        });
        assert_eq!(
            serde_json::to_value(value).unwrap(),
            json!({"latitude": 42.3519, "longitude": -87.9094, "altitude": 10.0})
        );
        assert_eq!(value.as_scalar(), None);
    }

    #[test]
    fn test_deserialize_vector() {
        let value: SensorValue =
            serde_json::from_value(json!({"x": 1.0, "y": -0.5, "z": 0.0})).unwrap();
        assert_eq!(
            value,
            SensorValue::Vector3(Vector3 {
                x: 1.0,
                y: -0.5,
                z: 0.0
            })
        );
    }
}
