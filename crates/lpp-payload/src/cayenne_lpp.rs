//! Cayenne LPP (Low Power Payload) decoder.
//!
//! Each field of a payload is laid out as:
//! - 1 byte: channel number (0-255)
//! - 1 byte: sensor type id
//! - N bytes: sensor data, N fixed by the type (see [`crate::registry`])
//!
//! Fields are concatenated with no length prefix. A payload decodes only if
//! every field is complete and every type id is registered; the first problem
//! rejects the whole buffer.
//!
//! # References
//!
//! - [Cayenne LPP Specification](https://developers.mydevices.com/cayenne/docs/lora/)
//! - [OMA LwM2M Registry](http://openmobilealliance.org/wp/OMNA/LwM2M/LwM2MRegistry.html)

use crate::envelope::to_flat_map;
use crate::numeric::decode_scaled;
use crate::reading::{GeoLocation, SensorReading, SensorValue, Vector3};
use crate::registry::{Divisor, SensorType, SensorTypeRule, ValueLayout};
use crate::{PayloadDecoder, PayloadError, Result};
use serde_json::Value;
use tracing::{debug, instrument, warn};

const HEADER_SIZE: usize = 2;

/// Where the walker is within the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    ReadingHeader,
    ReadingPayload { channel: u8, sensor_type: SensorType },
    Done,
    Failed,
}

/// Walks a payload one field at a time.
///
/// Yields readings in wire order. After the first error the iterator is
/// exhausted.
pub struct Readings<'a> {
    bytes: &'a [u8],
    offset: usize,
    state: DecodeState,
}

impl<'a> Readings<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        let state = if bytes.is_empty() {
            DecodeState::Done
        } else {
            DecodeState::ReadingHeader
        };
        Self {
            bytes,
            offset: 0,
            state,
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn read_header(&mut self) -> Result<(u8, SensorType)> {
        if self.remaining() < HEADER_SIZE {
            return Err(PayloadError::TruncatedHeader {
                offset: self.offset,
                remaining: self.remaining(),
            });
        }

        let channel = self.bytes[self.offset];
        let type_id = self.bytes[self.offset + 1];
        let sensor_type = SensorType::try_from(type_id)?;
        self.offset += HEADER_SIZE;

        Ok((channel, sensor_type))
    }

    fn read_payload(&mut self, channel: u8, sensor_type: SensorType) -> Result<SensorReading> {
        let rule = sensor_type.rule();
        if self.remaining() < rule.byte_width {
            return Err(PayloadError::TruncatedPayload {
                type_id: rule.type_id,
                expected: rule.byte_width,
                actual: self.remaining(),
            });
        }

        let data = &self.bytes[self.offset..self.offset + rule.byte_width];
        let value = decode_value(sensor_type, rule, data)?;
        self.offset += rule.byte_width;

        debug!(
            channel,
            type_id = rule.type_id,
            name = rule.name,
            offset = self.offset,
            "decoded field"
        );

        Ok(SensorReading {
            channel,
            type_id: rule.type_id,
            name: rule.name.to_string(),
            value,
        })
    }

    fn step(&mut self) -> Option<Result<SensorReading>> {
        loop {
            match self.state {
                DecodeState::Done | DecodeState::Failed => return None,
                DecodeState::ReadingHeader => match self.read_header() {
                    Ok((channel, sensor_type)) => {
                        self.state = DecodeState::ReadingPayload {
                            channel,
                            sensor_type,
                        };
                    }
                    Err(e) => {
                        self.state = DecodeState::Failed;
                        return Some(Err(e));
                    }
                },
                DecodeState::ReadingPayload {
                    channel,
                    sensor_type,
                } => {
                    let result = self.read_payload(channel, sensor_type);
                    self.state = match &result {
                        Err(_) => DecodeState::Failed,
                        Ok(_) if self.remaining() == 0 => DecodeState::Done,
                        Ok(_) => DecodeState::ReadingHeader,
                    };
                    return Some(result);
                }
            }
        }
    }
}

impl Iterator for Readings<'_> {
    type Item = Result<SensorReading>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

impl std::iter::FusedIterator for Readings<'_> {}

fn scalar_divisor(rule: &SensorTypeRule) -> f64 {
    match rule.divisor {
        Divisor::Scalar(divisor) => divisor,
        Divisor::PerComponent([first, ..]) => first,
    }
}

fn component_divisors(rule: &SensorTypeRule) -> [f64; 3] {
    match rule.divisor {
        Divisor::Scalar(divisor) => [divisor; 3],
        Divisor::PerComponent(divisors) => divisors,
    }
}

fn decode_value(
    sensor_type: SensorType,
    rule: &SensorTypeRule,
    data: &[u8],
) -> Result<SensorValue> {
    let value = match sensor_type.layout() {
        ValueLayout::Scalar => {
            SensorValue::Scalar(decode_scaled(data, rule.signed, scalar_divisor(rule))?)
        }
        ValueLayout::Vector3 => {
            let [x, y, z] = decode_components(data, rule)?;
            SensorValue::Vector3(Vector3 { x, y, z })
        }
        ValueLayout::Location => {
            let [latitude, longitude, altitude] = decode_components(data, rule)?;
            SensorValue::Location(GeoLocation {
                latitude,
                longitude,
                altitude,
            })
        }
    };
    Ok(value)
}

/// Split `data` into three equal sub-slices and scale each by its divisor.
fn decode_components(data: &[u8], rule: &SensorTypeRule) -> Result<[f64; 3]> {
    let width = data.len() / 3;
    let divisors = component_divisors(rule);
    let mut components = [0.0; 3];
    for (i, chunk) in data.chunks_exact(width).enumerate() {
        components[i] = decode_scaled(chunk, rule.signed, divisors[i])?;
    }
    Ok(components)
}

/// Decode a payload into its readings, in wire order.
pub fn decode(bytes: &[u8]) -> Result<Vec<SensorReading>> {
    CayenneLppDecoder::new().decode_readings(bytes)
}

pub struct CayenneLppDecoder;

impl CayenneLppDecoder {
    pub fn new() -> Self {
        Self
    }

    #[instrument(name = "lpp_decode", skip(self, bytes), fields(payload_size = bytes.len()))]
    pub fn decode_readings(&self, bytes: &[u8]) -> Result<Vec<SensorReading>> {
        let readings = Readings::new(bytes)
            .collect::<Result<Vec<_>>>()
            .inspect_err(|e| warn!(error = %e, "rejected payload"))?;

        debug!(reading_count = readings.len(), "decoded payload");
        Ok(readings)
    }

    /// TTN-style entry point. The port does not influence decoding.
    pub fn decode_uplink(&self, bytes: &[u8], f_port: u8) -> Result<Value> {
        debug!(f_port, "decoding uplink");
        self.decode(bytes)
    }
}

impl Default for CayenneLppDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadDecoder for CayenneLppDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        // Result structure: {name_channel: value}
        let readings = self.decode_readings(bytes)?;
        Ok(Value::Object(to_flat_map(&readings)?))
    }
}
