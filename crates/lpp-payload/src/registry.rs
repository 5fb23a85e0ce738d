//! Sensor type registry.
//!
//! Every type id that may legally appear on the wire is a variant of
//! [`SensorType`]. Anything else is rejected at lookup time with
//! [`PayloadError::UnknownSensorType`].
//!
//! | Type            | LPP | Size | Resolution              |
//! |-----------------|-----|------|-------------------------|
//! | Digital Input   | 0   | 1    | 1                       |
//! | Digital Output  | 1   | 1    | 1                       |
//! | Analog Input    | 2   | 2    | 0.01 signed             |
//! | Analog Output   | 3   | 2    | 0.01 signed             |
//! | Counter         | 4   | 2    | 1 unsigned              |
//! | Generic         | 100 | 4    | 1 unsigned              |
//! | Illuminance     | 101 | 2    | 1 lux unsigned          |
//! | Presence        | 102 | 1    | 1                       |
//! | Temperature     | 103 | 2    | 0.1 °C signed           |
//! | Humidity        | 104 | 1    | 0.5 % unsigned          |
//! | Accelerometer   | 113 | 6    | 0.001 G signed per axis |
//! | Barometer       | 115 | 2    | 0.1 hPa unsigned        |
//! | Voltage         | 116 | 2    | 0.01 V unsigned         |
//! | Current         | 117 | 2    | 0.001 A unsigned        |
//! | Frequency       | 118 | 4    | 1 Hz unsigned           |
//! | Percentage      | 120 | 1    | 1 % unsigned            |
//! | Altitude        | 121 | 2    | 1 m signed              |
//! | Power           | 128 | 2    | 1 W unsigned            |
//! | Distance        | 130 | 4    | 0.001 m unsigned        |
//! | Energy          | 131 | 4    | 0.001 kWh unsigned      |
//! | Direction       | 132 | 1    | 1 ° unsigned            |
//! | Time            | 133 | 4    | unix seconds            |
//! | Gyrometer       | 134 | 6    | 0.01 °/s signed per axis|
//! | Location        | 136 | 9    | 0.0001 ° / 0.0001 ° / 0.01 m signed |
//! | Switch          | 142 | 1    | 0/1                     |

use crate::{PayloadError, Result};
use serde::Serialize;

/// Fixed-point scale applied after integer reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Divisor {
    Scalar(f64),
    /// One divisor per component, in wire order.
    PerComponent([f64; 3]),
}

/// Shape of the decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueLayout {
    Scalar,
    /// Three equal-width components sharing one divisor.
    Vector3,
    /// Latitude, longitude, altitude, each with its own divisor.
    Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorTypeRule {
    pub type_id: u8,
    pub byte_width: usize,
    pub name: &'static str,
    pub signed: bool,
    pub divisor: Divisor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SensorType {
    DigitalInput = 0,
    DigitalOutput = 1,
    AnalogInput = 2,
    AnalogOutput = 3,
    Counter = 4,
    Generic = 100,
    Illuminance = 101,
    Presence = 102,
    Temperature = 103,
    Humidity = 104,
    Accelerometer = 113,
    Barometer = 115,
    Voltage = 116,
    Current = 117,
    Frequency = 118,
    Percentage = 120,
    Altitude = 121,
    Power = 128,
    Distance = 130,
    Energy = 131,
    Direction = 132,
    Time = 133,
    Gyrometer = 134,
    Location = 136,
    Switch = 142,
}

const fn rule(
    type_id: u8,
    byte_width: usize,
    name: &'static str,
    signed: bool,
    divisor: f64,
) -> SensorTypeRule {
    SensorTypeRule {
        type_id,
        byte_width,
        name,
        signed,
        divisor: Divisor::Scalar(divisor),
    }
}

static DIGITAL_INPUT: SensorTypeRule = rule(0, 1, "digital_input", false, 1.0);
static DIGITAL_OUTPUT: SensorTypeRule = rule(1, 1, "digital_output", false, 1.0);
static ANALOG_INPUT: SensorTypeRule = rule(2, 2, "analog_input", true, 100.0);
static ANALOG_OUTPUT: SensorTypeRule = rule(3, 2, "analog_output", true, 100.0);
static COUNTER: SensorTypeRule = rule(4, 2, "counter", false, 1.0);
static GENERIC: SensorTypeRule = rule(100, 4, "generic", false, 1.0);
static ILLUMINANCE: SensorTypeRule = rule(101, 2, "illuminance", false, 1.0);
static PRESENCE: SensorTypeRule = rule(102, 1, "presence", false, 1.0);
static TEMPERATURE: SensorTypeRule = rule(103, 2, "temperature", true, 10.0);
static HUMIDITY: SensorTypeRule = rule(104, 1, "humidity", false, 2.0);
static ACCELEROMETER: SensorTypeRule = rule(113, 6, "accelerometer", true, 1000.0);
static BAROMETER: SensorTypeRule = rule(115, 2, "barometer", false, 10.0);
static VOLTAGE: SensorTypeRule = rule(116, 2, "voltage", false, 100.0);
static CURRENT: SensorTypeRule = rule(117, 2, "current", false, 1000.0);
static FREQUENCY: SensorTypeRule = rule(118, 4, "frequency", false, 1.0);
static PERCENTAGE: SensorTypeRule = rule(120, 1, "percentage", false, 1.0);
static ALTITUDE: SensorTypeRule = rule(121, 2, "altitude", true, 1.0);
static POWER: SensorTypeRule = rule(128, 2, "power", false, 1.0);
static DISTANCE: SensorTypeRule = rule(130, 4, "distance", false, 1000.0);
static ENERGY: SensorTypeRule = rule(131, 4, "energy", false, 1000.0);
static DIRECTION: SensorTypeRule = rule(132, 1, "direction", false, 1.0);
static TIME: SensorTypeRule = rule(133, 4, "time", false, 1.0);
static GYROMETER: SensorTypeRule = rule(134, 6, "gyrometer", true, 100.0);
static LOCATION: SensorTypeRule = SensorTypeRule {
    type_id: 136,
    byte_width: 9,
    name: "location",
    signed: true,
    divisor: Divisor::PerComponent([10000.0, 10000.0, 100.0]),
};
static SWITCH: SensorTypeRule = rule(142, 1, "switch", false, 1.0);

impl SensorType {
    pub const ALL: [SensorType; 25] = [
        SensorType::DigitalInput,
        SensorType::DigitalOutput,
        SensorType::AnalogInput,
        SensorType::AnalogOutput,
        SensorType::Counter,
        SensorType::Generic,
        SensorType::Illuminance,
        SensorType::Presence,
        SensorType::Temperature,
        SensorType::Humidity,
        SensorType::Accelerometer,
        SensorType::Barometer,
        SensorType::Voltage,
        SensorType::Current,
        SensorType::Frequency,
        SensorType::Percentage,
        SensorType::Altitude,
        SensorType::Power,
        SensorType::Distance,
        SensorType::Energy,
        SensorType::Direction,
        SensorType::Time,
        SensorType::Gyrometer,
        SensorType::Location,
        SensorType::Switch,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn rule(self) -> &'static SensorTypeRule {
        match self {
            SensorType::DigitalInput => &DIGITAL_INPUT,
            SensorType::DigitalOutput => &DIGITAL_OUTPUT,
            SensorType::AnalogInput => &ANALOG_INPUT,
            SensorType::AnalogOutput => &ANALOG_OUTPUT,
            SensorType::Counter => &COUNTER,
            SensorType::Generic => &GENERIC,
            SensorType::Illuminance => &ILLUMINANCE,
            SensorType::Presence => &PRESENCE,
            SensorType::Temperature => &TEMPERATURE,
            SensorType::Humidity => &HUMIDITY,
            SensorType::Accelerometer => &ACCELEROMETER,
            SensorType::Barometer => &BAROMETER,
            SensorType::Voltage => &VOLTAGE,
            SensorType::Current => &CURRENT,
            SensorType::Frequency => &FREQUENCY,
            SensorType::Percentage => &PERCENTAGE,
            SensorType::Altitude => &ALTITUDE,
            SensorType::Power => &POWER,
            SensorType::Distance => &DISTANCE,
            SensorType::Energy => &ENERGY,
            SensorType::Direction => &DIRECTION,
            SensorType::Time => &TIME,
            SensorType::Gyrometer => &GYROMETER,
            SensorType::Location => &LOCATION,
            SensorType::Switch => &SWITCH,
        }
    }

    pub fn layout(self) -> ValueLayout {
        match self {
            SensorType::Accelerometer | SensorType::Gyrometer => ValueLayout::Vector3,
            SensorType::Location => ValueLayout::Location,
            _ => ValueLayout::Scalar,
        }
    }
}

impl TryFrom<u8> for SensorType {
    type Error = PayloadError;

    fn try_from(type_id: u8) -> Result<Self> {
        let sensor_type = match type_id {
            0 => SensorType::DigitalInput,
            1 => SensorType::DigitalOutput,
            2 => SensorType::AnalogInput,
            3 => SensorType::AnalogOutput,
            4 => SensorType::Counter,
            100 => SensorType::Generic,
            101 => SensorType::Illuminance,
            102 => SensorType::Presence,
            103 => SensorType::Temperature,
            104 => SensorType::Humidity,
            113 => SensorType::Accelerometer,
            115 => SensorType::Barometer,
            116 => SensorType::Voltage,
            117 => SensorType::Current,
            118 => SensorType::Frequency,
            120 => SensorType::Percentage,
            121 => SensorType::Altitude,
            128 => SensorType::Power,
            130 => SensorType::Distance,
            131 => SensorType::Energy,
            132 => SensorType::Direction,
            133 => SensorType::Time,
            134 => SensorType::Gyrometer,
            136 => SensorType::Location,
            142 => SensorType::Switch,
            _ => return Err(PayloadError::UnknownSensorType(type_id)),
        };
        Ok(sensor_type)
    }
}

/// Look up the decoding rule for a wire type id.
pub fn lookup(type_id: u8) -> Result<&'static SensorTypeRule> {
    SensorType::try_from(type_id).map(SensorType::rule)
}
