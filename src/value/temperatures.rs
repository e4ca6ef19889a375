use crate::characteristic::Characteristic;
use crate::error::{Error, Result};

/// The special target temperature that drives the valve fully closed.
pub const TEMPERATURE_OFF: f32 = 7.5;
/// Lowest accepted target temperature in °C. Equal to [`TEMPERATURE_OFF`].
pub const TARGET_TEMPERATURE_MIN: f32 = 7.5;
/// Highest accepted target temperature in °C (valve fully open).
pub const TARGET_TEMPERATURE_MAX: f32 = 28.5;
/// Lowest accepted calibration offset in °C.
pub const OFFSET_TEMPERATURE_MIN: f32 = -5.0;
/// Highest accepted calibration offset in °C.
pub const OFFSET_TEMPERATURE_MAX: f32 = 5.0;

/// Marker byte meaning "invalid" on read and "leave unchanged" on write.
const UNCHANGED: i8 = -128;

const TEMPERATURES_LEN: usize = 7;

/// The decoded temperatures characteristic.
///
/// The device stores temperatures as signed half-degree counts, so every
/// value here is a multiple of 0.5 °C. Layout (one `i8` each): current
/// temperature, manual target, scheduled low target, scheduled high target,
/// calibration offset, then the two window-open detection parameters which
/// are plain integers rather than half-degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Temperatures {
    /// Raw sensor reading in °C, not adjusted by the offset.
    pub current_temperature: f32,
    /// The manually set target in °C. [`TEMPERATURE_OFF`] means the valve is
    /// driven fully closed.
    pub target_temperature: f32,
    /// Scheduled low ("night") target in °C.
    pub target_temperature_low: f32,
    /// Scheduled high ("day") target in °C.
    pub target_temperature_high: f32,
    /// Calibration offset in °C, applied by the device to its display and by
    /// [`ambient_temperature`](Self::ambient_temperature) to the raw reading.
    pub offset_temperature: f32,
    /// Window-open detection sensitivity, device defined scale.
    pub window_open_sensitivity: u8,
    /// Minutes the valve stays closed after a detected open window.
    pub window_open_minutes: u8,
}

impl Temperatures {
    pub(crate) fn decode(data: &[u8]) -> Result<Self> {
        if data.len() != TEMPERATURES_LEN {
            return Err(decode_error(format!(
                "expected {TEMPERATURES_LEN} bytes, got {}",
                data.len()
            )));
        }
        let raw: Vec<i8> = data.iter().map(|&b| b as i8).collect();
        if raw.contains(&UNCHANGED) {
            // The device reports -128 while a register has no valid value
            // yet, e.g. right after battery insertion.
            return Err(decode_error("device reported invalid temperature value".into()));
        }
        Ok(Self {
            current_temperature: decode_degrees(raw[0]),
            target_temperature: decode_degrees(raw[1]),
            target_temperature_low: decode_degrees(raw[2]),
            target_temperature_high: decode_degrees(raw[3]),
            offset_temperature: decode_degrees(raw[4]),
            window_open_sensitivity: raw[5] as u8,
            window_open_minutes: raw[6] as u8,
        })
    }

    /// Current temperature adjusted by the calibration offset.
    pub fn ambient_temperature(&self) -> f32 {
        self.current_temperature + self.offset_temperature
    }

    /// True if the manual target is the special "valve closed" value.
    pub fn is_off(&self) -> bool {
        self.target_temperature == TEMPERATURE_OFF
    }
}

/// A sparse write to the temperatures characteristic. Fields left as `None`
/// are encoded as the "leave unchanged" marker, so a single setpoint can be
/// written without clobbering the others. Values are rounded to the
/// device's half-degree resolution.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct TemperaturesUpdate {
    pub target_temperature: Option<f32>,
    pub offset_temperature: Option<f32>,
}

impl TemperaturesUpdate {
    pub fn encode(&self) -> [u8; TEMPERATURES_LEN] {
        let enc = |v: Option<f32>| v.map(encode_degrees).unwrap_or(UNCHANGED) as u8;
        [
            UNCHANGED as u8, // current temperature is read-only
            enc(self.target_temperature),
            UNCHANGED as u8,
            UNCHANGED as u8,
            enc(self.offset_temperature),
            UNCHANGED as u8,
            UNCHANGED as u8,
        ]
    }
}

fn encode_degrees(degrees: f32) -> i8 {
    (degrees * 2.0).round() as i8
}

fn decode_degrees(raw: i8) -> f32 {
    raw as f32 / 2.0
}

fn decode_error(reason: String) -> Error {
    Error::Decode {
        characteristic: Characteristic::Temperatures,
        reason,
    }
}
