mod datetime;
mod identification;
mod status;
mod temperatures;

pub use identification::Identification;
pub use status::DeviceStatus;
pub use temperatures::{
    Temperatures, OFFSET_TEMPERATURE_MAX, OFFSET_TEMPERATURE_MIN, TARGET_TEMPERATURE_MAX,
    TARGET_TEMPERATURE_MIN, TEMPERATURE_OFF,
};

pub(crate) use datetime::{decode_datetime, encode_datetime};
pub(crate) use identification::decode_string;
pub(crate) use temperatures::TemperaturesUpdate;

/// The operating mode of the thermostat.
///
/// The device itself only knows a manual/automatic bit in its status
/// register; "off" is the manual mode with the target temperature set to the
/// special [`TEMPERATURE_OFF`] value, which drives the valve fully closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The device follows its programmed schedule.
    Auto,
    /// The device holds the manually set target temperature.
    Manual,
    /// Manual mode with the valve fully closed.
    Off,
}
