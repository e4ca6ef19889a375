//! Read and write settings of Eurotronic Comet Blue Bluetooth Low Energy
//! radiator thermostats. The same hardware is also sold under the Sygonix
//! and Xavax brands.
//!
//! The thermostat exposes its registers as plain GATT characteristics with
//! vendor-fixed byte layouts. Writes are only accepted after a PIN has been
//! written to the authentication characteristic, which
//! [`ThermostatSession::open`] does as part of session setup. The factory
//! PIN is `0`.
//!
//! Currently the following can be accessed:
//!
//! - Operating mode (auto / manual / off), read/write
//! - Current (ambient) temperature (°C)
//! - Target temperature and calibration offset (°C), read/write
//! - Status flags (childlock, low battery, open window, ...)
//! - Battery level (%)
//! - Device clock, read/write
//! - Identification strings (manufacturer, model, firmware/software revision)
//!
//! # Example
//!
//! ```no_run
//! #[tokio::main]
//! pub async fn main() -> cometblue::Result<()> {
//!     let mut thermostat = cometblue::ThermostatSession::connect_default_name(0).await?;
//!     println!("ambient temperature: {:.1}°C", thermostat.get_temperature().await?);
//!     thermostat.set_target_temperature(21.0).await?;
//!     thermostat.close().await;
//!     Ok(())
//! }
//! ```

mod characteristic;
mod error;
#[cfg(test)]
mod mock_transport;
mod session;
mod transport;
mod value;

pub use characteristic::Characteristic;
pub use error::{Error, Result};
pub use session::ThermostatSession;
pub use transport::{BluestTransport, Transport};
pub use value::{
    DeviceStatus, Identification, Mode, Temperatures, OFFSET_TEMPERATURE_MAX,
    OFFSET_TEMPERATURE_MIN, TARGET_TEMPERATURE_MAX, TARGET_TEMPERATURE_MIN, TEMPERATURE_OFF,
};
