use crate::characteristic::Characteristic;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a [`ThermostatSession`](crate::ThermostatSession) or its
/// underlying transport.
///
/// Every error surfaces directly to the caller of the failing operation.
/// The library performs no internal retry; callers decide whether and when
/// to reopen the session.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport could not reach or set up the device.
    #[error("could not connect to device: {0}")]
    Connection(String),

    /// The device rejected the PIN during session setup.
    #[error("device rejected PIN: {0}")]
    Authentication(String),

    /// The session is not in the authenticated state. Returned by every
    /// operation after `close()` or after a lost connection, until the
    /// session is reopened.
    #[error("session is not authenticated, reopen it first")]
    NotAuthenticated,

    /// A setpoint was outside the range the device supports. Nothing was
    /// written to the device.
    #[error("{what} {value} is outside the supported range {min}..={max}")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The connection dropped while an operation was in flight.
    #[error("connection to device lost: {0}")]
    ConnectionLost(String),

    /// The transport gave up waiting for the device.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// The device returned a buffer that does not match the documented
    /// layout of the characteristic.
    #[error("could not decode {characteristic} value: {reason}")]
    Decode {
        characteristic: Characteristic,
        reason: String,
    },

    /// The connected device does not expose a required characteristic.
    #[error("device does not expose the {0} characteristic")]
    CharacteristicNotFound(Characteristic),
}

pub type Result<T> = std::result::Result<T, Error>;
