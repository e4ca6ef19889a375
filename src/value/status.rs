use crate::characteristic::Characteristic;
use crate::error::{Error, Result};

const STATUS_LEN: usize = 3;

const MANUAL_MODE: u32 = 0x1;
const WINDOW_OPEN: u32 = 0x10;
const CHILDLOCK: u32 = 0x80;
const MOTOR_MOVING: u32 = 0x100;
const NOT_READY: u32 = 0x200;
const ADAPTING: u32 = 0x400;
const LOW_BATTERY: u32 = 0x800;
const UNKNOWN: u32 = 0x2000;
const SATISFIED: u32 = 0x8_0000;

/// The decoded status characteristic, a bitfield carried in the low three
/// bytes of a little-endian dword.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStatus {
    /// Manual mode is active (as opposed to the programmed schedule).
    pub manual_mode: bool,
    /// The antifrost protection kicked in after an open window was detected.
    pub window_open: bool,
    /// The buttons on the device are locked.
    pub childlock: bool,
    /// The valve motor is currently moving.
    pub motor_moving: bool,
    /// The device is not ready yet (mounting phase).
    pub not_ready: bool,
    /// The device is adapting to the valve.
    pub adapting: bool,
    /// The battery is low.
    pub low_battery: bool,
    /// Undocumented flag observed on some firmware revisions.
    pub unknown: bool,
    /// The target temperature has been reached.
    pub satisfied: bool,
}

impl DeviceStatus {
    pub(crate) fn decode(data: &[u8]) -> Result<Self> {
        if data.len() != STATUS_LEN {
            return Err(Error::Decode {
                characteristic: Characteristic::Status,
                reason: format!("expected {STATUS_LEN} bytes, got {}", data.len()),
            });
        }
        let dword = u32::from_le_bytes([data[0], data[1], data[2], 0]);
        Ok(Self {
            manual_mode: dword & MANUAL_MODE != 0,
            window_open: dword & WINDOW_OPEN != 0,
            childlock: dword & CHILDLOCK != 0,
            motor_moving: dword & MOTOR_MOVING != 0,
            not_ready: dword & NOT_READY != 0,
            adapting: dword & ADAPTING != 0,
            low_battery: dword & LOW_BATTERY != 0,
            unknown: dword & UNKNOWN != 0,
            satisfied: dword & SATISFIED != 0,
        })
    }

    pub(crate) fn encode(&self) -> [u8; STATUS_LEN] {
        let mut dword = 0u32;
        for (flag, mask) in [
            (self.manual_mode, MANUAL_MODE),
            (self.window_open, WINDOW_OPEN),
            (self.childlock, CHILDLOCK),
            (self.motor_moving, MOTOR_MOVING),
            (self.not_ready, NOT_READY),
            (self.adapting, ADAPTING),
            (self.low_battery, LOW_BATTERY),
            (self.unknown, UNKNOWN),
            (self.satisfied, SATISFIED),
        ] {
            if flag {
                dword |= mask;
            }
        }
        let bytes = dword.to_le_bytes();
        [bytes[0], bytes[1], bytes[2]]
    }

    /// True while the device runs its initial valve installation sequence.
    pub fn installing(&self) -> bool {
        self.motor_moving && self.not_ready && self.adapting
    }
}
