use bluest::Uuid;

/// Comet Blue vendor service.
pub const THERMOSTAT_SERVICE: Uuid = Uuid::from_u128(0x47e9ee00_47e9_11e4_8939_164230d1df67);

/// Standard Device Information service, carries the identification strings.
pub const DEVICE_INFORMATION_SERVICE: Uuid = Uuid::from_u128(0x0000180a_0000_1000_8000_00805f9b34fb);

/// The GATT characteristics the thermostat exposes.
///
/// A closed set: every supported register is listed here together with its
/// fixed UUID, so lookups are exhaustive and there is no string-keyed
/// dispatch anywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    /// PIN authentication register, write-only, `u32` little-endian.
    Pin,
    /// The 7-byte temperatures block (current, target, low, high, offset,
    /// window-open parameters).
    Temperatures,
    /// Battery level in percent, one byte.
    Battery,
    /// The 3-byte status bitfield.
    Status,
    /// Device clock, 5 bytes.
    DateTime,
    /// Vendor firmware revision string (e.g. `COBL0126`).
    FirmwareRevision,
    /// Model number string (e.g. `Comet Blue`).
    ModelNumber,
    /// Manufacturer name string (e.g. `EUROtronic GmbH`).
    ManufacturerName,
    /// Software revision string (e.g. `0.0.6-sygonix1`).
    SoftwareRevision,
}

impl Characteristic {
    /// Every supported characteristic, used to resolve handles at connect
    /// time.
    pub const ALL: [Characteristic; 9] = [
        Characteristic::Pin,
        Characteristic::Temperatures,
        Characteristic::Battery,
        Characteristic::Status,
        Characteristic::DateTime,
        Characteristic::FirmwareRevision,
        Characteristic::ModelNumber,
        Characteristic::ManufacturerName,
        Characteristic::SoftwareRevision,
    ];

    pub fn uuid(&self) -> Uuid {
        match self {
            Characteristic::Pin => Uuid::from_u128(0x47e9ee30_47e9_11e4_8939_164230d1df67),
            Characteristic::Temperatures => Uuid::from_u128(0x47e9ee2b_47e9_11e4_8939_164230d1df67),
            Characteristic::Battery => Uuid::from_u128(0x47e9ee2c_47e9_11e4_8939_164230d1df67),
            Characteristic::Status => Uuid::from_u128(0x47e9ee2a_47e9_11e4_8939_164230d1df67),
            Characteristic::DateTime => Uuid::from_u128(0x47e9ee01_47e9_11e4_8939_164230d1df67),
            Characteristic::FirmwareRevision => {
                Uuid::from_u128(0x47e9ee2d_47e9_11e4_8939_164230d1df67)
            }
            Characteristic::ModelNumber => Uuid::from_u128(0x00002a24_0000_1000_8000_00805f9b34fb),
            Characteristic::ManufacturerName => {
                Uuid::from_u128(0x00002a29_0000_1000_8000_00805f9b34fb)
            }
            Characteristic::SoftwareRevision => {
                Uuid::from_u128(0x00002a28_0000_1000_8000_00805f9b34fb)
            }
        }
    }

    /// The service this characteristic lives under.
    pub fn service_uuid(&self) -> Uuid {
        match self {
            Characteristic::ModelNumber
            | Characteristic::ManufacturerName
            | Characteristic::SoftwareRevision => DEVICE_INFORMATION_SERVICE,
            _ => THERMOSTAT_SERVICE,
        }
    }
}

impl std::fmt::Display for Characteristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Characteristic::Pin => "pin",
            Characteristic::Temperatures => "temperatures",
            Characteristic::Battery => "battery",
            Characteristic::Status => "status",
            Characteristic::DateTime => "datetime",
            Characteristic::FirmwareRevision => "firmware revision",
            Characteristic::ModelNumber => "model number",
            Characteristic::ManufacturerName => "manufacturer name",
            Characteristic::SoftwareRevision => "software revision",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_characteristics_live_under_thermostat_service() {
        for c in [
            Characteristic::Pin,
            Characteristic::Temperatures,
            Characteristic::Battery,
            Characteristic::Status,
            Characteristic::DateTime,
            Characteristic::FirmwareRevision,
        ] {
            assert_eq!(c.service_uuid(), THERMOSTAT_SERVICE);
        }
    }

    #[test]
    fn test_identification_strings_live_under_device_information() {
        for c in [
            Characteristic::ModelNumber,
            Characteristic::ManufacturerName,
            Characteristic::SoftwareRevision,
        ] {
            assert_eq!(c.service_uuid(), DEVICE_INFORMATION_SERVICE);
        }
    }

    #[test]
    fn test_uuids_are_distinct() {
        for (i, a) in Characteristic::ALL.iter().enumerate() {
            for b in &Characteristic::ALL[i + 1..] {
                assert_ne!(a.uuid(), b.uuid());
            }
        }
    }
}
