use crate::characteristic::Characteristic;
use crate::error::{Error, Result};

/// The identification strings of the device. Static for the lifetime of a
/// session, so they are read once and cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    /// e.g. `EUROtronic GmbH`
    pub manufacturer: String,
    /// e.g. `Comet Blue`
    pub model: String,
    /// e.g. `COBL0126`
    pub firmware_revision: String,
    /// e.g. `0.0.6-sygonix1`
    pub software_revision: String,
}

/// Decode a UTF-8 string characteristic, dropping any trailing NUL padding.
pub(crate) fn decode_string(characteristic: Characteristic, data: Vec<u8>) -> Result<String> {
    let s = String::from_utf8(data).map_err(|err| Error::Decode {
        characteristic,
        reason: err.to_string(),
    })?;
    Ok(s.trim_end_matches('\0').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_string_trims_nul_padding() {
        let data = b"Comet Blue\0\0".to_vec();
        let s = decode_string(Characteristic::ModelNumber, data).unwrap();
        assert_eq!(s, "Comet Blue");
    }

    #[test]
    fn test_decode_string_rejects_invalid_utf8() {
        let data = vec![0xff, 0xfe];
        assert!(matches!(
            decode_string(Characteristic::ManufacturerName, data),
            Err(crate::Error::Decode { .. })
        ));
    }
}
