use crate::characteristic::Characteristic;
use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

const DATETIME_LEN: usize = 5;

const YEAR_MIN: i32 = 2000;
const YEAR_MAX: i32 = 2255;

/// Encode a timestamp for the device clock characteristic:
/// `[minute, hour, day, month, year - 2000]`. Seconds are not stored.
pub(crate) fn encode_datetime(t: NaiveDateTime) -> Result<[u8; DATETIME_LEN]> {
    let year = t.year();
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(Error::OutOfRange {
            what: "year",
            value: year as f64,
            min: YEAR_MIN as f64,
            max: YEAR_MAX as f64,
        });
    }
    Ok([
        t.minute() as u8,
        t.hour() as u8,
        t.day() as u8,
        t.month() as u8,
        (year - YEAR_MIN) as u8,
    ])
}

pub(crate) fn decode_datetime(data: &[u8]) -> Result<NaiveDateTime> {
    let decode_error = |reason: String| Error::Decode {
        characteristic: Characteristic::DateTime,
        reason,
    };
    if data.len() != DATETIME_LEN {
        return Err(decode_error(format!(
            "expected {DATETIME_LEN} bytes, got {}",
            data.len()
        )));
    }
    let [minute, hour, day, month, year] = [data[0], data[1], data[2], data[3], data[4]];
    NaiveDate::from_ymd_opt(YEAR_MIN + year as i32, month as u32, day as u32)
        .and_then(|date| date.and_hms_opt(hour as u32, minute as u32, 0))
        .ok_or_else(|| decode_error(format!("invalid clock value 0x{}", hex::encode(data))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let t = NaiveDate::from_ymd_opt(2026, 8, 29)
            .unwrap()
            .and_hms_opt(14, 5, 30)
            .unwrap();
        assert_eq!(encode_datetime(t).unwrap(), [5, 14, 29, 8, 26]);
    }

    #[test]
    fn test_encode_rejects_year_before_2000() {
        let t = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert!(matches!(
            encode_datetime(t),
            Err(crate::Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_round_trip() {
        let t = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 0)
            .unwrap();
        assert_eq!(decode_datetime(&encode_datetime(t).unwrap()).unwrap(), t);
    }

    #[test]
    fn test_decode_invalid_date() {
        assert!(matches!(
            decode_datetime(&[0, 0, 32, 13, 26]),
            Err(crate::Error::Decode { .. })
        ));
    }
}
