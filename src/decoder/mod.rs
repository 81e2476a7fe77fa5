//! Payload decoders for Aranet advertisement frames.
//!
//! All fields are little-endian at fixed offsets. Each raw field either scales
//! into a reading, hits its sentinel (the sensor has nothing to report, which
//! decodes to `None`), or falls outside its physical range, which rejects the
//! whole frame.

mod climate;
mod radiation;
mod radon;

use crate::classifier::{DeviceFamily, Model};
use thiserror::Error;

/// Error returned when a recognized frame cannot be trusted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected a {expected} byte frame, got {actual} bytes")]
    Length { expected: usize, actual: usize },
    #[error("{field} out of range: raw value {raw}")]
    OutOfRange { field: &'static str, raw: u32 },
}

/// Relative humidity as the device encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Humidity {
    /// Whole percent (Aranet4)
    Percent(u8),
    /// Tenths of a percent (Aranet2, Aranet Radon)
    Tenths(u16),
}

impl Humidity {
    pub fn percent(self) -> f64 {
        match self {
            Humidity::Percent(v) => f64::from(v),
            Humidity::Tenths(v) => f64::from(v) / 10.0,
        }
    }
}

/// CO₂ / climate monitor readings (Aranet4, Aranet2).
#[derive(Debug, Clone, PartialEq)]
pub struct Climate {
    /// CO₂ concentration in ppm; Aranet2 has no CO₂ sensor
    pub co2: Option<u16>,
    /// Temperature in °C
    pub temperature: Option<f64>,
    pub humidity: Option<Humidity>,
    /// Atmospheric pressure in hPa; Aranet2 has no pressure sensor
    pub pressure: Option<f64>,
    /// Battery level in percent
    pub battery: u8,
}

/// Radon monitor readings (Aranet Radon Plus).
#[derive(Debug, Clone, PartialEq)]
pub struct Radon {
    /// Radon concentration in Bq/m³
    pub radon: Option<u16>,
    pub temperature: Option<f64>,
    pub humidity: Option<Humidity>,
    pub pressure: Option<f64>,
    pub battery: u8,
}

/// Radiation monitor readings (Aranet Radiation).
#[derive(Debug, Clone, PartialEq)]
pub struct Radiation {
    /// Dose rate in µSv/h
    pub rate: Option<f64>,
    /// Accumulated dose in mSv
    pub total: Option<f64>,
    /// Accumulation time in seconds
    pub duration: Option<u32>,
    pub battery: u8,
}

/// Decoded readings, one variant per device family.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPayload {
    Climate(Climate),
    Radon(Radon),
    Radiation(Radiation),
}

impl DecodedPayload {
    pub fn family(&self) -> DeviceFamily {
        match self {
            DecodedPayload::Climate(_) => DeviceFamily::Climate,
            DecodedPayload::Radon(_) => DeviceFamily::Radon,
            DecodedPayload::Radiation(_) => DeviceFamily::Radiation,
        }
    }
}

/// Measurement schedule announced alongside the readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cadence {
    /// Seconds between measurements
    pub interval_secs: u16,
    /// Seconds since the announced measurement was taken
    pub age_secs: u16,
}

/// A successfully decoded frame.
///
/// Only the decoders build one, each stamping the model whose layout it read,
/// so the model always agrees with the payload variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    model: Model,
    payload: DecodedPayload,
    cadence: Cadence,
}

impl Decoded {
    pub fn model(&self) -> Model {
        self.model
    }

    pub fn payload(&self) -> &DecodedPayload {
        &self.payload
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn into_parts(self) -> (Model, DecodedPayload, Cadence) {
        (self.model, self.payload, self.cadence)
    }
}

/// Decode `payload` with the layout of `model`.
///
/// The classifier has already checked the length; a mismatch here is reported
/// as [`DecodeError::Length`] instead of reading out of bounds.
pub fn decode(model: Model, payload: &[u8]) -> Result<Decoded, DecodeError> {
    match model {
        Model::Aranet4 => climate::decode_aranet4(payload),
        Model::Aranet2 => climate::decode_aranet2(payload),
        Model::AranetRadon => radon::decode(payload),
        Model::AranetRadiation => radiation::decode(payload),
    }
}

fn frame<const N: usize>(payload: &[u8]) -> Result<&[u8; N], DecodeError> {
    payload.try_into().map_err(|_| DecodeError::Length {
        expected: N,
        actual: payload.len(),
    })
}

fn u16_at<const N: usize>(frame: &[u8; N], offset: usize) -> u16 {
    u16::from_le_bytes([frame[offset], frame[offset + 1]])
}

fn u32_at<const N: usize>(frame: &[u8; N], offset: usize) -> u32 {
    u32::from_le_bytes([
        frame[offset],
        frame[offset + 1],
        frame[offset + 2],
        frame[offset + 3],
    ])
}

/// `None` when the sentinel flag bit is set.
fn unless_flagged(raw: u16, bit: u32) -> Option<u16> {
    if (raw >> bit) & 1 == 1 {
        None
    } else {
        Some(raw)
    }
}

fn out_of_range(field: &'static str, raw: impl Into<u32>) -> DecodeError {
    DecodeError::OutOfRange {
        field,
        raw: raw.into(),
    }
}

/// Twentieths of a degree. Bit 14 flags a missing reading, bit 15 is never
/// set by a working sensor.
fn temperature(raw: u16) -> Result<Option<f64>, DecodeError> {
    if raw & 0x8000 != 0 && raw & 0x4000 == 0 {
        return Err(out_of_range("temperature", raw));
    }
    Ok(unless_flagged(raw, 14).map(|v| f64::from(v) / 20.0))
}

/// Tenths of a hectopascal, bit 15 flags a missing reading.
fn pressure(raw: u16) -> Option<f64> {
    unless_flagged(raw, 15).map(|v| f64::from(v) / 10.0)
}

/// Tenths of a percent, bit 15 flags a missing reading.
fn humidity_tenths(raw: u16) -> Result<Option<Humidity>, DecodeError> {
    match unless_flagged(raw, 15) {
        Some(v) if v > 1000 => Err(out_of_range("humidity", raw)),
        v => Ok(v.map(Humidity::Tenths)),
    }
}

fn battery(raw: u8) -> Result<u8, DecodeError> {
    if raw > 100 {
        Err(out_of_range("battery", raw))
    } else {
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_decode_dispatches_by_model() {
        let cases = [
            (Model::Aranet4, test_utils::aranet4_payload(), DeviceFamily::Climate),
            (Model::Aranet2, test_utils::aranet2_payload(), DeviceFamily::Climate),
            (Model::AranetRadon, test_utils::radon_payload(), DeviceFamily::Radon),
            (
                Model::AranetRadiation,
                test_utils::radiation_payload(),
                DeviceFamily::Radiation,
            ),
        ];
        for (model, payload, family) in cases {
            let decoded = decode(model, &payload).unwrap();
            assert_eq!(decoded.model(), model);
            assert_eq!(decoded.payload().family(), family, "{model}");
            assert_eq!(decoded.model().family(), family, "{model}");
        }
    }

    #[test]
    fn test_wrong_length_is_an_error_not_a_panic() {
        for model in [
            Model::Aranet4,
            Model::Aranet2,
            Model::AranetRadon,
            Model::AranetRadiation,
        ] {
            assert!(matches!(
                decode(model, &[0x01, 0x02, 0x03]),
                Err(DecodeError::Length { actual: 3, .. })
            ));
            assert!(decode(model, &[]).is_err());
        }
    }

    #[test]
    fn test_temperature_sentinel_and_range() {
        assert_eq!(temperature(318), Ok(Some(15.9)));
        assert_eq!(temperature(0x4000), Ok(None));
        assert_eq!(temperature(0xFFFF), Ok(None));
        assert!(temperature(0x8001).is_err());
    }

    #[test]
    fn test_humidity_tenths() {
        assert_eq!(humidity_tenths(452), Ok(Some(Humidity::Tenths(452))));
        assert_eq!(humidity_tenths(0xFFFF), Ok(None));
        assert!(humidity_tenths(1001).is_err());
        assert_eq!(Humidity::Tenths(452).percent(), 45.2);
        assert_eq!(Humidity::Percent(53).percent(), 53.0);
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::OutOfRange {
            field: "battery",
            raw: 200,
        };
        assert_eq!(err.to_string(), "battery out of range: raw value 200");
        let err = DecodeError::Length {
            expected: 22,
            actual: 3,
        };
        assert_eq!(err.to_string(), "expected a 22 byte frame, got 3 bytes");
    }
}
