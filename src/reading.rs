//! Normalized reading records.

use crate::advertisement::RawAdvertisement;
use crate::classifier::{DeviceFamily, Model};
use crate::decoder::{Cadence, Decoded, DecodedPayload};
use crate::mac_address::MacAddress;
use crate::registry::{Identity, Registry};
use std::time::SystemTime;

/// A decoded sensor reading attributed to a device.
///
/// The device family is derived from the payload variant, so the two cannot
/// disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub mac: MacAddress,
    pub identity: Identity,
    pub model: Model,
    pub payload: DecodedPayload,
    pub cadence: Cadence,
    /// Signal strength in dBm, as reported by the Bluetooth stack
    pub rssi: Option<i16>,
    /// Capture time of the broadcast
    pub captured_at: SystemTime,
}

impl Reading {
    pub fn family(&self) -> DeviceFamily {
        self.payload.family()
    }

    /// Capture time in nanoseconds since the Unix epoch.
    ///
    /// Clocks set before 1970 report zero.
    pub fn timestamp_nanos(&self) -> u128 {
        self.captured_at
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default()
    }
}

/// Combine a decoded frame with its envelope and registry identity.
///
/// The model comes from the decoded frame itself, so the `device` tag and the
/// payload fields always describe the same device.
pub fn normalize(registry: &Registry, raw: &RawAdvertisement, decoded: Decoded) -> Reading {
    let (model, payload, cadence) = decoded.into_parts();

    Reading {
        mac: raw.mac,
        identity: registry.resolve(raw.mac),
        model,
        payload,
        cadence,
        rssi: raw.rssi,
        captured_at: raw.captured_at,
    }
}
