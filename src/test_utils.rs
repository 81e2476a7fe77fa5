use crate::advertisement::RawAdvertisement;
use crate::classifier::ARANET_MANUFACTURER_ID;
use crate::mac_address::MacAddress;
use crate::registry::DeviceIdentity;
use std::time::{Duration, SystemTime};

/// A stable MAC address for unit tests.
pub const TEST_MAC: MacAddress = MacAddress([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

/// Capture time used by fixtures, 1 000 000 000 s after the epoch.
pub fn test_time() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000)
}

pub fn identity(key: &str, name: &str) -> DeviceIdentity {
    DeviceIdentity {
        display_name: name.to_string(),
        device_key: key.to_string(),
    }
}

/// Aranet4: CO₂ 485 ppm, 15.9 °C, 1008.7 hPa, 53 %, battery 60 %,
/// interval 60 s, age 13 s.
pub fn aranet4_payload() -> Vec<u8> {
    vec![
        0x21, // flags
        0x13, 0x03, 0x01, // version
        0x00, 0x0c, 0x0f, 0x01, // reserved
        0xe5, 0x01, // co2
        0x3e, 0x01, // temperature
        0x67, 0x27, // pressure
        0x35, // humidity
        0x3c, // battery
        0x01, // status
        0x3c, 0x00, // interval
        0x0d, 0x00, // age
        0x17, // counter
    ]
}

/// Aranet2: 21.35 °C, 48.7 %, battery 93 %, interval 300 s, age 42 s.
pub fn aranet2_payload() -> Vec<u8> {
    vec![
        0x01, // device type
        0x21, 0x04, 0x01, 0x01, 0x00, 0x00, 0x00, // flags, version, reserved
        0x00, 0x00, // reserved
        0xab, 0x01, // temperature
        0x00, 0x00, // reserved
        0xe7, 0x01, // humidity
        0x5d, // battery
        0x01, // status
        0x2c, 0x01, // interval
        0x2a, 0x00, // age
        0x09, // counter
        0x00,
    ]
}

/// Aranet Radon: 45 Bq/m³, 21.8 °C, 1010.0 hPa, 45.2 %, battery 88 %,
/// interval 600 s, age 120 s.
pub fn radon_payload() -> Vec<u8> {
    vec![
        0x03, // device type
        0x21, 0x0c, 0x01, 0x01, 0x00, 0x00, 0x00, // flags, version, reserved
        0x2d, 0x00, // radon
        0xb4, 0x01, // temperature
        0x74, 0x27, // pressure
        0xc4, 0x01, // humidity
        0x00, // reserved
        0x58, // battery
        0x01, // status
        0x58, 0x02, // interval
        0x78, 0x00, // age
        0x04, // counter
    ]
}

/// Aranet Radiation: 0.03 µSv/h, 0.000048 mSv over 3420 s, battery 100 %,
/// interval 60 s, age 5 s.
pub fn radiation_payload() -> Vec<u8> {
    vec![
        0x02, // device type
        0x21, 0x10, 0x01, 0x01, 0x00, 0x00, 0x00, // flags, version, reserved
        0x30, 0x00, 0x00, 0x00, // total dose
        0x5c, 0x0d, 0x00, 0x00, // duration
        0x1e, 0x00, // dose rate
        0x64, // battery
        0x01, // status
        0x3c, 0x00, // interval
        0x05, 0x00, // age
    ]
}

pub fn advertisement(mac: MacAddress, payload: Vec<u8>) -> RawAdvertisement {
    RawAdvertisement {
        mac,
        manufacturer_id: ARANET_MANUFACTURER_ID,
        payload,
        rssi: Some(-65),
        captured_at: test_time(),
    }
}
