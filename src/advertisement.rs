//! Raw advertisement envelope handed over by the Bluetooth scanner.

use crate::mac_address::MacAddress;
use std::time::SystemTime;

/// One manufacturer-data entry from one received broadcast.
///
/// Nothing in here is trusted: any nearby device can send any bytes under any
/// manufacturer id.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAdvertisement {
    /// Address of the broadcasting device
    pub mac: MacAddress,
    /// Bluetooth SIG company identifier of the manufacturer data
    pub manufacturer_id: u16,
    /// Manufacturer data without the company id prefix
    pub payload: Vec<u8>,
    /// Received signal strength in dBm, if the stack reported one
    pub rssi: Option<i16>,
    /// When the broadcast was received
    pub captured_at: SystemTime,
}
