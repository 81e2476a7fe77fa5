//! BlueZ D-Bus backend.
//!
//! Uses the `bluer` crate to talk to the BlueZ daemon; `bluetoothd` must be
//! running.

use super::{ADVERTISEMENT_CHANNEL_BUFFER_SIZE, ScanError};
use crate::advertisement::RawAdvertisement;
use crate::classifier::ARANET_MANUFACTURER_ID;
use crate::mac_address::MacAddress;
use bluer::monitor::{Monitor, MonitorEvent, Pattern};
use bluer::{Adapter, Address, Session};
use futures::StreamExt;
use log::{info, warn};
use std::time::SystemTime;
use tokio::sync::mpsc;

/// Bluetooth manufacturer-specific data type (AD type 0xFF)
const MANUFACTURER_DATA_TYPE: u8 = 0xff;

impl From<bluer::Error> for ScanError {
    fn from(err: bluer::Error) -> Self {
        ScanError::Bluetooth(err.to_string())
    }
}

/// Start a passive scan on `adapter_name` (or the default adapter).
pub async fn start_scan(
    adapter_name: Option<&str>,
) -> Result<mpsc::Receiver<RawAdvertisement>, ScanError> {
    let session = Session::new().await?;
    let adapter = match adapter_name {
        Some(name) => session.adapter(name)?,
        None => session.default_adapter().await?,
    };
    adapter.set_powered(true).await?;

    let (tx, rx) = mpsc::channel(ADVERTISEMENT_CHANNEL_BUFFER_SIZE);

    // Advertisement monitors match on the company id as sent over the air
    let pattern = Pattern {
        data_type: MANUFACTURER_DATA_TYPE,
        start_position: 0,
        content: ARANET_MANUFACTURER_ID.to_le_bytes().to_vec(),
    };

    let monitor_manager = adapter.monitor().await?;
    let mut monitor_handle = monitor_manager
        .register(Monitor {
            patterns: Some(vec![pattern]),
            ..Default::default()
        })
        .await?;

    info!("Scanning for Aranet devices on {}", adapter.name());

    // The task owns the session so the monitor stays registered
    tokio::spawn(async move {
        let _session = session;
        let _monitor_manager = monitor_manager;

        while let Some(event) = monitor_handle.next().await {
            if let MonitorEvent::DeviceFound(device_id) = event {
                match read_advertisements(&adapter, device_id.device).await {
                    Ok(advertisements) => {
                        for advertisement in advertisements {
                            if tx.send(advertisement).await.is_err() {
                                return;
                            }
                        }
                    }
                    Err(e) => warn!("Failed to read advertisement from {}: {e}", device_id.device),
                }
            }
        }
    });

    Ok(rx)
}

/// One envelope per manufacturer-data entry the device currently advertises.
async fn read_advertisements(
    adapter: &Adapter,
    address: Address,
) -> Result<Vec<RawAdvertisement>, ScanError> {
    let device = adapter.device(address)?;
    let captured_at = SystemTime::now();
    let mac: MacAddress = address.into();

    let Some(manufacturer_data) = device.manufacturer_data().await? else {
        return Ok(Vec::new());
    };
    let rssi = device.rssi().await?;

    Ok(manufacturer_data
        .into_iter()
        .map(|(manufacturer_id, payload)| RawAdvertisement {
            mac,
            manufacturer_id,
            payload,
            rssi,
            captured_at,
        })
        .collect())
}
