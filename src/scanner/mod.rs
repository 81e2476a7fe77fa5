//! Bluetooth scanning for Aranet advertisements.
//!
//! The scanner only delivers raw manufacturer data; classification and
//! decoding happen in [`crate::pipeline`].

#[cfg(feature = "bluer")]
pub mod bluer;

use crate::advertisement::RawAdvertisement;
use thiserror::Error;
use tokio::sync::mpsc;

/// Error type for scanner operations.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Bluetooth/adapter related error
    #[error("Bluetooth error: {0}")]
    Bluetooth(String),
    /// Built without a Bluetooth backend
    #[error("Bluetooth support not available (built without the bluer feature)")]
    BackendNotAvailable,
}

/// Channel buffer size for received advertisements.
pub const ADVERTISEMENT_CHANNEL_BUFFER_SIZE: usize = 100;

/// Start a passive scan for Aranet advertisements.
///
/// `adapter` selects a Bluetooth adapter by name (e.g. `hci1`); `None` uses
/// the system default. The scan runs until the returned receiver is dropped
/// or the process exits.
pub async fn start_scan(
    adapter: Option<&str>,
) -> Result<mpsc::Receiver<RawAdvertisement>, ScanError> {
    #[cfg(feature = "bluer")]
    return bluer::start_scan(adapter).await;

    #[cfg(not(feature = "bluer"))]
    {
        let _ = adapter;
        Err(ScanError::BackendNotAvailable)
    }
}
