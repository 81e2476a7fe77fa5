//! `aranet-listener` library.
//!
//! The binary (`src/main.rs`) is responsible for logging setup and process exit codes.
//! Advertisements flow through [`crate::pipeline`] (classify, decode, normalize)
//! and the run loop in [`crate::app`] filters and prints the resulting readings.

pub mod advertisement;
pub mod alias;
pub mod app;
mod capacity;
pub mod classifier;
pub mod config;
pub mod decoder;
pub mod find;
pub mod mac_address;
pub mod output;
pub mod pipeline;
pub mod reading;
pub mod registry;
pub mod repeat;
pub mod scanner;
pub mod throttle;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types at the crate root
pub use advertisement::RawAdvertisement;
pub use alias::{Alias, parse_alias};
pub use classifier::{DeviceFamily, Model, Unrecognized, classify};
pub use config::{Config, ConfigError};
pub use decoder::{DecodeError, Decoded, DecodedPayload, decode};
pub use mac_address::MacAddress;
pub use output::OutputFormatter;
pub use output::influxdb::InfluxDbFormatter;
pub use pipeline::{Discard, Pipeline};
pub use reading::{Reading, normalize};
pub use registry::{DeviceIdentity, Identity, Registry};
pub use scanner::ScanError;
pub use throttle::{Throttle, parse_duration};
