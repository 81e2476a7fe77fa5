//! Device registry file.
//!
//! ```toml
//! [devices.kitchen]
//! address = "AA:BB:CC:DD:EE:FF"
//! name = "Kitchen"
//! ```

use crate::mac_address::{MacAddress, ParseMacError};
use crate::registry::DeviceIdentity;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("device {key}: {source}")]
    InvalidAddress { key: String, source: ParseMacError },
    #[error("device {key}: name {name:?} {reason}")]
    InvalidName {
        key: String,
        name: String,
        reason: &'static str,
    },
    #[error("devices {first} and {second} share address {address}")]
    DuplicateAddress {
        address: MacAddress,
        first: String,
        second: String,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceConfig>,
}

#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    pub address: String,
    pub name: String,
}

impl TryFrom<&str> for Config {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(toml::from_str(value)?)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::try_from(content.as_str())
    }

    /// Validate the configured devices and pair them with their addresses.
    pub fn entries(&self) -> Result<Vec<(MacAddress, DeviceIdentity)>, ConfigError> {
        let mut seen: HashMap<MacAddress, &str> = HashMap::new();
        let mut entries = Vec::with_capacity(self.devices.len());

        for (key, device) in &self.devices {
            let address: MacAddress =
                device
                    .address
                    .parse()
                    .map_err(|source| ConfigError::InvalidAddress {
                        key: key.clone(),
                        source,
                    })?;
            validate_name(&device.name).map_err(|reason| ConfigError::InvalidName {
                key: key.clone(),
                name: device.name.clone(),
                reason,
            })?;
            if let Some(first) = seen.insert(address, key) {
                return Err(ConfigError::DuplicateAddress {
                    address,
                    first: first.to_string(),
                    second: key.clone(),
                });
            }

            entries.push((
                address,
                DeviceIdentity {
                    display_name: device.name.clone(),
                    device_key: key.clone(),
                },
            ));
        }

        Ok(entries)
    }
}

/// Names end up as tag values. Spaces, commas and `=` are escaped on output,
/// quotes, backslashes and line breaks are rejected here.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        Err("must not be empty")
    } else if name.contains(['"', '\'']) {
        Err("must not contain quotes")
    } else if name.contains('\\') {
        Err("must not contain backslash")
    } else if name.contains(['\n', '\r']) {
        Err("must not contain line breaks")
    } else {
        Ok(())
    }
}
