//! Command line aliases for Aranet devices.
//!
//! `--alias AA:BB:CC:DD:EE:FF=Kitchen` names a device without a config file.
//! Aliases are merged into the registry after the config file, so they win
//! for the same address.

use crate::config::validate_name;
use crate::mac_address::MacAddress;
use crate::registry::DeviceIdentity;

/// A parsed alias mapping a MAC address to a human-readable name.
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub address: MacAddress,
    pub name: String,
}

impl Alias {
    /// Registry entry keyed by the address itself.
    pub fn into_entry(self) -> (MacAddress, DeviceIdentity) {
        (
            self.address,
            DeviceIdentity {
                display_name: self.name,
                device_key: self.address.to_string(),
            },
        )
    }
}

/// Parse an alias from a string in the format "MAC=NAME".
///
/// # Example
/// ```
/// use aranet_listener::alias::parse_alias;
///
/// let alias = parse_alias("AA:BB:CC:DD:EE:FF=Kitchen").unwrap();
/// assert_eq!(alias.address.to_string(), "AA:BB:CC:DD:EE:FF");
/// assert_eq!(alias.name, "Kitchen");
/// ```
pub fn parse_alias(src: &str) -> Result<Alias, String> {
    let (address, name) = src
        .split_once('=')
        .ok_or_else(|| "invalid alias: expected format MAC=NAME".to_string())?;
    let address = address
        .parse::<MacAddress>()
        .map_err(|e| format!("invalid alias: {e}"))?;
    validate_name(name).map_err(|reason| format!("invalid alias: name {reason}"))?;

    Ok(Alias {
        address,
        name: name.to_string(),
    })
}
