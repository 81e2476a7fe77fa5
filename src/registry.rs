//! Configured device identities, looked up by MAC address.

use crate::mac_address::MacAddress;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// An operator-configured device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Human-readable name, emitted as the `name` tag
    pub display_name: String,
    /// Key the device was configured under
    pub device_key: String,
}

/// Identity attached to a reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Configured(Arc<DeviceIdentity>),
    /// Device missing from the registry, named after its address
    Unknown(MacAddress),
}

impl Identity {
    pub fn display_name(&self) -> Cow<'_, str> {
        match self {
            Identity::Configured(identity) => Cow::Borrowed(&identity.display_name),
            Identity::Unknown(mac) => Cow::Owned(format!("unknown-{mac}")),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Identity::Configured(_))
    }
}

/// Read-only mapping from address to identity, built once at startup.
///
/// Safe to share between threads without locking.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    devices: HashMap<MacAddress, Arc<DeviceIdentity>>,
}

impl Registry {
    pub fn lookup(&self, mac: &MacAddress) -> Option<&Arc<DeviceIdentity>> {
        self.devices.get(mac)
    }

    /// The configured identity, or a synthetic one carrying the address.
    pub fn resolve(&self, mac: MacAddress) -> Identity {
        match self.lookup(&mac) {
            Some(identity) => Identity::Configured(Arc::clone(identity)),
            None => Identity::Unknown(mac),
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Later entries for the same address replace earlier ones.
impl FromIterator<(MacAddress, DeviceIdentity)> for Registry {
    fn from_iter<T: IntoIterator<Item = (MacAddress, DeviceIdentity)>>(iter: T) -> Self {
        let devices = iter
            .into_iter()
            .map(|(mac, identity)| (mac, Arc::new(identity)))
            .collect();
        Self { devices }
    }
}
