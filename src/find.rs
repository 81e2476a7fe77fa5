//! Discovery mode: list Aranet devices in range so they can be configured.

use crate::advertisement::RawAdvertisement;
use crate::classifier::{Model, Unrecognized, classify};
use crate::mac_address::MacAddress;
use crate::registry::{DeviceIdentity, Registry};
use crate::capacity::make_room;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// A device seen for the first time.
#[derive(Debug, Clone, PartialEq)]
pub enum Discovery {
    Configured {
        mac: MacAddress,
        model: Model,
        identity: Arc<DeviceIdentity>,
    },
    New {
        mac: MacAddress,
        model: Model,
    },
    /// Aranet frame that carries no readings, e.g. integrations switched off
    Unreadable {
        mac: MacAddress,
        reason: Unrecognized,
    },
}

impl fmt::Display for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discovery::Configured {
                mac,
                model,
                identity,
            } => write!(
                f,
                "Found configured {model} device {} at {mac}",
                identity.display_name
            ),
            Discovery::New { mac, model } => write!(f, "Found new {model} device at {mac}"),
            Discovery::Unreadable { mac, reason } => {
                write!(f, "Found unreadable Aranet device at {mac}: {reason}")
            }
        }
    }
}

/// Reports each Aranet device once, at its first recognizable broadcast.
#[derive(Debug)]
pub struct FindObserver {
    registry: Arc<Registry>,
    seen: HashMap<MacAddress, SystemTime>,
    unreadable: HashMap<MacAddress, SystemTime>,
}

impl FindObserver {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            seen: HashMap::new(),
            unreadable: HashMap::new(),
        }
    }

    pub fn observe(&mut self, raw: &RawAdvertisement) -> Option<Discovery> {
        if self.seen.contains_key(&raw.mac) {
            return None;
        }

        match classify(raw.manufacturer_id, &raw.payload) {
            Ok(model) => {
                make_room(&mut self.seen, &raw.mac, |&at| at);
                self.seen.insert(raw.mac, raw.captured_at);
                Some(match self.registry.lookup(&raw.mac) {
                    Some(identity) => Discovery::Configured {
                        mac: raw.mac,
                        model,
                        identity: Arc::clone(identity),
                    },
                    None => Discovery::New {
                        mac: raw.mac,
                        model,
                    },
                })
            }
            // Reported once, but the device may still be switched to broadcast
            // readings while we watch
            Err(reason) if reason.is_aranet() && !self.unreadable.contains_key(&raw.mac) => {
                make_room(&mut self.unreadable, &raw.mac, |&at| at);
                self.unreadable.insert(raw.mac, raw.captured_at);
                Some(Discovery::Unreadable {
                    mac: raw.mac,
                    reason,
                })
            }
            Err(_) => None,
        }
    }
}
