//! Advertisement → reading transform.
//!
//! Each advertisement is classified, decoded and normalized on its own. There
//! is no per-device state here, so a pipeline can be shared between tasks and
//! a bad frame only ever costs that one reading.

use crate::advertisement::RawAdvertisement;
use crate::classifier::{Model, Unrecognized, classify};
use crate::decoder::{DecodeError, decode};
use crate::mac_address::MacAddress;
use crate::reading::{Reading, normalize};
use crate::registry::Registry;
use std::fmt;
use std::sync::Arc;

/// Why an advertisement produced no reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discard {
    /// Not an Aranet frame, or an Aranet frame without readings
    Unrecognized {
        mac: MacAddress,
        reason: Unrecognized,
    },
    /// Recognized frame that failed validation
    Malformed {
        mac: MacAddress,
        model: Model,
        error: DecodeError,
    },
}

impl Discard {
    /// Whether the frame came from an Aranet device.
    ///
    /// Discards of foreign frames are steady-state noise and not worth
    /// reporting even in verbose mode.
    pub fn is_aranet(&self) -> bool {
        match self {
            Discard::Unrecognized { reason, .. } => reason.is_aranet(),
            Discard::Malformed { .. } => true,
        }
    }
}

impl fmt::Display for Discard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discard::Unrecognized { mac, reason } => {
                write!(f, "Unrecognized advertisement from {mac}: {reason}")
            }
            Discard::Malformed { mac, model, error } => {
                write!(f, "Malformed {model} payload from {mac}: {error}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    registry: Arc<Registry>,
}

impl Pipeline {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Turn one advertisement into a reading.
    pub fn process(&self, raw: &RawAdvertisement) -> Result<Reading, Discard> {
        let model = classify(raw.manufacturer_id, &raw.payload).map_err(|reason| {
            Discard::Unrecognized {
                mac: raw.mac,
                reason,
            }
        })?;

        let decoded = decode(model, &raw.payload).map_err(|error| Discard::Malformed {
            mac: raw.mac,
            model,
            error,
        })?;

        Ok(normalize(&self.registry, raw, decoded))
    }
}
