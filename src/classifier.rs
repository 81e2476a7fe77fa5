//! Recognition of Aranet advertisement frames.
//!
//! Frames are fixed-width per model, so the manufacturer id plus the payload
//! length (and, for the 24-byte frames, the device type byte) pick the
//! decoder. Anything else is rejected rather than guessed at.

use std::fmt;
use thiserror::Error;

/// SAF Tehnika company identifier used by all Aranet devices.
pub const ARANET_MANUFACTURER_ID: u16 = 0x0702;

/// Aranet4 frame with smart home integrations enabled.
pub const ARANET4_FRAME_LEN: usize = 22;

/// Aranet4 frame with smart home integrations disabled. Carries no readings.
pub const ARANET4_BASIC_FRAME_LEN: usize = 7;

/// Frame length shared by Aranet2, Aranet Radiation and Aranet Radon.
pub const TYPED_FRAME_LEN: usize = 24;

const TYPE_ARANET2: u8 = 1;
const TYPE_RADIATION: u8 = 2;
const TYPE_RADON: u8 = 3;

/// Sensor product line, one per wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    Aranet4,
    Aranet2,
    AranetRadon,
    AranetRadiation,
}

impl Model {
    /// Device family, i.e. the shape of the decoded payload.
    pub fn family(self) -> DeviceFamily {
        match self {
            Model::Aranet4 | Model::Aranet2 => DeviceFamily::Climate,
            Model::AranetRadon => DeviceFamily::Radon,
            Model::AranetRadiation => DeviceFamily::Radiation,
        }
    }

    /// Value of the `device` tag in line protocol output.
    pub fn tag(self) -> &'static str {
        match self {
            Model::Aranet4 => "aranet4",
            Model::Aranet2 => "aranet2",
            Model::AranetRadon => "aranet_radon",
            Model::AranetRadiation => "aranet_radiation",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    Climate,
    Radon,
    Radiation,
}

/// Why a frame was not recognized.
///
/// Only [`Unrecognized::UnknownManufacturer`] is routine traffic; the other
/// variants come from Aranet devices and are worth a diagnostic line.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unrecognized {
    #[error("unknown manufacturer id 0x{0:04x}")]
    UnknownManufacturer(u16),
    #[error("smart home integrations are disabled on the device")]
    IntegrationsDisabled,
    #[error("unexpected Aranet payload length {0}")]
    UnexpectedLength(usize),
    #[error("unknown Aranet device type {0}")]
    UnknownDeviceType(u8),
}

impl Unrecognized {
    /// True when the frame carried the Aranet manufacturer id.
    pub fn is_aranet(&self) -> bool {
        !matches!(self, Unrecognized::UnknownManufacturer(_))
    }
}

/// Select the model whose layout `payload` follows.
pub fn classify(manufacturer_id: u16, payload: &[u8]) -> Result<Model, Unrecognized> {
    if manufacturer_id != ARANET_MANUFACTURER_ID {
        return Err(Unrecognized::UnknownManufacturer(manufacturer_id));
    }

    match payload.len() {
        ARANET4_FRAME_LEN => Ok(Model::Aranet4),
        ARANET4_BASIC_FRAME_LEN => Err(Unrecognized::IntegrationsDisabled),
        TYPED_FRAME_LEN => match payload[0] {
            TYPE_ARANET2 => Ok(Model::Aranet2),
            TYPE_RADIATION => Ok(Model::AranetRadiation),
            TYPE_RADON => Ok(Model::AranetRadon),
            other => Err(Unrecognized::UnknownDeviceType(other)),
        },
        len => Err(Unrecognized::UnexpectedLength(len)),
    }
}
