//! Bluetooth device address.
//!
//! Advertisements are attributed to a device by address alone, so the type is
//! kept small and `Copy` to be used directly as a registry and filter key.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A Bluetooth MAC address stored as a compact 6-byte array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// Errors returned when parsing a MAC address string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseMacError {
    #[error("invalid MAC address: expected 6 parts, got {0}")]
    InvalidLength(usize),
    #[error("invalid MAC address: part {0} has wrong length")]
    InvalidPartLength(usize),
    #[error("invalid MAC address: '{0}' is not valid hex")]
    InvalidHex(String),
}

impl FromStr for MacAddress {
    type Err = ParseMacError;

    /// Accepts `AA:BB:CC:DD:EE:FF` and `AA-BB-CC-DD-EE-FF`, in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let separator = if s.contains('-') { '-' } else { ':' };
        let parts: Vec<&str> = s.split(separator).collect();
        if parts.len() != 6 {
            return Err(ParseMacError::InvalidLength(parts.len()));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            if part.len() != 2 {
                return Err(ParseMacError::InvalidPartLength(i));
            }
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|_| ParseMacError::InvalidHex(part.to_string()))?;
        }

        Ok(MacAddress(bytes))
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

#[cfg(feature = "bluer")]
impl From<bluer::Address> for MacAddress {
    fn from(addr: bluer::Address) -> Self {
        Self(addr.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_and_uppercases() {
        let addr = MacAddress([0x0a, 0x01, 0xbc, 0xdd, 0x00, 0xff]);
        assert_eq!(addr.to_string(), "0A:01:BC:DD:00:FF");
    }

    #[test]
    fn test_from_str_colon_and_dash() {
        let expected = MacAddress([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
        assert_eq!("AA:BB:CC:DD:EE:FF".parse::<MacAddress>(), Ok(expected));
        assert_eq!("aa-bb-cc-dd-ee-ff".parse::<MacAddress>(), Ok(expected));
        assert_eq!(" aa:bb:cc:dd:ee:ff ".parse::<MacAddress>(), Ok(expected));
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        let addr = MacAddress([0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC]);
        assert_eq!(addr.to_string().parse::<MacAddress>(), Ok(addr));
    }

    #[test]
    fn test_from_str_invalid() {
        assert_eq!(
            "Aranet4 17C3C".parse::<MacAddress>(),
            Err(ParseMacError::InvalidLength(1))
        );
        assert_eq!(
            "AA:BB:CC".parse::<MacAddress>(),
            Err(ParseMacError::InvalidLength(3))
        );
        assert_eq!(
            "AA:BB:CC:DD:EE:FFF".parse::<MacAddress>(),
            Err(ParseMacError::InvalidPartLength(5))
        );
        assert!(matches!(
            "AA:BB:CC:DD:EE:GG".parse::<MacAddress>(),
            Err(ParseMacError::InvalidHex(_))
        ));
    }
}
