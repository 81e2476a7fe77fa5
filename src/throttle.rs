//! Per-device output throttling.
//!
//! Aranet devices re-broadcast the same measurement every few seconds while
//! measuring only once per interval. The throttle caps how often a single
//! device may produce an output line.

use crate::capacity::make_room;
use crate::mac_address::MacAddress;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Allows at most one event per `interval` for each device.
///
/// The first event for a device is always allowed.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_seen: HashMap<MacAddress, Instant>,
}

impl Throttle {
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use aranet_listener::throttle::Throttle;
    ///
    /// let throttle = Throttle::new(Duration::from_secs(3));
    /// ```
    pub fn new(interval: Duration) -> Self {
        Throttle {
            interval,
            last_seen: HashMap::new(),
        }
    }

    /// Returns `true` and restarts the device's timer if the event may pass.
    pub fn should_emit(&mut self, mac: MacAddress) -> bool {
        self.should_emit_at(mac, Instant::now())
    }

    fn should_emit_at(&mut self, mac: MacAddress, now: Instant) -> bool {
        match self.last_seen.get(&mac) {
            Some(last) if now.saturating_duration_since(*last) < self.interval => false,
            _ => {
                make_room(&mut self.last_seen, &mac, |&last| last);
                self.last_seen.insert(mac, now);
                true
            }
        }
    }
}

/// Parse a duration from a human-readable string.
///
/// Supports `ms`, `s`, `m` and `h` suffixes; a bare number is seconds.
///
/// # Examples
/// ```
/// use aranet_listener::throttle::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
/// assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
/// assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
/// ```
pub fn parse_duration(src: &str) -> Result<Duration, String> {
    let src = src.trim();

    if src.is_empty() {
        return Err("empty duration string".to_string());
    }

    let (number, unit, multiplier) = if let Some(num) = src.strip_suffix("ms") {
        (num, "milliseconds", 0)
    } else if let Some(num) = src.strip_suffix('h') {
        (num, "hours", 3600)
    } else if let Some(num) = src.strip_suffix('m') {
        (num, "minutes", 60)
    } else if let Some(num) = src.strip_suffix('s') {
        (num, "seconds", 1)
    } else {
        (src, "duration", 1)
    };

    let value: u64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid {unit}: {number}"))?;

    if multiplier == 0 {
        Ok(Duration::from_millis(value))
    } else {
        value
            .checked_mul(multiplier)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("{unit} out of range: {number}"))
    }
}
