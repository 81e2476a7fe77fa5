//! Suppression of re-broadcast measurements.
//!
//! Between two measurements a device keeps advertising the last one with a
//! growing age. Only the first sighting of each measurement is new data.

use crate::capacity::make_room;
use crate::decoder::{Cadence, DecodedPayload};
use crate::mac_address::MacAddress;
use crate::reading::Reading;
use std::collections::HashMap;
use std::time::SystemTime;

#[derive(Debug)]
struct Seen {
    payload: DecodedPayload,
    cadence: Cadence,
    captured_at: SystemTime,
}

#[derive(Debug, Default)]
pub struct RepeatFilter {
    last: HashMap<MacAddress, Seen>,
}

impl RepeatFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `reading` re-announces the measurement last seen from
    /// the same device. Otherwise remembers it and returns `false`.
    pub fn is_repeat(&mut self, reading: &Reading) -> bool {
        let repeat = self
            .last
            .get(&reading.mac)
            .is_some_and(|seen| seen.is_repeated_by(reading));

        if !repeat {
            make_room(&mut self.last, &reading.mac, |seen| seen.captured_at);
            self.last.insert(
                reading.mac,
                Seen {
                    payload: reading.payload.clone(),
                    cadence: reading.cadence,
                    captured_at: reading.captured_at,
                },
            );
        }
        repeat
    }
}

impl Seen {
    fn is_repeated_by(&self, newer: &Reading) -> bool {
        if self.payload != newer.payload {
            return false;
        }

        // Age went down: the device took a new measurement with equal values
        if newer.cadence.age_secs < self.cadence.age_secs {
            return false;
        }

        // Interval changed on the device; values are unchanged so call it a repeat
        if newer.cadence.interval_secs != self.cadence.interval_secs {
            return true;
        }

        let elapsed = newer
            .captured_at
            .duration_since(self.captured_at)
            .unwrap_or_default();
        elapsed.as_secs() <= u64::from(newer.cadence.interval_secs)
    }
}
