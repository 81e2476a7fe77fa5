//! Bound on per-device filter state.
//!
//! Anyone can broadcast the Aranet company id from a fresh random address on
//! every advertisement, so maps keyed by address must not grow without limit.

use crate::mac_address::MacAddress;
use std::collections::HashMap;

/// Most devices any per-device map remembers at once.
pub(crate) const MAX_TRACKED_DEVICES: usize = 1024;

/// Make room for `mac` by dropping the entry seen longest ago.
///
/// Does nothing if `mac` is already tracked or the map has room.
pub(crate) fn make_room<V, T: Ord>(
    map: &mut HashMap<MacAddress, V>,
    mac: &MacAddress,
    seen_at: impl Fn(&V) -> T,
) {
    if map.len() < MAX_TRACKED_DEVICES || map.contains_key(mac) {
        return;
    }
    let oldest = map
        .iter()
        .min_by_key(|(_, value)| seen_at(value))
        .map(|(mac, _)| *mac);
    if let Some(oldest) = oldest {
        map.remove(&oldest);
    }
}

#[cfg(test)]
pub(crate) fn nth_mac(n: usize) -> MacAddress {
    let [.., a, b, c, d] = (n as u64).to_be_bytes();
    MacAddress([0x02, 0x00, a, b, c, d])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_left_keeps_everything() {
        let mut map: HashMap<MacAddress, usize> = (0..10).map(|i| (nth_mac(i), i)).collect();
        make_room(&mut map, &nth_mac(10), |&seen| seen);
        assert_eq!(map.len(), 10);
    }

    #[test]
    fn test_full_map_drops_oldest() {
        let mut map: HashMap<MacAddress, usize> = (0..MAX_TRACKED_DEVICES)
            .map(|i| (nth_mac(i), i + 100))
            .collect();

        make_room(&mut map, &nth_mac(MAX_TRACKED_DEVICES), |&seen| seen);
        assert_eq!(map.len(), MAX_TRACKED_DEVICES - 1);
        assert!(!map.contains_key(&nth_mac(0)));
        assert!(map.contains_key(&nth_mac(1)));
    }

    #[test]
    fn test_known_device_never_evicts() {
        let mut map: HashMap<MacAddress, usize> =
            (0..MAX_TRACKED_DEVICES).map(|i| (nth_mac(i), i)).collect();
        make_room(&mut map, &nth_mac(5), |&seen| seen);
        assert_eq!(map.len(), MAX_TRACKED_DEVICES);
    }
}
