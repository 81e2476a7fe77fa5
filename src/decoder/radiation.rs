use super::{
    Cadence, DecodeError, Decoded, DecodedPayload, Radiation, battery, frame, u16_at, u32_at,
};
use crate::classifier::{Model, TYPED_FRAME_LEN};

const TOTAL: usize = 8;
const DURATION: usize = 12;
const RATE: usize = 16;
const BATTERY: usize = 18;
const INTERVAL: usize = 20;
const AGE: usize = 22;

const NANOSIEVERTS_PER_MICROSIEVERT: f64 = 1_000.0;
const NANOSIEVERTS_PER_MILLISIEVERT: f64 = 1_000_000.0;

pub(super) fn decode(payload: &[u8]) -> Result<Decoded, DecodeError> {
    let frame = frame::<TYPED_FRAME_LEN>(payload)?;

    let total = Some(u32_at(frame, TOTAL)).filter(|&v| v != u32::MAX);
    let duration = Some(u32_at(frame, DURATION)).filter(|&v| v != u32::MAX);
    let rate = Some(u16_at(frame, RATE)).filter(|&v| v != u16::MAX);

    let radiation = Radiation {
        rate: rate.map(|nsv| f64::from(nsv) / NANOSIEVERTS_PER_MICROSIEVERT),
        total: total.map(|nsv| f64::from(nsv) / NANOSIEVERTS_PER_MILLISIEVERT),
        duration,
        battery: battery(frame[BATTERY])?,
    };

    Ok(Decoded {
        model: Model::AranetRadiation,
        payload: DecodedPayload::Radiation(radiation),
        cadence: Cadence {
            interval_secs: u16_at(frame, INTERVAL),
            age_secs: u16_at(frame, AGE),
        },
    })
}
