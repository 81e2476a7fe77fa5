use super::{
    Cadence, DecodeError, Decoded, DecodedPayload, Radon, battery, frame, humidity_tenths,
    pressure, temperature, u16_at, unless_flagged,
};
use crate::classifier::{Model, TYPED_FRAME_LEN};

const RADON: usize = 8;
const TEMPERATURE: usize = 10;
const PRESSURE: usize = 12;
const HUMIDITY: usize = 14;
const BATTERY: usize = 17;
const INTERVAL: usize = 19;
const AGE: usize = 21;

pub(super) fn decode(payload: &[u8]) -> Result<Decoded, DecodeError> {
    let frame = frame::<TYPED_FRAME_LEN>(payload)?;

    let radon = Radon {
        radon: unless_flagged(u16_at(frame, RADON), 15),
        temperature: temperature(u16_at(frame, TEMPERATURE))?,
        humidity: humidity_tenths(u16_at(frame, HUMIDITY))?,
        pressure: pressure(u16_at(frame, PRESSURE)),
        battery: battery(frame[BATTERY])?,
    };

    Ok(Decoded {
        model: Model::AranetRadon,
        payload: DecodedPayload::Radon(radon),
        cadence: Cadence {
            interval_secs: u16_at(frame, INTERVAL),
            age_secs: u16_at(frame, AGE),
        },
    })
}
