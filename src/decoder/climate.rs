use super::{
    Cadence, Climate, DecodeError, Decoded, DecodedPayload, Humidity, battery, frame,
    humidity_tenths, out_of_range, pressure, temperature, u16_at, unless_flagged,
};
use crate::classifier::{ARANET4_FRAME_LEN, Model, TYPED_FRAME_LEN};

// Aranet4: 0 flags, 1..4 firmware version, 4..8 reserved
const A4_CO2: usize = 8;
const A4_TEMPERATURE: usize = 10;
const A4_PRESSURE: usize = 12;
const A4_HUMIDITY: usize = 14;
const A4_BATTERY: usize = 15;
const A4_INTERVAL: usize = 17;
const A4_AGE: usize = 19;

// Aranet2: 0 device type, 1 flags, 2..8 version and reserved
const A2_TEMPERATURE: usize = 10;
const A2_HUMIDITY: usize = 14;
const A2_BATTERY: usize = 16;
const A2_INTERVAL: usize = 18;
const A2_AGE: usize = 20;

pub(super) fn decode_aranet4(payload: &[u8]) -> Result<Decoded, DecodeError> {
    let frame = frame::<ARANET4_FRAME_LEN>(payload)?;

    let humidity = match frame[A4_HUMIDITY] {
        raw if raw & 0x80 != 0 => None,
        raw if raw > 100 => return Err(out_of_range("humidity", raw)),
        raw => Some(Humidity::Percent(raw)),
    };

    let climate = Climate {
        co2: unless_flagged(u16_at(frame, A4_CO2), 15),
        temperature: temperature(u16_at(frame, A4_TEMPERATURE))?,
        humidity,
        pressure: pressure(u16_at(frame, A4_PRESSURE)),
        battery: battery(frame[A4_BATTERY])?,
    };

    Ok(Decoded {
        model: Model::Aranet4,
        payload: DecodedPayload::Climate(climate),
        cadence: Cadence {
            interval_secs: u16_at(frame, A4_INTERVAL),
            age_secs: u16_at(frame, A4_AGE),
        },
    })
}

pub(super) fn decode_aranet2(payload: &[u8]) -> Result<Decoded, DecodeError> {
    let frame = frame::<TYPED_FRAME_LEN>(payload)?;

    let climate = Climate {
        co2: None,
        temperature: temperature(u16_at(frame, A2_TEMPERATURE))?,
        humidity: humidity_tenths(u16_at(frame, A2_HUMIDITY))?,
        pressure: None,
        battery: battery(frame[A2_BATTERY])?,
    };

    Ok(Decoded {
        model: Model::Aranet2,
        payload: DecodedPayload::Climate(climate),
        cadence: Cadence {
            interval_secs: u16_at(frame, A2_INTERVAL),
            age_secs: u16_at(frame, A2_AGE),
        },
    })
}
