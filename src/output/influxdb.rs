//! InfluxDB line protocol output formatter.

use crate::decoder::{DecodedPayload, Humidity};
use crate::output::OutputFormatter;
use crate::reading::Reading;
use std::fmt;

/// Field values for InfluxDB line protocol
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Integer(num) => write!(f, "{num}i"),
            FieldValue::Float(num) => write!(f, "{num}"),
        }
    }
}

/// Data point in InfluxDB line protocol.
///
/// Tags and fields are written in insertion order.
#[derive(Debug)]
pub struct DataPoint<'a> {
    pub measurement: &'a str,
    pub tag_set: Vec<(&'static str, String)>,
    pub field_set: Vec<(&'static str, FieldValue)>,
    pub timestamp: u128,
}

fn escape(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape a tag value: commas, equals signs and spaces get a backslash.
pub fn escape_tag(value: &str) -> String {
    escape(value, &[',', '=', ' '])
}

/// Escape a measurement name: commas and spaces get a backslash.
pub fn escape_measurement(value: &str) -> String {
    escape(value, &[',', ' '])
}

fn fmt_tags(data_point: &DataPoint, fmt: &mut fmt::Formatter) -> fmt::Result {
    for (key, value) in data_point.tag_set.iter() {
        write!(fmt, ",{}={}", key, escape_tag(value))?;
    }
    Ok(())
}

fn fmt_fields(data_point: &DataPoint, fmt: &mut fmt::Formatter) -> fmt::Result {
    let mut first = true;
    for (key, value) in data_point.field_set.iter() {
        if first {
            first = false;
        } else {
            write!(fmt, ",")?;
        }
        write!(fmt, "{}={}", key, value)?;
    }
    Ok(())
}

impl fmt::Display for DataPoint<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", escape_measurement(self.measurement))?;
        fmt_tags(self, fmt)?;
        write!(fmt, " ")?;
        fmt_fields(self, fmt)?;
        write!(fmt, " {}", self.timestamp)
    }
}

/// InfluxDB line protocol formatter.
///
/// Produces lines like
/// `aranet,name=Kitchen,device=aranet4 co2=485i,temperature=15.9,... 1000000000000000000`.
pub struct InfluxDbFormatter {
    /// The measurement name in InfluxDB
    measurement_name: String,
}

impl InfluxDbFormatter {
    pub fn new(measurement_name: String) -> Self {
        Self { measurement_name }
    }

    fn tag_set(&self, reading: &Reading) -> Vec<(&'static str, String)> {
        vec![
            ("name", reading.identity.display_name().into_owned()),
            ("device", reading.model.tag().to_string()),
        ]
    }

    /// Only fields with values are included.
    fn field_set(&self, reading: &Reading) -> Vec<(&'static str, FieldValue)> {
        let mut fields = Vec::with_capacity(8);

        macro_rules! int {
            ($name:literal, $val:expr) => {
                if let Some(v) = $val {
                    fields.push(($name, FieldValue::Integer(i64::from(v))));
                }
            };
        }
        macro_rules! float {
            ($name:literal, $val:expr) => {
                if let Some(v) = $val {
                    fields.push(($name, FieldValue::Float(v)));
                }
            };
        }

        let (temperature, humidity, pressure, battery) = match &reading.payload {
            DecodedPayload::Climate(c) => {
                int!("co2", c.co2);
                (c.temperature, c.humidity, c.pressure, c.battery)
            }
            DecodedPayload::Radon(r) => {
                int!("radon", r.radon);
                (r.temperature, r.humidity, r.pressure, r.battery)
            }
            DecodedPayload::Radiation(r) => {
                float!("radiation_rate", r.rate);
                float!("radiation_total", r.total);
                int!("radiation_duration", r.duration);
                (None, None, None, r.battery)
            }
        };

        float!("temperature", temperature);
        match humidity {
            Some(Humidity::Percent(v)) => {
                fields.push(("humidity", FieldValue::Integer(v.into())));
            }
            Some(h @ Humidity::Tenths(_)) => {
                fields.push(("humidity", FieldValue::Float(h.percent())));
            }
            None => {}
        }
        float!("pressure", pressure);
        int!("battery", Some(battery));
        int!("rssi", reading.rssi);

        fields
    }

    fn to_data_point<'a>(&'a self, reading: &Reading) -> DataPoint<'a> {
        DataPoint {
            measurement: &self.measurement_name,
            tag_set: self.tag_set(reading),
            field_set: self.field_set(reading),
            timestamp: reading.timestamp_nanos(),
        }
    }
}

impl OutputFormatter for InfluxDbFormatter {
    fn format(&self, reading: &Reading) -> String {
        self.to_data_point(reading).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mac_address::MacAddress;
    use crate::pipeline::Pipeline;
    use crate::registry::Registry;
    use crate::test_utils::{
        TEST_MAC, advertisement, aranet2_payload, aranet4_payload, identity, radiation_payload,
        radon_payload,
    };
    use std::sync::Arc;

    fn format(name: &str, payload: Vec<u8>) -> String {
        let registry: Registry = [(TEST_MAC, identity("device", name))].into_iter().collect();
        let reading = Pipeline::new(Arc::new(registry))
            .process(&advertisement(TEST_MAC, payload))
            .unwrap();
        InfluxDbFormatter::new("aranet".to_string()).format(&reading)
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::Float(2.5).to_string(), "2.5");
        assert_eq!(FieldValue::Float(1010.0).to_string(), "1010");
        assert_eq!(FieldValue::Integer(-65).to_string(), "-65i");
    }

    #[test]
    fn test_escape_tag() {
        assert_eq!(escape_tag("Kitchen"), "Kitchen");
        assert_eq!(escape_tag("Dining room"), "Dining\\ room");
        assert_eq!(escape_tag("a,b=c"), "a\\,b\\=c");
    }

    #[test]
    fn test_escape_measurement() {
        assert_eq!(escape_measurement("aranet"), "aranet");
        assert_eq!(escape_measurement("air quality,home"), "air\\ quality\\,home");
        // equals signs are only special in tags
        assert_eq!(escape_measurement("a=b"), "a=b");
    }

    #[test]
    fn test_measurement_name_is_escaped() {
        let registry: Registry = [(TEST_MAC, identity("kitchen", "Kitchen"))]
            .into_iter()
            .collect();
        let reading = Pipeline::new(Arc::new(registry))
            .process(&advertisement(TEST_MAC, aranet4_payload()))
            .unwrap();
        let line = InfluxDbFormatter::new("air quality,home".to_string()).format(&reading);
        assert!(line.starts_with("air\\ quality\\,home,name=Kitchen,device=aranet4 "));
    }

    #[test]
    fn test_data_point_keeps_insertion_order() {
        let data_point = DataPoint {
            measurement: "test",
            tag_set: vec![("zeta", "1".into()), ("alpha", "2".into())],
            field_set: vec![("b", FieldValue::Integer(1)), ("a", FieldValue::Float(0.5))],
            timestamp: 42,
        };
        assert_eq!(data_point.to_string(), "test,zeta=1,alpha=2 b=1i,a=0.5 42");
    }

    #[test]
    fn test_aranet4_line() {
        assert_eq!(
            format("Kitchen", aranet4_payload()),
            "aranet,name=Kitchen,device=aranet4 \
             co2=485i,temperature=15.9,humidity=53i,pressure=1008.7,battery=60i,rssi=-65i \
             1000000000000000000"
        );
    }

    #[test]
    fn test_floats_keep_full_sensor_resolution() {
        let mut payload = aranet4_payload();
        payload[10..12].copy_from_slice(&453u16.to_le_bytes()); // temperature, 1/20 °C
        payload[12..14].copy_from_slice(&10100u16.to_le_bytes()); // pressure, 1/10 hPa
        let line = format("Kitchen", payload);

        assert!(line.contains(",temperature=22.65,"));
        assert!(line.contains(",pressure=1010,"));
    }

    #[test]
    fn test_name_with_space_is_escaped() {
        let line = format("Dining room", aranet4_payload());
        assert!(line.starts_with("aranet,name=Dining\\ room,device=aranet4 "));
    }

    #[test]
    fn test_radiation_line() {
        assert_eq!(
            format("Bunker", radiation_payload()),
            "aranet,name=Bunker,device=aranet_radiation \
             radiation_rate=0.03,radiation_total=0.000048,radiation_duration=3420i,\
             battery=100i,rssi=-65i \
             1000000000000000000"
        );
    }

    #[test]
    fn test_radon_line() {
        assert_eq!(
            format("Basement", radon_payload()),
            "aranet,name=Basement,device=aranet_radon \
             radon=45i,temperature=21.8,humidity=45.2,pressure=1010,battery=88i,rssi=-65i \
             1000000000000000000"
        );
    }

    #[test]
    fn test_aranet2_line_omits_missing_sensors() {
        let line = format("Sauna", aranet2_payload());
        assert_eq!(
            line,
            "aranet,name=Sauna,device=aranet2 \
             temperature=21.35,humidity=48.7,battery=93i,rssi=-65i 1000000000000000000"
        );
        assert!(!line.contains("co2="));
        assert!(!line.contains("pressure="));
    }

    #[test]
    fn test_unknown_device_and_missing_rssi() {
        let other = MacAddress([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        let mut raw = advertisement(other, aranet4_payload());
        raw.rssi = None;
        let reading = Pipeline::new(Arc::new(Registry::default()))
            .process(&raw)
            .unwrap();
        let line = InfluxDbFormatter::new("aranet".to_string()).format(&reading);

        assert!(line.starts_with("aranet,name=unknown-11:22:33:44:55:66,device=aranet4 "));
        assert!(!line.contains("rssi="));
        assert!(line.contains(",battery=60i "));
    }
}
