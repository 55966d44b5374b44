//! ThingSpeak wire payload encoding
//!
//! ThingSpeak channel updates are `key=value` pairs joined with `&`:
//! `field1={temperature}&field2={humidity}&field3={co2}`. Encoding is a
//! total, deterministic function; every valid reading encodes.

use super::reading::SensorReading;

/// Encode a reading into the ThingSpeak publish payload
pub fn encode(reading: &SensorReading) -> String {
    format!(
        "field1={}&field2={}&field3={}",
        reading.temperature, reading.humidity, reading.co2
    )
}
