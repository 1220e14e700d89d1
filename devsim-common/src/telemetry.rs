use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Content type attached to every outbound message.
pub const CONTENT_TYPE: &str = "application/json";

/// Content encoding attached to every outbound message.
pub const CONTENT_ENCODING: &str = "utf-8";

/// Upper bound (exclusive) of simulated temperatures, in degrees Celsius.
pub const TEMPERATURE_MAX: f64 = 40.0;

/// Upper bound (exclusive) of simulated relative humidity, in percent.
pub const HUMIDITY_MAX: f64 = 100.0;

/// A single simulated sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reading {
    /// Temperature in degrees Celsius, within `[0, 40)`.
    pub temperature: f64,

    /// Relative humidity in percent, within `[0, 100)`.
    pub humidity: f64,
}

impl Reading {
    pub fn new(temperature: f64, humidity: f64) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// Whether both values fall inside the simulated ranges.
    pub fn in_range(&self) -> bool {
        (0.0..TEMPERATURE_MAX).contains(&self.temperature)
            && (0.0..HUMIDITY_MAX).contains(&self.humidity)
    }
}

/// A serialized reading ready to be sent.
///
/// Each message carries a fresh identifier; nothing is shared between
/// messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Unique message identifier (UUID v4).
    pub message_id: String,

    /// MIME type of the body.
    pub content_type: &'static str,

    /// Character encoding of the body.
    pub content_encoding: &'static str,

    /// JSON body.
    pub body: String,
}

impl OutboundMessage {
    /// Serialize a reading into a new message.
    pub fn from_reading(reading: &Reading) -> Result<Self> {
        Ok(Self {
            message_id: Uuid::new_v4().to_string(),
            content_type: CONTENT_TYPE,
            content_encoding: CONTENT_ENCODING,
            body: serde_json::to_string(reading)?,
        })
    }

    /// Body as raw bytes.
    pub fn payload(&self) -> Vec<u8> {
        self.body.as_bytes().to_vec()
    }

    /// Decode the body back into a reading.
    pub fn reading(&self) -> Result<Reading> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_reading_field_names() {
        let json = serde_json::to_value(Reading::new(21.5, 40.25)).unwrap();
        assert_eq!(json["Temperature"], 21.5);
        assert_eq!(json["Humidity"], 40.25);
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_in_range() {
        assert!(Reading::new(0.0, 0.0).in_range());
        assert!(Reading::new(39.99, 99.99).in_range());
        assert!(!Reading::new(40.0, 50.0).in_range());
        assert!(!Reading::new(20.0, 100.0).in_range());
        assert!(!Reading::new(-0.1, 50.0).in_range());
    }

    #[test]
    fn test_message_metadata() {
        let msg = OutboundMessage::from_reading(&Reading::new(12.0, 55.0)).unwrap();
        assert_eq!(msg.content_type, "application/json");
        assert_eq!(msg.content_encoding, "utf-8");
        assert!(Uuid::parse_str(&msg.message_id).is_ok());
        assert_eq!(msg.reading().unwrap(), Reading::new(12.0, 55.0));
        assert_eq!(msg.payload(), msg.body.as_bytes());
    }

    #[test]
    fn test_message_ids_are_unique() {
        let reading = Reading::new(1.0, 2.0);
        let ids: HashSet<String> = (0..1000)
            .map(|_| OutboundMessage::from_reading(&reading).unwrap().message_id)
            .collect();
        assert_eq!(ids.len(), 1000);
    }
}
