use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Standard gravity in m/s², subtracted from the raw accelerometer magnitude.
pub const STANDARD_GRAVITY: f32 = 9.806_65;

/// One 3-axis accelerometer reading. Arrival time is the processing instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Acceleration magnitude with standard gravity removed.
    /// Near zero for a device at rest, large during an impact.
    pub fn net_magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt() - STANDARD_GRAVITY
    }
}

/// A GPS fix in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// An emergency contact. The only validation is a non-empty phone number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    number: String,
}

impl Contact {
    /// Returns `None` when the number is empty after trimming.
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into().trim().to_string();
        if number.is_empty() {
            None
        } else {
            Some(Self { number })
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

/// What caused a trigger.
#[derive(Clone, Debug, PartialEq)]
pub enum TriggerSource {
    /// Accelerometer magnitude exceeded the fall threshold.
    Fall { magnitude: f32 },
    /// A finalized transcript matched an SOS keyword.
    Voice { phrase: String },
}

impl TriggerSource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fall { .. } => "fall",
            Self::Voice { .. } => "voice",
        }
    }
}

/// An occurrence that may cause an alert. Consumed immediately by the dispatcher.
#[derive(Clone, Debug)]
pub struct TriggerEvent {
    pub source: TriggerSource,
    /// Monotonic arrival instant, used for debounce decisions.
    pub at: Instant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_magnitude_at_rest_is_near_zero() {
        let sample = AccelSample::new(0.0, 0.0, STANDARD_GRAVITY);
        assert!(sample.net_magnitude().abs() < 0.001);
    }

    #[test]
    fn test_net_magnitude_on_impact() {
        let sample = AccelSample::new(12.0, 9.0, 8.0);
        // sqrt(144 + 81 + 64) = sqrt(289) = 17.0
        assert!((sample.net_magnitude() - (17.0 - STANDARD_GRAVITY)).abs() < 0.001);
    }

    #[test]
    fn test_contact_rejects_empty_number() {
        assert!(Contact::new("").is_none());
        assert!(Contact::new("   ").is_none());
        assert_eq!(
            Contact::new(" +911234567890 ").unwrap().number(),
            "+911234567890"
        );
    }

    #[test]
    fn test_trigger_kind_names() {
        assert_eq!(TriggerSource::Fall { magnitude: 6.0 }.kind(), "fall");
        assert_eq!(
            TriggerSource::Voice {
                phrase: "help".to_string()
            }
            .kind(),
            "voice"
        );
    }
}
