use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

/// A single sample taken by a water-quality sensor.
///
/// The measurement type `M` is used for temperature and humidity.
/// Publishers emit whole numbers ([`IntegerReading`]) while the topic consumer decodes
/// them as floating-point values ([`DecimalReading`]). The two schemas disagree and have
/// always disagreed: any integer payload decodes fine into both, but a fractional
/// temperature is rejected by an [`IntegerReading`] decoder.
///
/// Decoding is lenient: missing fields take their zero value, unknown fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading<M> {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub packet_no: i64,
    #[serde(default)]
    pub temperature: M,
    #[serde(default)]
    pub humidity: M,
    /// Total dissolved solids.
    #[serde(default)]
    pub tds: i64,
    #[serde(default, rename = "pH")]
    pub ph: f64,
}

/// The reading shape produced by every publisher and decoded by the direct consumer.
pub type IntegerReading = SensorReading<i64>;

/// The reading shape decoded by the topic consumer.
pub type DecimalReading = SensorReading<f64>;

impl Default for IntegerReading {
    /// The reading published when nobody asks for anything else.
    fn default() -> Self {
        Self {
            id: 11,
            packet_no: 126,
            temperature: 30,
            humidity: 60,
            tds: 1100,
            ph: 5.0,
        }
    }
}

impl<M: Serialize> SensorReading<M> {
    /// Encode the reading as a JSON payload.
    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl<M: DeserializeOwned + Default> SensorReading<M> {
    /// Decode a reading from a JSON payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

impl<M: fmt::Display> fmt::Display for SensorReading<M> {
    // Precision only affects floating-point measurements: integers print as they are.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, PacketNo: {}, Temperature: {:.2}, Humidity: {:.2}, TDS: {}, pH: {:.2}",
            self.id, self.packet_no, self.temperature, self.humidity, self.tds, self.ph
        )
    }
}
