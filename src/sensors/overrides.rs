use crate::sensors::IntegerReading;
use std::str::FromStr;
use tracing::warn;

/// Raw, caller-supplied replacements for the fields of a reading.
///
/// Each field is parsed on its own when applied: a value that does not parse is reported
/// and the corresponding field of the base reading is kept, without affecting the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingOverrides {
    pub id: Option<String>,
    pub packet_no: Option<String>,
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    pub tds: Option<String>,
    pub ph: Option<String>,
}

impl ReadingOverrides {
    /// Apply the overrides on top of `base`.
    pub fn apply(&self, base: IntegerReading) -> IntegerReading {
        IntegerReading {
            id: parse_or_keep("id", self.id.as_deref(), base.id),
            packet_no: parse_or_keep("packet_no", self.packet_no.as_deref(), base.packet_no),
            temperature: parse_or_keep("temperature", self.temperature.as_deref(), base.temperature),
            humidity: parse_or_keep("humidity", self.humidity.as_deref(), base.humidity),
            tds: parse_or_keep("tds", self.tds.as_deref(), base.tds),
            ph: parse_ph_or_keep(self.ph.as_deref(), base.ph),
        }
    }
}

fn parse_or_keep<T>(field: &str, raw: Option<&str>, current: T) -> T
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let Some(raw) = raw else {
        return current;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            warn!(field = field, value = raw, default = %current, "Invalid {}, using default: {}", field, e);
            current
        }
    }
}

// NaN and infinities parse as f64 but have no JSON representation.
fn parse_ph_or_keep(raw: Option<&str>, current: f64) -> f64 {
    let parsed = parse_or_keep("pH", raw, current);
    if parsed.is_finite() {
        parsed
    } else {
        warn!(field = "pH", value = ?raw, default = %current, "Invalid pH, using default: not a finite number");
        current
    }
}
