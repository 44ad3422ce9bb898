//! Flight log record codec
//!
//! One record per line, six `;`-separated fields:
//!
//! ```text
//! 2024-05-01T09:30:05Z;40.471900;-3.562600;609.6;LEMD;Engine start
//! ```

use crate::error::LogError;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Field separator
pub const SEPARATOR: char = ';';

/// Timestamp layout
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One logged event
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// When the event was logged, second precision
    pub timestamp: DateTime<Utc>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// GPS altitude in meters
    pub altitude_m: f64,
    /// Nearby aerodrome, if one was matched
    pub aerodrome: Option<String>,
    /// Free text
    pub text: String,
}

impl LogEntry {
    /// Create entry without an aerodrome tag
    pub fn new(
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        altitude_m: f64,
        text: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            altitude_m,
            aerodrome: None,
            text: text.into(),
        }
    }

    /// Tag with an aerodrome identifier
    #[must_use]
    pub fn with_aerodrome(mut self, aerodrome: impl Into<String>) -> Self {
        self.aerodrome = Some(aerodrome.into());
        self
    }

    /// Encoded line, without the trailing newline
    #[must_use]
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ts};{lat:.6};{lon:.6};{alt:.1};{icao};{text}",
            ts = self.timestamp.format(TIMESTAMP_FORMAT),
            lat = self.latitude,
            lon = self.longitude,
            alt = self.altitude_m,
            icao = self.aerodrome.as_deref().unwrap_or(""),
            text = sanitize(&self.text),
        )
    }
}

impl FromStr for LogEntry {
    type Err = LogError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.splitn(6, SEPARATOR).collect();
        let &[timestamp, latitude, longitude, altitude, aerodrome, text] = fields.as_slice() else {
            return Err(LogError::malformed(format!("expected 6 fields, got {}", fields.len())));
        };

        let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| LogError::malformed(format!("timestamp '{timestamp}': {e}")))?
            .and_utc();
        let number = |field: &str, name: &str| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|_| LogError::malformed(format!("{name} '{field}'")))
        };

        Ok(Self {
            timestamp,
            latitude: number(latitude, "latitude")?,
            longitude: number(longitude, "longitude")?,
            altitude_m: number(altitude, "altitude")?,
            aerodrome: Some(aerodrome.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            text: text.to_string(),
        })
    }
}

/// Free text with separators and line breaks replaced
fn sanitize(text: &str) -> String {
    text.replace(SEPARATOR, ",").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap()
    }

    #[test]
    fn encodes_fixed_precision() {
        let entry = LogEntry::new(at(), 40.4719, -3.5626, 609.64, "Engine start").with_aerodrome("LEMD");
        assert_eq!(
            entry.to_line(),
            "2024-05-01T09:30:05Z;40.471900;-3.562600;609.6;LEMD;Engine start"
        );
    }

    #[test]
    fn separator_in_text_is_replaced() {
        let entry = LogEntry::new(at(), 0.0, 0.0, 0.0, "a;b\nc");
        assert_eq!(entry.to_line(), "2024-05-01T09:30:05Z;0.000000;0.000000;0.0;;a,b c");
    }

    #[test]
    fn parses_encoded_line() {
        let line = "2024-05-01T09:30:05Z;40.471900;-3.562600;609.6;;Taxi";
        let entry: LogEntry = line.parse().unwrap();
        assert_eq!(entry.timestamp, at());
        assert_eq!(entry.aerodrome, None);
        assert_eq!(entry.text, "Taxi");
        assert!((entry.altitude_m - 609.6).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_lines() {
        assert!("Hora UTC;Latitud;Longitud;Altitud (m);OACI;Texto".parse::<LogEntry>().is_err());
        assert!("2024-05-01T09:30:05Z;x;0;0;;t".parse::<LogEntry>().is_err());
        assert!("2024-05-01T09:30:05Z;0;0".parse::<LogEntry>().is_err());
    }
}
