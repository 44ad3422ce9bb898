//! Position-aware logging

use super::{FlightLog, LogEntry};
use crate::config::GeoConfig;
use crate::error::LogResult;
use crate::index::GeoIndex;
use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;

/// GPS fix supplied by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude in meters
    pub altitude_m: f64,
    /// Ground speed in km/h, if known
    pub speed_kmh: Option<f64>,
}

impl Position {
    /// Fix without speed
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, altitude_m: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_m,
            speed_kmh: None,
        }
    }

    /// Set ground speed
    #[must_use]
    pub const fn with_speed(mut self, speed_kmh: f64) -> Self {
        self.speed_kmh = Some(speed_kmh);
        self
    }
}

/// Writes log entries tagged with the nearest aerodrome
#[derive(Debug)]
pub struct FlightLogger {
    log: FlightLog,
    index: Arc<GeoIndex>,
    config: GeoConfig,
}

impl FlightLogger {
    /// Create logger
    pub fn new(log: FlightLog, index: Arc<GeoIndex>, config: GeoConfig) -> Self {
        Self { log, index, config }
    }

    /// Underlying log
    #[inline]
    #[must_use]
    pub fn log(&self) -> &FlightLog {
        &self.log
    }

    /// Aerodrome to tag a fix with
    ///
    /// Only a slow-moving fix with a known speed is matched, so entries made
    /// in flight over an aerodrome stay untagged.
    #[must_use]
    pub fn aerodrome_for(&self, position: &Position) -> Option<&str> {
        let speed = position.speed_kmh?;
        if speed >= self.config.max_speed_kmh {
            return None;
        }
        self.index.nearest(
            position.latitude,
            position.longitude,
            self.config.max_distance_km,
        )
    }

    /// Build and append an entry for `position` at time `at`
    pub async fn record_at(
        &self,
        position: &Position,
        text: &str,
        at: DateTime<Utc>,
    ) -> LogResult<LogEntry> {
        let mut entry = LogEntry::new(
            at.trunc_subsecs(0),
            position.latitude,
            position.longitude,
            position.altitude_m,
            text,
        );
        if let Some(aerodrome) = self.aerodrome_for(position) {
            entry = entry.with_aerodrome(aerodrome);
        }
        self.log.append(&entry).await?;
        tracing::info!(
            aerodrome = entry.aerodrome.as_deref().unwrap_or("-"),
            "logged event '{}'",
            entry.text
        );
        Ok(entry)
    }

    /// [`record_at`](Self::record_at) the current time
    pub async fn record(&self, position: &Position, text: &str) -> LogResult<LogEntry> {
        self.record_at(position, text, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::GeoPoint;

    fn logger(path: std::path::PathBuf) -> FlightLogger {
        let index = GeoIndex::new(vec![GeoPoint::new("LEMD", 40.4719, -3.5626)]);
        FlightLogger::new(FlightLog::new(path), Arc::new(index), GeoConfig::default())
    }

    #[test]
    fn speed_gates_aerodrome_match() {
        let logger = logger("unused.csv".into());
        let here = Position::new(40.4719, -3.5626, 600.0);

        assert_eq!(logger.aerodrome_for(&here), None);
        assert_eq!(logger.aerodrome_for(&here.with_speed(12.0)), Some("LEMD"));
        assert_eq!(logger.aerodrome_for(&here.with_speed(40.0)), None);
    }

    #[test]
    fn radius_gates_aerodrome_match() {
        let logger = logger("unused.csv".into());
        let far = Position::new(40.6, -3.5626, 600.0).with_speed(0.0);
        assert_eq!(logger.aerodrome_for(&far), None);
    }
}
