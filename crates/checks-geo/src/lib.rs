//! Checks Geo Layer
//!
//! Position-derived data for checklist steps and the flight log.
//!
//! # Core Operations
//!
//! - **Nearest**: haversine lookup of the closest aerodrome within a radius
//!   ([`GeoIndex`])
//! - **Readouts**: altitude, QNH and clock lines a step asks for
//!   ([`sensors::step_readouts`])
//! - **Log**: append, list, edit and delete flight log records
//!   ([`FlightLog`], [`FlightLogger`])
//!
//! # Architecture
//!
//! ```text
//! Position ─► FlightLogger ─┬─► GeoIndex::nearest (speed < limit only)
//!                           └─► FlightLog::append ─► flight_log.csv
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod index;
pub mod log;
pub mod sensors;

// Re-exports for convenience
pub use config::GeoConfig;
pub use error::{LogError, LogResult};
pub use index::{haversine_km, GeoIndex, GeoPoint, EARTH_RADIUS_KM};
pub use log::{FlightLog, FlightLogger, HeaderLanguage, LogEntry, Position};
pub use sensors::{step_readouts, SensorReadings};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
