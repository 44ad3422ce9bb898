//! Sensor conversions and step readouts
//!
//! Values come from the host (GPS altitude, barometric pressure, clock);
//! this module only converts and formats them for the units a step asks for.

use checks_catalog::{AltitudeUnit, PressureUnit, Step};
use chrono::{DateTime, Local, Utc};

/// Feet per meter
pub const FEET_PER_METER: f64 = 3.28084;

/// Inches of mercury per hectopascal
pub const INHG_PER_HPA: f64 = 0.02953;

/// Sea-level pressure from station pressure and altitude (ICAO barometric formula)
#[must_use]
pub fn qnh_hpa(pressure_hpa: f64, altitude_m: f64) -> f64 {
    pressure_hpa * (1.0 + altitude_m / 44330.77).powf(5.255)
}

/// Meters to feet
#[inline]
#[must_use]
pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

/// Hectopascals to inches of mercury
#[inline]
#[must_use]
pub fn hpa_to_inhg(hpa: f64) -> f64 {
    hpa * INHG_PER_HPA
}

/// Whole number with `,` thousands separators
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Altitude in the requested unit, rounded, e.g. `2,850 ft`
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn altitude_readout(altitude_m: f64, unit: AltitudeUnit) -> String {
    let value = match unit {
        AltitudeUnit::Meters => altitude_m,
        AltitudeUnit::Feet => meters_to_feet(altitude_m),
    };
    format!("{} {}", group_thousands(value.round() as i64), unit)
}

/// QNH in the requested unit: `1,013 hPa` (truncated) or `29.92 inHg`
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn qnh_readout(qnh_hpa: f64, unit: PressureUnit) -> String {
    match unit {
        PressureUnit::HectoPascal => format!("{} {}", group_thousands(qnh_hpa.trunc() as i64), unit),
        PressureUnit::InchesMercury => format!("{:.2} {}", hpa_to_inhg(qnh_hpa), unit),
    }
}

/// Host-provided sensor values at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReadings {
    /// GPS altitude in meters
    pub altitude_m: Option<f64>,
    /// Station pressure in hectopascals
    pub pressure_hpa: Option<f64>,
    /// Current time
    pub now: DateTime<Utc>,
}

impl SensorReadings {
    /// Readings with only a clock
    #[must_use]
    pub const fn at(now: DateTime<Utc>) -> Self {
        Self {
            altitude_m: None,
            pressure_hpa: None,
            now,
        }
    }

    /// Set altitude
    #[must_use]
    pub const fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = Some(altitude_m);
        self
    }

    /// Set pressure
    #[must_use]
    pub const fn with_pressure(mut self, pressure_hpa: f64) -> Self {
        self.pressure_hpa = Some(pressure_hpa);
        self
    }
}

/// Lines of live data a step displays, in a fixed order
///
/// A capability is silently left out when the readings it needs are missing.
#[must_use]
pub fn step_readouts(step: &Step, readings: &SensorReadings) -> Vec<String> {
    let mut lines = Vec::new();

    if let (Some(unit), Some(altitude)) = (step.altitude_unit(), readings.altitude_m) {
        lines.push(altitude_readout(altitude, unit));
    }

    if let (Some(unit), Some(altitude), Some(pressure)) =
        (step.pressure_unit(), readings.altitude_m, readings.pressure_hpa)
    {
        lines.push(qnh_readout(qnh_hpa(pressure, altitude), unit));
    }

    if step.local_time {
        let local: DateTime<Local> = readings.now.with_timezone(&Local);
        lines.push(local.format("%H:%M:%S").to_string());
    }

    if step.utc_time {
        lines.push(format!("{} UTC", readings.now.format("%H:%M:%S")));
    }

    lines
}
