//! Proximity tagging configuration

use serde::{Deserialize, Serialize};

/// Thresholds for tagging log entries with an aerodrome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Largest distance at which an aerodrome still matches
    pub max_distance_km: f64,
    /// Ground speed at or above which no aerodrome is matched
    pub max_speed_kmh: f64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            max_distance_km: 2.0,
            max_speed_kmh: 40.0,
        }
    }
}

impl GeoConfig {
    /// Set match radius
    #[must_use]
    pub const fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = km;
        self
    }

    /// Set speed threshold
    #[must_use]
    pub const fn with_max_speed_kmh(mut self, kmh: f64) -> Self {
        self.max_speed_kmh = kmh;
        self
    }
}
