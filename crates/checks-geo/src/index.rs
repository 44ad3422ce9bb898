//! Static nearest-aerodrome index
//!
//! A linear scan with great-circle distance. The point list is small and
//! fixed once loaded, so no spatial structure is needed.
//!
//! # Tie-break
//!
//! When two points are at exactly the same distance from the query, the one
//! that appears first in the source list wins.

use std::path::Path;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates, in kilometers
#[must_use]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// One reference location
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    /// Identifier reported on a match (ICAO code for aerodromes)
    pub identifier: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Data source, if the row named one
    pub source: Option<String>,
}

impl GeoPoint {
    /// Create point
    pub fn new(identifier: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            identifier: identifier.into(),
            latitude,
            longitude,
            source: None,
        }
    }

    /// Distance to a coordinate, in kilometers
    #[must_use]
    pub fn distance_km(&self, latitude: f64, longitude: f64) -> f64 {
        haversine_km(self.latitude, self.longitude, latitude, longitude)
    }

    fn from_csv_row(row: &str) -> Option<Self> {
        let mut fields = row.split(',').map(str::trim);
        let identifier = fields.next().filter(|id| !id.is_empty())?;
        let latitude: f64 = fields.next()?.parse().ok()?;
        let longitude: f64 = fields.next()?.parse().ok()?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        let source = fields.next().filter(|s| !s.is_empty()).map(str::to_string);
        Some(Self {
            identifier: identifier.to_string(),
            latitude,
            longitude,
            source,
        })
    }
}

/// Immutable point list with nearest lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoIndex {
    points: Vec<GeoPoint>,
}

impl GeoIndex {
    /// Index over `points`, kept in the given order
    #[must_use]
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Index with no points; every lookup misses
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `identifier,lat,lon[,source]` rows after a header line
    ///
    /// Rows that do not parse are skipped.
    #[must_use]
    pub fn from_csv_str(csv: &str) -> Self {
        let mut skipped = 0usize;
        let points: Vec<GeoPoint> = csv
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let point = GeoPoint::from_csv_row(line);
                if point.is_none() {
                    skipped += 1;
                }
                point
            })
            .collect();
        if skipped > 0 {
            tracing::warn!("skipped {} malformed aerodrome rows", skipped);
        }
        Self::new(points)
    }

    /// Load a CSV file; any failure yields an empty index
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(csv) => {
                let index = Self::from_csv_str(&csv);
                tracing::info!("loaded {} aerodromes from {}", index.len(), path.display());
                index
            }
            Err(e) => {
                tracing::warn!("aerodrome data unavailable at {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    /// Number of points
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no points are loaded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in source order
    #[must_use]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Closest point and its distance, regardless of radius
    #[must_use]
    pub fn nearest_point(&self, latitude: f64, longitude: f64) -> Option<(&GeoPoint, f64)> {
        let mut best: Option<(&GeoPoint, f64)> = None;
        for point in &self.points {
            let distance = point.distance_km(latitude, longitude);
            // strict comparison keeps the earlier point on ties
            if best.map_or(true, |(_, min)| distance < min) {
                best = Some((point, distance));
            }
        }
        best
    }

    /// Identifier of the closest point, if it lies within `max_distance_km`
    #[must_use]
    pub fn nearest(&self, latitude: f64, longitude: f64, max_distance_km: f64) -> Option<&str> {
        self.nearest_point(latitude, longitude)
            .filter(|(_, distance)| *distance <= max_distance_km)
            .map(|(point, _)| point.identifier.as_str())
    }
}
