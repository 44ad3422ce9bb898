//! Distance and log record properties.

use checks_geo::{haversine_km, GeoIndex, GeoPoint, LogEntry, EARTH_RADIUS_KM};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = (f64, f64)> {
    (-90.0f64..=90.0, -180.0f64..=180.0)
}

#[test]
fn one_degree_of_latitude_is_about_111_km() {
    let d = haversine_km(0.0, 0.0, 1.0, 0.0);
    assert!((d - 111.19).abs() < 0.01, "got {d}");
}

proptest! {
    #[test]
    fn prop_haversine_is_symmetric_and_bounded(a in coordinate(), b in coordinate()) {
        let ab = haversine_km(a.0, a.1, b.0, b.1);
        let ba = haversine_km(b.0, b.1, a.0, a.1);
        prop_assert!(ab >= 0.0);
        prop_assert!(ab <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        prop_assert!((ab - ba).abs() < 1e-9);
        prop_assert!(haversine_km(a.0, a.1, a.0, a.1).abs() < 1e-9);
    }

    #[test]
    fn prop_nearest_point_is_minimal(
        points in prop::collection::vec(coordinate(), 1..8),
        query in coordinate(),
    ) {
        let index = GeoIndex::new(
            points
                .iter()
                .enumerate()
                .map(|(i, (lat, lon))| GeoPoint::new(format!("P{i}"), *lat, *lon))
                .collect(),
        );
        let (best, distance) = index.nearest_point(query.0, query.1).unwrap();
        for point in index.points() {
            prop_assert!(distance <= point.distance_km(query.0, query.1));
        }
        prop_assert_eq!(index.nearest(query.0, query.1, distance), Some(best.identifier.as_str()));
    }

    #[test]
    fn prop_log_line_parses_back(
        secs in 0i64..4_000_000_000,
        position in coordinate(),
        altitude in -500.0f64..15_000.0,
        aerodrome in prop::option::of("[A-Z]{4}"),
        text in "[A-Za-z0-9 ,.]{0,40}",
    ) {
        let timestamp = Utc.timestamp_opt(secs, 0).unwrap();
        let mut entry = LogEntry::new(timestamp, position.0, position.1, altitude, text.clone());
        if let Some(icao) = &aerodrome {
            entry = entry.with_aerodrome(icao.clone());
        }

        let parsed: LogEntry = entry.to_line().parse().unwrap();
        prop_assert_eq!(parsed.timestamp, timestamp);
        prop_assert!((parsed.latitude - position.0).abs() <= 5e-7 + 1e-9);
        prop_assert!((parsed.longitude - position.1).abs() <= 5e-7 + 1e-9);
        prop_assert!((parsed.altitude_m - altitude).abs() <= 0.05 + 1e-9);
        prop_assert_eq!(parsed.aerodrome, aerodrome);
        prop_assert_eq!(parsed.text, text);
    }
}
