//! Unit tests for the geodesic and clock-time helpers.

use vrp_engine::geo::{
    haversine_km, minutes_to_time, round1, round2, seconds_to_time, time_to_seconds,
};
use vrp_engine::problem::Coordinate;

#[test]
fn test_haversine_symmetry() {
    let pairs = [
        (Coordinate::new(41.009, 28.957), Coordinate::new(41.1, 29.05)),
        (Coordinate::new(0.0, 0.0), Coordinate::new(-45.0, 120.0)),
        (Coordinate::new(89.9, 10.0), Coordinate::new(-89.9, -170.0)),
        (Coordinate::new(52.52, 13.405), Coordinate::new(48.8566, 2.3522)),
    ];

    for (a, b) in &pairs {
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }
}

#[test]
fn test_haversine_zero_for_identical_points() {
    let points = [
        Coordinate::new(0.0, 0.0),
        Coordinate::new(41.009, 28.957),
        Coordinate::new(-33.87, 151.21),
    ];

    for p in &points {
        assert_eq!(haversine_km(p, p), 0.0);
    }
}

#[test]
fn test_haversine_known_distance() {
    // One degree of longitude along the equator.
    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(0.0, 1.0);

    let expected = 6371.0 * std::f64::consts::PI / 180.0;
    assert!((haversine_km(&a, &b) - expected).abs() < 1e-6);
}

#[test]
fn test_time_to_seconds() {
    assert_eq!(time_to_seconds("00:00"), 0);
    assert_eq!(time_to_seconds("08:30"), 8 * 3600 + 30 * 60);
    assert_eq!(time_to_seconds("23:59"), 23 * 3600 + 59 * 60);
}

#[test]
fn test_time_to_seconds_invalid_input() {
    assert_eq!(time_to_seconds(""), 0);
    assert_eq!(time_to_seconds("eight"), 0);
    assert_eq!(time_to_seconds("12"), 0);
    assert_eq!(time_to_seconds("ab:cd"), 0);
}

#[test]
fn test_seconds_to_time() {
    assert_eq!(seconds_to_time(0), "00:00");
    assert_eq!(seconds_to_time(8 * 3600 + 30 * 60), "08:30");
    assert_eq!(seconds_to_time(86_340), "23:59");
    // Sub-minute remainders are floored.
    assert_eq!(seconds_to_time(8 * 3600 + 30 * 60 + 59), "08:30");
}

#[test]
fn test_time_round_trip_whole_day() {
    // Every valid HH:MM from 00:00 to 23:59 survives the round trip.
    for minute in 0..1440 {
        let seconds = minute * 60;
        let formatted = seconds_to_time(seconds);
        assert_eq!(time_to_seconds(&formatted), seconds);
    }
}

#[test]
fn test_minutes_to_time() {
    assert_eq!(minutes_to_time(0), "00:00");
    assert_eq!(minutes_to_time(8 * 60), "08:00");
    assert_eq!(minutes_to_time(8 * 60 + 45), "08:45");
    assert_eq!(minutes_to_time(23 * 60 + 59), "23:59");
}

#[test]
fn test_rounding_helpers() {
    assert_eq!(round2(12.345678), 12.35);
    assert_eq!(round2(12.3449), 12.34);
    assert_eq!(round2(0.0), 0.0);
    assert_eq!(round1(87.65), 87.7);
    assert_eq!(round1(87.64), 87.6);
}
