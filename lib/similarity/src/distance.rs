//! Distance functions and nearest-candidate searches
//!
//! The numeric and timestamp searches deliberately break ties in opposite
//! directions: numeric keeps the last equally close candidate, timestamps
//! keep the first.

/// Mean earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A (latitude, longitude) pair in degrees
pub type LatLon = (f64, f64);

/// Great-circle distance in meters between two points
pub fn haversine_meters(a: LatLon, b: LatLon) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon * 0.5).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// Tolerance for a numeric match
///
/// Absolute tolerances are used as-is; relative ones scale with the value
/// being matched, so `accuracy = 0.9` allows a 10% deviation.
#[inline]
pub fn numeric_tolerance(value: f64, accuracy: f64, absolute: bool) -> f64 {
    if absolute {
        accuracy
    } else {
        value * (1.0 - accuracy)
    }
}

/// Closest candidate within `tolerance`
///
/// Compares with `<=` against the running minimum, so among equally close
/// candidates the last one enumerated wins.
pub fn nearest_number<I>(target: f64, choices: I, tolerance: f64) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut min_distance = f64::INFINITY;
    let mut best = None;
    for candidate in choices {
        let distance = (target - candidate).abs();
        if distance <= tolerance && distance <= min_distance {
            best = Some(candidate);
            min_distance = distance;
        }
    }
    best
}

/// Closest timestamp within `tolerance` (same unit as the timestamps)
///
/// Compares with a strict `<` against the running minimum, so among equally
/// close candidates the first one enumerated wins.
pub fn nearest_timestamp(target: i64, choices: &[i64], tolerance: f64) -> Option<i64> {
    let mut min_distance: Option<u64> = None;
    let mut best = None;
    for &candidate in choices {
        let distance = target.abs_diff(candidate);
        if distance as f64 <= tolerance && min_distance.map_or(true, |m| distance < m) {
            min_distance = Some(distance);
            best = Some(candidate);
        }
    }
    best
}
