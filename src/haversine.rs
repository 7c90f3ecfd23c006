//! Straight-line-distance fallback for the `Walk` transport mode.
//!
//! Used only when the dense travel matrix has no entry for a `Walk` leg
//! (§6 of SPEC_FULL.md: "a fallback by straight-line distance may be
//! allowed"). Ignores roads and elevation, so it over- or under-estimates
//! relative to a real routing engine, but keeps `Walk` always feasible as
//! the spec requires.

/// Average walking speed assumption for time estimation.
const DEFAULT_WALK_SPEED_KMH: f64 = 4.5;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine-based walk-time estimator.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average walking speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self { speed_kmh: DEFAULT_WALK_SPEED_KMH }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Calculate haversine distance between two points in kilometers.
    fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Estimated walking minutes between two coordinates, at least 1 when
    /// the points are distinct (so a leg never collapses to zero travel
    /// time and silently looks instantaneous).
    pub fn minutes(&self, from: (f64, f64), to: (f64, f64)) -> u32 {
        let km = Self::haversine_km(from, to);
        if km <= 0.0 {
            return 0;
        }
        let hours = km / self.speed_kmh;
        ((hours * 60.0).round() as u32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_has_zero_minutes() {
        let m = HaversineMatrix::default();
        assert_eq!(m.minutes((36.1, -115.1), (36.1, -115.1)), 0);
    }

    #[test]
    fn known_distance_is_in_reasonable_range() {
        // Las Vegas to Los Angeles, ~370km. At 4.5 km/h that's roughly 82 hours of
        // walking - absurd for a real trip but exercises the formula correctly.
        let m = HaversineMatrix::default();
        let minutes = m.minutes((36.17, -115.14), (34.05, -118.24));
        assert!(minutes > 4000 && minutes < 5500, "got {minutes}");
    }

    #[test]
    fn distinct_points_never_round_to_zero() {
        let m = HaversineMatrix::new(400.0);
        let minutes = m.minutes((36.100, -115.100), (36.1001, -115.1001));
        assert!(minutes >= 1);
    }
}
