//! Great-circle geometry and travel-time estimation.
//!
//! Uses the haversine formula on a spherical Earth. Ignores roads, so
//! distances are lower bounds on what a courier actually drives.

use crate::error::SequencingError;
use crate::stop::Coordinate;
use crate::traits::DistanceMatrixProvider;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers.
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat().to_radians();
    let lat2_rad = to.lat().to_radians();
    let delta_lat = (to.lat() - from.lat()).to_radians();
    let delta_lon = (to.lon() - from.lon()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Minutes needed to cover `distance_km` at `average_speed_kmh`.
pub fn travel_time_minutes(distance_km: f64, average_speed_kmh: f64) -> Result<f64, SequencingError> {
    if !average_speed_kmh.is_finite() || average_speed_kmh <= 0.0 {
        return Err(SequencingError::InvalidSpeed {
            speed_kmh: average_speed_kmh,
        });
    }
    Ok(distance_km / average_speed_kmh * 60.0)
}

/// Haversine-based distance matrix provider.
///
/// The default provider for every sequencing operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineMatrix;

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[Coordinate]) -> Vec<Vec<f64>> {
        let n = locations.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate().skip(i + 1) {
                let km = distance_km(*from, *to);
                matrix[i][j] = km;
                matrix[j][i] = km;
            }
        }

        matrix
    }
}
