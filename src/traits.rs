//! Seams between the sequencing core and its collaborators.
//!
//! Kept intentionally small: one trait for where distances come from, one for
//! how an order is chosen.

use crate::matrix::DistanceMatrix;
use crate::optimizer::SequencePlan;
use crate::stop::Coordinate;

/// Provides a distance matrix (kilometers) for a set of locations.
///
/// The matrix is indexed by the provided location order and must be square
/// with one row per location.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[Coordinate]) -> Vec<Vec<f64>>;
}

impl<T: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for &T {
    fn matrix_for(&self, locations: &[Coordinate]) -> Vec<Vec<f64>> {
        (**self).matrix_for(locations)
    }
}

/// A strategy that orders the stops of a single route.
pub trait RouteOptimizer {
    /// Display name reported in optimization results.
    fn name(&self) -> &'static str;

    /// Chooses a visiting order over the matrix's stops.
    ///
    /// The returned order is a permutation of `0..matrix.stop_count()`.
    fn plan(&self, matrix: &DistanceMatrix) -> SequencePlan;
}
