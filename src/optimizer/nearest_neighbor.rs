//! Nearest-neighbor construction heuristic.
//!
//! Starting from the route's start, always visit the closest unvisited stop.
//! O(n²) in the stop count, which is fine for courier routes of tens of
//! stops.
//!
//! Pickup/delivery precedence is not enforced here; callers validate the
//! result afterwards.

use tracing::debug;

use crate::matrix::DistanceMatrix;
use crate::optimizer::SequencePlan;
use crate::traits::RouteOptimizer;

pub(crate) const NAME: &str = "Nearest Neighbor";

/// Greedy, deterministic optimizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborOptimizer;

impl RouteOptimizer for NearestNeighborOptimizer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn plan(&self, matrix: &DistanceMatrix) -> SequencePlan {
        let n = matrix.stop_count();
        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        let mut current: Option<usize> = None;

        while order.len() < n {
            let mut nearest: Option<(usize, f64)> = None;
            for candidate in (0..n).filter(|&i| !visited[i]) {
                let distance = match current {
                    None => matrix.from_start(candidate),
                    Some(from) => matrix.between(from, candidate),
                };
                // Strict comparison keeps the first stop on ties.
                if nearest.is_none_or(|(_, best)| distance < best) {
                    nearest = Some((candidate, distance));
                }
            }

            let Some((next, _)) = nearest else { break };
            visited[next] = true;
            order.push(next);
            current = Some(next);
        }

        debug!(stops = n, distance_km = matrix.path_km(&order), "nearest neighbor sequence built");
        SequencePlan::from_order(order)
    }
}
