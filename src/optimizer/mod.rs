//! Route optimization strategies.
//!
//! The algorithm set is closed: [`Algorithm`] names every strategy and
//! dispatches to it with a single `match`.

pub mod annealing;
pub mod nearest_neighbor;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::matrix::DistanceMatrix;
use crate::traits::RouteOptimizer;

pub use annealing::{AnnealingStats, SimulatedAnnealingOptimizer};
pub use nearest_neighbor::NearestNeighborOptimizer;

/// An order chosen by an optimizer, as indices into the request's stops.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencePlan {
    pub order: Vec<usize>,
    pub improvement_percent: Option<f64>,
    pub stats: Option<AnnealingStats>,
}

impl SequencePlan {
    pub fn from_order(order: Vec<usize>) -> Self {
        Self {
            order,
            improvement_percent: None,
            stats: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    NearestNeighbor,
    SimulatedAnnealing,
}

impl Algorithm {
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::NearestNeighbor => nearest_neighbor::NAME,
            Algorithm::SimulatedAnnealing => annealing::NAME,
        }
    }

    /// Run the selected strategy. `seed` only affects simulated annealing.
    pub fn plan(self, matrix: &DistanceMatrix, seed: Option<u64>) -> SequencePlan {
        match self {
            Algorithm::NearestNeighbor => NearestNeighborOptimizer.plan(matrix),
            Algorithm::SimulatedAnnealing => SimulatedAnnealingOptimizer::new(seed).plan(matrix),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Percentage of `baseline_km` saved by `achieved_km`.
pub(crate) fn improvement_percent(baseline_km: f64, achieved_km: f64) -> Option<f64> {
    (baseline_km > 0.0).then(|| (baseline_km - achieved_km) / baseline_km * 100.0)
}
