//! Simulated annealing improvement heuristic.
//!
//! Starts from a shuffled order and repeatedly swaps two positions, accepting
//! worse orders with probability `exp(-Δ/T)` so the search can leave local
//! optima. The temperature follows a fixed geometric cooling schedule.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::matrix::DistanceMatrix;
use crate::optimizer::{SequencePlan, improvement_percent};
use crate::traits::RouteOptimizer;

pub(crate) const NAME: &str = "Simulated Annealing";

const INITIAL_TEMPERATURE: f64 = 10_000.0;
const COOLING_RATE: f64 = 0.9995;
const TERMINAL_TEMPERATURE: f64 = 0.01;
const SWAPS_PER_LEVEL: usize = 100;

/// Counters from one annealing run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingStats {
    /// Path length of the stops in input order.
    pub naive_km: f64,
    /// Path length of the shuffled starting order.
    pub initial_km: f64,
    pub best_km: f64,
    pub temperature_levels: usize,
    pub accepted_moves: usize,
}

/// Stochastic optimizer.
///
/// Owns no generator: each call to [`RouteOptimizer::plan`] builds a fresh
/// one, or callers pass their own to [`SimulatedAnnealingOptimizer::plan_with_rng`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedAnnealingOptimizer {
    seed: Option<u64>,
}

impl SimulatedAnnealingOptimizer {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn plan_with_rng<R: Rng>(&self, matrix: &DistanceMatrix, rng: &mut R) -> SequencePlan {
        let n = matrix.stop_count();
        let naive: Vec<usize> = (0..n).collect();
        if n < 2 {
            return SequencePlan::from_order(naive);
        }
        let naive_km = matrix.path_km(&naive);

        let mut current = naive;
        current.shuffle(rng);
        let mut current_km = matrix.path_km(&current);
        let initial_km = current_km;

        // Separate buffer; refreshed by copy, never aliased to `current`.
        let mut best = current.clone();
        let mut best_km = current_km;

        let mut temperature = INITIAL_TEMPERATURE;
        let mut levels = 0;
        let mut accepted = 0;

        while temperature > TERMINAL_TEMPERATURE {
            for _ in 0..SWAPS_PER_LEVEL {
                let i = rng.gen_range(0..n);
                let j = rng.gen_range(0..n);
                if i == j {
                    continue;
                }

                current.swap(i, j);
                let candidate_km = matrix.path_km(&current);
                let delta = candidate_km - current_km;

                if delta < 0.0 || rng.r#gen::<f64>() < (-delta / temperature).exp() {
                    current_km = candidate_km;
                    accepted += 1;
                    if current_km < best_km {
                        best.clone_from(&current);
                        best_km = current_km;
                    }
                } else {
                    current.swap(i, j);
                }
            }
            temperature *= COOLING_RATE;
            levels += 1;
        }

        let improvement = improvement_percent(naive_km, best_km);
        debug!(
            stops = n,
            naive_km,
            initial_km,
            best_km,
            improvement_percent = improvement.unwrap_or(0.0),
            levels,
            accepted,
            "simulated annealing finished"
        );

        SequencePlan {
            order: best,
            improvement_percent: improvement,
            stats: Some(AnnealingStats {
                naive_km,
                initial_km,
                best_km,
                temperature_levels: levels,
                accepted_moves: accepted,
            }),
        }
    }
}

impl RouteOptimizer for SimulatedAnnealingOptimizer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn plan(&self, matrix: &DistanceMatrix) -> SequencePlan {
        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        self.plan_with_rng(matrix, &mut rng)
    }
}
