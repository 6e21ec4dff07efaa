//! Property-based tests for geometry and the optimizers.
//!
//! # Invariants tested
//!
//! - **Symmetry / identity:** great-circle distance is symmetric and zero on
//!   the diagonal.
//! - **Permutation:** both optimizers return every input stop exactly once.
//! - **Determinism:** nearest neighbor gives the same order on every run.
//! - **Annealing never regresses:** the best order is no longer than the
//!   shuffled order the search started from.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use stop_sequencer::haversine::{HaversineMatrix, distance_km};
use stop_sequencer::matrix::DistanceMatrix;
use stop_sequencer::optimizer::{NearestNeighborOptimizer, SimulatedAnnealingOptimizer};
use stop_sequencer::traits::RouteOptimizer;
use stop_sequencer::{Algorithm, Coordinate, Sequencer, SequencerConfig, Stop};

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0..=90.0_f64, -180.0..=180.0_f64).prop_map(|(lat, lon)| Coordinate::new(lat, lon).unwrap())
}

/// Stops scattered over a city-sized box.
fn city_stops(max: usize) -> impl Strategy<Value = Vec<Stop>> {
    prop::collection::vec((36.0..36.2_f64, -115.3..-115.0_f64), 0..=max).prop_map(|points| {
        points
            .into_iter()
            .enumerate()
            .map(|(i, (lat, lon))| Stop::generic(format!("s{i}"), Coordinate::new(lat, lon).unwrap()))
            .collect()
    })
}

fn start() -> Coordinate {
    Coordinate::new(36.1, -115.15).unwrap()
}

fn assert_permutation(order: &[usize], n: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(order.len(), n);
    let unique: HashSet<usize> = order.iter().copied().collect();
    prop_assert_eq!(unique.len(), n);
    prop_assert!(order.iter().all(|&i| i < n));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn distance_is_symmetric(a in coordinate(), b in coordinate()) {
        prop_assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn distance_to_self_is_zero(a in coordinate()) {
        prop_assert_eq!(distance_km(a, a), 0.0);
    }

    #[test]
    fn nearest_neighbor_is_a_deterministic_permutation(stops in city_stops(20)) {
        let matrix = DistanceMatrix::build(&HaversineMatrix, start(), &stops).unwrap();
        let first = NearestNeighborOptimizer.plan(&matrix);
        assert_permutation(&first.order, stops.len())?;

        let second = NearestNeighborOptimizer.plan(&matrix);
        prop_assert_eq!(first.order, second.order);
    }
}

proptest! {
    // Each case runs the full cooling schedule.
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn annealing_returns_a_permutation(stops in city_stops(8), seed in any::<u64>()) {
        let matrix = DistanceMatrix::build(&HaversineMatrix, start(), &stops).unwrap();
        let plan = SimulatedAnnealingOptimizer::seeded(seed).plan(&matrix);
        assert_permutation(&plan.order, stops.len())?;
    }

    #[test]
    fn annealing_never_worse_than_its_start(stops in city_stops(8), seed in any::<u64>()) {
        prop_assume!(stops.len() >= 3);
        let matrix = DistanceMatrix::build(&HaversineMatrix, start(), &stops).unwrap();

        let mut rng = SmallRng::seed_from_u64(seed);
        let plan = SimulatedAnnealingOptimizer::default().plan_with_rng(&matrix, &mut rng);
        let stats = plan.stats.expect("three or more stops are annealed");

        prop_assert!(stats.best_km <= stats.initial_km);
        prop_assert!((matrix.path_km(&plan.order) - stats.best_km).abs() < 1e-9);
    }

    #[test]
    fn sequencer_results_cover_input(stops in city_stops(8), seed in any::<u64>()) {
        let sequencer = Sequencer::new(SequencerConfig::default().with_seed(seed)).unwrap();
        for algorithm in [Algorithm::NearestNeighbor, Algorithm::SimulatedAnnealing] {
            let result = sequencer.optimize(algorithm, Some(start()), &stops).unwrap();
            let mut got: Vec<&str> = result.sequence.iter().map(|s| s.id().as_str()).collect();
            let mut want: Vec<&str> = stops.iter().map(|s| s.id().as_str()).collect();
            got.sort_unstable();
            want.sort_unstable();
            prop_assert_eq!(got, want);
            prop_assert!(result.total_distance_km >= 0.0);
        }
    }
}
