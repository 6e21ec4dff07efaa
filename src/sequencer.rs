//! In-process entry point for routing collaborators.
//!
//! Wraps the optimizers, the validator and the estimator behind the three
//! operations the assignment and routing services call (`optimize`,
//! `validate`, `estimate`), and applies the default-speed policy once, here.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SequencerConfig;
use crate::error::SequencingError;
use crate::estimator::{StopSchedule, TravelEstimate, TravelEstimator};
use crate::haversine::{HaversineMatrix, travel_time_minutes};
use crate::matrix::DistanceMatrix;
use crate::optimizer::{Algorithm, SequencePlan};
use crate::route::{OptimizationResult, Route};
use crate::stop::{Coordinate, Stop};
use crate::traits::DistanceMatrixProvider;
use crate::validator::{SequenceValidator, ValidationOutcome, ensure_pairings};

/// One independent optimization request, as used by [`Sequencer::optimize_batch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub algorithm: Algorithm,
    /// Routes loaded from the store may lack a start location.
    pub start: Option<Coordinate>,
    pub stops: Vec<Stop>,
}

/// An optimized sequence together with its validation against the route's
/// constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedOptimization {
    pub result: OptimizationResult,
    pub outcome: ValidationOutcome,
}

#[derive(Debug, Clone)]
pub struct Sequencer<M = HaversineMatrix> {
    config: SequencerConfig,
    provider: M,
}

impl Sequencer {
    pub fn new(config: SequencerConfig) -> Result<Self, SequencingError> {
        Self::with_provider(config, HaversineMatrix)
    }
}

impl<M: DistanceMatrixProvider> Sequencer<M> {
    /// Fails when the configured default speed is itself unusable.
    pub fn with_provider(config: SequencerConfig, provider: M) -> Result<Self, SequencingError> {
        travel_time_minutes(0.0, config.default_speed_kmh)?;
        Ok(Self { config, provider })
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Order `stops` with the chosen algorithm, starting from `start`.
    ///
    /// No stops gives an empty, zero-cost result. Stops without a start
    /// location are rejected.
    pub fn optimize(
        &self,
        algorithm: Algorithm,
        start: Option<Coordinate>,
        stops: &[Stop],
    ) -> Result<OptimizationResult, SequencingError> {
        if stops.is_empty() {
            return Ok(OptimizationResult::empty(algorithm.name()));
        }
        let start = start.ok_or_else(|| {
            SequencingError::invalid_input("start location is required when stops are present")
        })?;
        let route = Route::new(start, stops.to_vec())?;
        ensure_pairings(route.stops())?;

        let matrix = DistanceMatrix::build(&self.provider, start, route.stops())?;
        let plan = algorithm.plan(&matrix, self.config.annealing_seed);
        self.result_from(algorithm, &matrix, route.stops(), plan)
    }

    /// Optimize `route` and validate the produced order in one pass.
    ///
    /// Nearest neighbor does not enforce precedence, so an invalid outcome
    /// here is an expected result rather than a failure.
    pub fn optimize_validated(
        &self,
        algorithm: Algorithm,
        route: &Route,
        start_time: DateTime<Utc>,
    ) -> Result<ValidatedOptimization, SequencingError> {
        ensure_pairings(route.stops())?;
        let validator = self.validator()?;

        let matrix = DistanceMatrix::build(&self.provider, route.start(), route.stops())?;
        let plan = algorithm.plan(&matrix, self.config.annealing_seed);
        let outcome = validator.validate_order(&matrix, route.stops(), &plan.order, start_time)?;
        let result = self.result_from(algorithm, &matrix, route.stops(), plan)?;

        Ok(ValidatedOptimization { result, outcome })
    }

    /// Optimize independent requests in parallel. Results keep request order.
    pub fn optimize_batch(
        &self,
        requests: &[OptimizationRequest],
    ) -> Vec<Result<OptimizationResult, SequencingError>>
    where
        M: Sync,
    {
        requests
            .par_iter()
            .map(|request| self.optimize(request.algorithm, request.start, &request.stops))
            .collect()
    }

    /// Check a caller-supplied order, e.g. a dispatcher override.
    pub fn validate(
        &self,
        route: &Route,
        candidate: &[Stop],
        start_time: DateTime<Utc>,
    ) -> Result<ValidationOutcome, SequencingError> {
        let outcome = self.validator()?.validate(route, candidate, start_time)?;
        info!(stops = route.len(), valid = outcome.is_valid(), "custom sequence validated");
        Ok(outcome)
    }

    /// Distance and time for `sequence`. A non-positive speed falls back to
    /// the configured default.
    pub fn estimate(
        &self,
        sequence: &[Stop],
        start: Coordinate,
        average_speed_kmh: f64,
    ) -> Result<TravelEstimate, SequencingError> {
        let speed = self.effective_speed(average_speed_kmh);
        TravelEstimator::with_provider(speed, &self.provider)?.estimate(start, sequence)
    }

    /// Arrival and departure times along `sequence` at the default speed.
    pub fn schedule(
        &self,
        sequence: &[Stop],
        start: Coordinate,
        start_time: DateTime<Utc>,
    ) -> Result<Vec<StopSchedule>, SequencingError> {
        self.estimator()?.schedule(start, sequence, start_time)
    }

    fn result_from(
        &self,
        algorithm: Algorithm,
        matrix: &DistanceMatrix,
        stops: &[Stop],
        plan: SequencePlan,
    ) -> Result<OptimizationResult, SequencingError> {
        let totals = self.estimator()?.estimate_order(matrix, stops, &plan.order)?;
        let sequence = plan.order.iter().map(|&i| stops[i].clone()).collect();

        info!(
            algorithm = algorithm.name(),
            stops = stops.len(),
            distance_km = totals.distance_km,
            time_minutes = totals.time_minutes,
            "route optimized"
        );

        Ok(OptimizationResult {
            sequence,
            total_distance_km: totals.distance_km,
            total_time_minutes: totals.time_minutes,
            algorithm: algorithm.name().to_string(),
            improvement_percent: plan.improvement_percent,
        })
    }

    fn effective_speed(&self, requested_kmh: f64) -> f64 {
        if travel_time_minutes(0.0, requested_kmh).is_ok() {
            return requested_kmh;
        }
        warn!(
            requested_kmh,
            default_kmh = self.config.default_speed_kmh,
            "invalid average speed, using configured default"
        );
        self.config.default_speed_kmh
    }

    fn estimator(&self) -> Result<TravelEstimator<&M>, SequencingError> {
        Ok(TravelEstimator::with_provider(self.config.default_speed_kmh, &self.provider)?
            .with_early_arrival(self.config.early_arrival))
    }

    fn validator(&self) -> Result<SequenceValidator<&M>, SequencingError> {
        SequenceValidator::with_provider(
            self.config.default_speed_kmh,
            self.config.early_arrival,
            &self.provider,
        )
    }
}
