//! Routes and optimization results.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::SequencingError;
use crate::polyline::Polyline;
use crate::stop::{Coordinate, Stop, StopId};

/// A start location plus the ordered stops of a single vehicle.
///
/// The sequence is only ever replaced as a whole, see [`Route::with_sequence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RouteParts")]
pub struct Route {
    start: Coordinate,
    stops: Vec<Stop>,
}

#[derive(Deserialize)]
struct RouteParts {
    start: Coordinate,
    stops: Vec<Stop>,
}

impl TryFrom<RouteParts> for Route {
    type Error = SequencingError;

    fn try_from(parts: RouteParts) -> Result<Self, Self::Error> {
        Route::new(parts.start, parts.stops)
    }
}

impl Route {
    pub fn new(start: Coordinate, stops: Vec<Stop>) -> Result<Self, SequencingError> {
        let mut seen = HashSet::with_capacity(stops.len());
        for stop in &stops {
            stop.check()?;
            if !seen.insert(stop.id()) {
                return Err(SequencingError::invalid_input(format!(
                    "stop {} appears more than once",
                    stop.id()
                )));
            }
        }
        Ok(Self { start, stops })
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Replace the sequence wholesale with a reordering of the same stops.
    pub fn with_sequence(self, sequence: Vec<Stop>) -> Result<Self, SequencingError> {
        self.indices_of(&sequence)?;
        Ok(Self {
            start: self.start,
            stops: sequence,
        })
    }

    /// Map each stop of `candidate` to its index in this route.
    ///
    /// Fails unless `candidate` is a permutation of this route's stops.
    pub fn indices_of(&self, candidate: &[Stop]) -> Result<Vec<usize>, SequencingError> {
        if candidate.len() != self.stops.len() {
            return Err(SequencingError::invalid_input(format!(
                "sequence has {} stops, route has {}",
                candidate.len(),
                self.stops.len()
            )));
        }

        let index: HashMap<&StopId, usize> = self
            .stops
            .iter()
            .enumerate()
            .map(|(i, stop)| (stop.id(), i))
            .collect();

        let mut used = vec![false; self.stops.len()];
        let mut indices = Vec::with_capacity(candidate.len());
        for stop in candidate {
            let Some(&i) = index.get(stop.id()) else {
                return Err(SequencingError::invalid_input(format!(
                    "stop {} is not part of the route",
                    stop.id()
                )));
            };
            if std::mem::replace(&mut used[i], true) {
                return Err(SequencingError::invalid_input(format!(
                    "stop {} appears more than once",
                    stop.id()
                )));
            }
            indices.push(i);
        }
        Ok(indices)
    }

    /// Geometry of the route: the start followed by every stop in order.
    pub fn polyline(&self) -> Polyline {
        Polyline::through(self.start, &self.stops)
    }
}

/// Outcome of one optimization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub sequence: Vec<Stop>,
    pub total_distance_km: f64,
    pub total_time_minutes: f64,
    pub algorithm: String,
    /// Percentage saved against visiting the stops in input order.
    /// Informational only.
    pub improvement_percent: Option<f64>,
}

impl OptimizationResult {
    pub fn empty(algorithm: &str) -> Self {
        Self {
            sequence: Vec::new(),
            total_distance_km: 0.0,
            total_time_minutes: 0.0,
            algorithm: algorithm.to_string(),
            improvement_percent: None,
        }
    }

    pub fn stop_ids(&self) -> Vec<&StopId> {
        self.sequence.iter().map(Stop::id).collect()
    }
}
