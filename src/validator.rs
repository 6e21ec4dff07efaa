//! Precedence and time-window checks for a proposed stop order.
//!
//! A failed check is an expected outcome (dispatcher overrides are often
//! infeasible) and comes back as a [`ValidationOutcome`]. Only malformed
//! requests produce a [`SequencingError`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EarlyArrival;
use crate::error::SequencingError;
use crate::estimator::TravelEstimator;
use crate::haversine::HaversineMatrix;
use crate::matrix::DistanceMatrix;
use crate::route::Route;
use crate::stop::{Coordinate, PairingKey, Stop, StopId, StopRole};
use crate::traits::DistanceMatrixProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationReason {
    PrecedenceViolation,
    TimeWindowViolation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Valid,
    Invalid {
        reason: ViolationReason,
        /// First stop in sequence order that breaks the rule.
        stop: StopId,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn reason(&self) -> Option<ViolationReason> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid { reason, .. } => Some(*reason),
        }
    }

    fn invalid(reason: ViolationReason, stop: &Stop) -> Self {
        ValidationOutcome::Invalid {
            reason,
            stop: stop.id().clone(),
        }
    }
}

/// Sequence positions of the pickup and delivery sharing one key.
#[derive(Debug, Default)]
struct Pair {
    pickups: Vec<usize>,
    deliveries: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct SequenceValidator<M = HaversineMatrix> {
    estimator: TravelEstimator<M>,
    early_arrival: EarlyArrival,
}

impl SequenceValidator {
    pub fn new(average_speed_kmh: f64, early_arrival: EarlyArrival) -> Result<Self, SequencingError> {
        Self::with_provider(average_speed_kmh, early_arrival, HaversineMatrix)
    }

    /// Precedence alone, for `sequence` as given. Needs no distances.
    pub fn check_precedence(sequence: &[Stop]) -> Result<ValidationOutcome, SequencingError> {
        let order: Vec<usize> = (0..sequence.len()).collect();
        precedence(sequence, &order)
    }
}

impl<M: DistanceMatrixProvider> SequenceValidator<M> {
    pub fn with_provider(
        average_speed_kmh: f64,
        early_arrival: EarlyArrival,
        provider: M,
    ) -> Result<Self, SequencingError> {
        let estimator = TravelEstimator::with_provider(average_speed_kmh, provider)?.with_early_arrival(early_arrival);
        Ok(Self {
            estimator,
            early_arrival,
        })
    }

    /// Check a caller-proposed order of `route`'s stops.
    ///
    /// `candidate` must contain exactly the route's stops; precedence is
    /// checked before time windows.
    pub fn validate(
        &self,
        route: &Route,
        candidate: &[Stop],
        start_time: DateTime<Utc>,
    ) -> Result<ValidationOutcome, SequencingError> {
        let order = route.indices_of(candidate)?;
        let matrix = DistanceMatrix::build(self.provider(), route.start(), route.stops())?;
        self.validate_order(&matrix, route.stops(), &order, start_time)
    }

    pub fn is_valid_sequence(
        &self,
        route: &Route,
        candidate: &[Stop],
        start_time: DateTime<Utc>,
    ) -> Result<bool, SequencingError> {
        Ok(self.validate(route, candidate, start_time)?.is_valid())
    }

    /// Time windows alone, for when precedence is already known to hold.
    pub fn can_complete_within_time_windows(
        &self,
        start: Coordinate,
        sequence: &[Stop],
        start_time: DateTime<Utc>,
    ) -> Result<bool, SequencingError> {
        let matrix = DistanceMatrix::build(self.provider(), start, sequence)?;
        let order: Vec<usize> = (0..sequence.len()).collect();
        Ok(self
            .time_windows(&matrix, sequence, &order, start_time)?
            .is_valid())
    }

    pub(crate) fn validate_order(
        &self,
        matrix: &DistanceMatrix,
        stops: &[Stop],
        order: &[usize],
        start_time: DateTime<Utc>,
    ) -> Result<ValidationOutcome, SequencingError> {
        let outcome = precedence(stops, order)?;
        if !outcome.is_valid() {
            debug!(?outcome, "sequence breaks pickup/delivery precedence");
            return Ok(outcome);
        }
        let outcome = self.time_windows(matrix, stops, order, start_time)?;
        if !outcome.is_valid() {
            debug!(?outcome, "sequence misses a time window");
        }
        Ok(outcome)
    }

    fn time_windows(
        &self,
        matrix: &DistanceMatrix,
        stops: &[Stop],
        order: &[usize],
        start_time: DateTime<Utc>,
    ) -> Result<ValidationOutcome, SequencingError> {
        let schedule = self.estimator.schedule_order(matrix, stops, order, start_time)?;

        for (&i, eta) in order.iter().zip(&schedule) {
            let stop = &stops[i];
            let Some(window) = stop.time_window() else {
                continue;
            };
            let feasible = match self.early_arrival {
                EarlyArrival::Reject => window.admits(eta.arrival),
                EarlyArrival::Wait => window.latest.is_none_or(|latest| eta.arrival <= latest),
            };
            if !feasible {
                return Ok(ValidationOutcome::invalid(ViolationReason::TimeWindowViolation, stop));
            }
        }

        Ok(ValidationOutcome::Valid)
    }

    fn provider(&self) -> &M {
        self.estimator.provider()
    }
}

/// Every pickup must come strictly before the delivery sharing its key.
fn precedence(stops: &[Stop], order: &[usize]) -> Result<ValidationOutcome, SequencingError> {
    let pairs = pair_positions(stops, order)?;

    for (position, &i) in order.iter().enumerate() {
        let stop = &stops[i];
        if stop.role() != StopRole::Delivery {
            continue;
        }
        let pickup = stop
            .pairing_key()
            .and_then(|key| pairs.get(key))
            .and_then(|pair| pair.pickups.first());
        if pickup.is_some_and(|&pickup| pickup > position) {
            return Ok(ValidationOutcome::invalid(ViolationReason::PrecedenceViolation, stop));
        }
    }

    Ok(ValidationOutcome::Valid)
}

/// Reject malformed pairings before any optimization work is done.
pub(crate) fn ensure_pairings(stops: &[Stop]) -> Result<(), SequencingError> {
    let order: Vec<usize> = (0..stops.len()).collect();
    pair_positions(stops, &order).map(|_| ())
}

/// One lookup per key, rejecting keys shared by more than one pickup or
/// more than one delivery.
fn pair_positions<'a>(
    stops: &'a [Stop],
    order: &[usize],
) -> Result<HashMap<&'a PairingKey, Pair>, SequencingError> {
    let mut pairs: HashMap<&PairingKey, Pair> = HashMap::new();

    for (position, &i) in order.iter().enumerate() {
        let stop = &stops[i];
        let Some(key) = stop.pairing_key() else {
            continue;
        };
        let pair = pairs.entry(key).or_default();
        match stop.role() {
            StopRole::Pickup => pair.pickups.push(position),
            StopRole::Delivery => pair.deliveries.push(position),
            StopRole::Generic => {}
        }
    }

    for (key, pair) in &pairs {
        for (role, count) in [
            (StopRole::Pickup, pair.pickups.len()),
            (StopRole::Delivery, pair.deliveries.len()),
        ] {
            if count > 1 {
                return Err(SequencingError::MalformedPairing {
                    key: (*key).clone(),
                    role,
                    count,
                });
            }
        }
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;
    use crate::stop::TimeWindow;

    fn at(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn nine_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn validator() -> SequenceValidator {
        SequenceValidator::new(30.0, EarlyArrival::Reject).unwrap()
    }

    #[test]
    fn test_precedence_accepts_pickup_first() {
        let sequence = vec![
            Stop::pickup("p1", at(36.11, -115.17), "PKG1"),
            Stop::delivery("d1", at(36.12, -115.17), "PKG1"),
        ];
        assert!(SequenceValidator::check_precedence(&sequence).unwrap().is_valid());
    }

    #[test]
    fn test_precedence_reports_delivery() {
        let sequence = vec![
            Stop::delivery("d1", at(36.12, -115.17), "PKG1"),
            Stop::pickup("p1", at(36.11, -115.17), "PKG1"),
        ];
        assert_eq!(
            SequenceValidator::check_precedence(&sequence).unwrap(),
            ValidationOutcome::Invalid {
                reason: ViolationReason::PrecedenceViolation,
                stop: StopId::new("d1"),
            }
        );
    }

    #[test]
    fn test_unpaired_delivery_is_fine() {
        let sequence = vec![
            Stop::delivery("d1", at(36.12, -115.17), "PKG1"),
            Stop::generic("g1", at(36.11, -115.17)),
        ];
        assert!(SequenceValidator::check_precedence(&sequence).unwrap().is_valid());
    }

    #[test]
    fn test_malformed_pairing_is_an_error() {
        let sequence = vec![
            Stop::pickup("p1", at(36.11, -115.17), "PKG1"),
            Stop::pickup("p2", at(36.13, -115.17), "PKG1"),
            Stop::delivery("d1", at(36.12, -115.17), "PKG1"),
        ];
        assert_eq!(
            SequenceValidator::check_precedence(&sequence).unwrap_err(),
            SequencingError::MalformedPairing {
                key: PairingKey::new("PKG1"),
                role: StopRole::Pickup,
                count: 2,
            }
        );
    }

    #[test]
    fn test_time_window_reject_vs_wait() {
        let start = at(36.10, -115.17);
        // Roughly 2.2 km away: about 4.5 minutes at 30 km/h.
        let stop = Stop::generic("g1", at(36.12, -115.17))
            .with_time_window(TimeWindow::between(nine_am() + TimeDelta::minutes(30), nine_am() + TimeDelta::hours(1)).unwrap());
        let sequence = vec![stop];

        assert!(!validator().can_complete_within_time_windows(start, &sequence, nine_am()).unwrap());

        let waiting = SequenceValidator::new(30.0, EarlyArrival::Wait).unwrap();
        assert!(waiting.can_complete_within_time_windows(start, &sequence, nine_am()).unwrap());
    }

    #[test]
    fn test_single_bound_windows() {
        let start = at(36.10, -115.17);
        let late_enough = Stop::generic("a", at(36.12, -115.17)).with_time_window(TimeWindow::not_before(nine_am()));
        let too_late = Stop::generic("b", at(36.14, -115.17))
            .with_time_window(TimeWindow::not_after(nine_am() + TimeDelta::minutes(5)));

        assert!(validator()
            .can_complete_within_time_windows(start, &[late_enough.clone()], nine_am())
            .unwrap());
        assert!(!validator()
            .can_complete_within_time_windows(start, &[late_enough, too_late], nine_am())
            .unwrap());
    }

    #[test]
    fn test_validate_checks_precedence_first() {
        let start = at(36.10, -115.17);
        let pickup = Stop::pickup("p1", at(36.11, -115.17), "PKG1");
        // Unreachable window as well as a precedence problem.
        let delivery = Stop::delivery("d1", at(36.12, -115.17), "PKG1")
            .with_time_window(TimeWindow::not_after(nine_am()));
        let route = Route::new(start, vec![pickup.clone(), delivery.clone()]).unwrap();

        let outcome = validator().validate(&route, &[delivery, pickup], nine_am()).unwrap();
        assert_eq!(outcome.reason(), Some(ViolationReason::PrecedenceViolation));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = ValidationOutcome::Invalid {
            reason: ViolationReason::TimeWindowViolation,
            stop: StopId::new("d1"),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "invalid");
        assert_eq!(json["reason"], "TimeWindowViolation");
        assert_eq!(json["stop"], "d1");
    }
}
